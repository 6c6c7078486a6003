// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Resolving step lines to registered step definitions.

use itertools::Itertools as _;

use crate::{
    error::{AmbiguousMatchError, Candidate, StepError, StepResult},
    registry::StepRegistry,
    step::{Captures, StepId, StepInfo},
};

/// Outcome of resolving a step line with a [`MatchEngine`].
#[derive(Clone, Debug)]
pub enum MatchOutcome<'r> {
    /// Step line matches no step definition.
    Undefined {
        /// Unmatched step line.
        line: String,
    },

    /// Step line matches exactly one step definition.
    Resolved {
        /// Matched step definition.
        step: &'r StepInfo,

        /// Values captured from the step line.
        captures: Captures,
    },

    /// Step line matches multiple step definitions.
    Ambiguous(AmbiguousMatchError),
}

impl<'r> MatchOutcome<'r> {
    /// Returns the [`StepId`] of the resolved step, if any.
    #[must_use]
    pub fn id(&self) -> Option<StepId> {
        match self {
            Self::Resolved { step, .. } => Some(step.id()),
            Self::Undefined { .. } | Self::Ambiguous(_) => None,
        }
    }

    /// Converts this [`MatchOutcome`] into a [`Result`] of the resolved step.
    ///
    /// # Errors
    ///
    /// [`StepError::Undefined`] or [`StepError::Ambiguous`] if the step line
    /// wasn't resolved.
    pub fn into_result(self) -> StepResult<(&'r StepInfo, Captures)> {
        match self {
            Self::Resolved { step, captures } => Ok((step, captures)),
            Self::Undefined { line } => Err(StepError::undefined(line)),
            Self::Ambiguous(e) => Err(e.into()),
        }
    }
}

/// Engine resolving step lines against the steps of a [`StepRegistry`].
///
/// A step line must be matched entirely by exactly one step pattern to be
/// resolved. Matching multiple patterns is an error, and no candidate is
/// preferred over others.
#[derive(Clone, Copy, Debug)]
pub struct MatchEngine<'r> {
    registry: &'r StepRegistry,
}

impl<'r> MatchEngine<'r> {
    /// Creates a new [`MatchEngine`] over the given [`StepRegistry`].
    #[must_use]
    pub const fn new(registry: &'r StepRegistry) -> Self {
        Self { registry }
    }

    /// Resolves the given step `line`.
    #[must_use]
    pub fn resolve(&self, line: &str) -> MatchOutcome<'r> {
        let mut candidates = self
            .registry
            .iter()
            .filter_map(|step| {
                Captures::extract(step.pattern(), line).map(|c| (step, c))
            })
            .collect::<Vec<_>>();

        tracing::trace!(line, candidates = candidates.len(), "resolving step");

        if candidates.len() > 1 {
            tracing::debug!(
                line,
                ids = %candidates.iter().map(|(s, _)| s.id()).join(", "),
                "ambiguous step"
            );
            return MatchOutcome::Ambiguous(AmbiguousMatchError::new(
                line,
                candidates
                    .into_iter()
                    .map(|(step, _)| Candidate::from(step))
                    .collect(),
            ));
        }

        if let Some((step, captures)) = candidates.pop() {
            MatchOutcome::Resolved { step, captures }
        } else {
            tracing::debug!(line, "undefined step");
            MatchOutcome::Undefined { line: line.to_owned() }
        }
    }
}
