// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error of a step line matching multiple step definitions.

use std::fmt;

use derive_more::with_trait::Error;

use crate::step::{Location, Pattern, StepId, StepInfo};

/// Step definition a step line could have been resolved to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidate {
    /// [`StepId`] of the step definition.
    pub id: StepId,

    /// [`Pattern`] of the step definition.
    pub pattern: Pattern,

    /// [`Location`] of the step definition, if known.
    pub location: Option<Location>,
}

impl From<&StepInfo> for Candidate {
    fn from(step: &StepInfo) -> Self {
        Self {
            id: step.id(),
            pattern: step.pattern().clone(),
            location: step.location(),
        }
    }
}

/// Error of a step line matching multiple step definitions.
///
/// Candidates are kept in the order they were registered in.
#[derive(Clone, Debug, Error)]
pub struct AmbiguousMatchError {
    /// Step line being resolved.
    pub step_text: String,

    /// Step definitions the step line matches.
    pub possible_matches: Vec<Candidate>,
}

impl AmbiguousMatchError {
    /// Creates a new [`AmbiguousMatchError`] of the given `step_text`.
    #[must_use]
    pub fn new(
        step_text: impl Into<String>,
        possible_matches: Vec<Candidate>,
    ) -> Self {
        Self { step_text: step_text.into(), possible_matches }
    }

    /// Returns [`StepId`]s of all the possible matches.
    pub fn ids(&self) -> impl Iterator<Item = StepId> + '_ {
        self.possible_matches.iter().map(|c| c.id)
    }

    /// Returns source texts of all the possible matches.
    pub fn patterns(&self) -> impl Iterator<Item = &str> + '_ {
        self.possible_matches.iter().map(|c| c.pattern.as_str())
    }
}

impl fmt::Display for AmbiguousMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ambiguous step: `{}` matches {} step definitions. \
             Possible matches:",
            self.step_text,
            self.possible_matches.len(),
        )?;
        for c in &self.possible_matches {
            write!(f, "\n#{} {}", c.id, c.pattern)?;
            if let Some(loc) = &c.location {
                write!(f, " --> {loc}")?;
            }
        }
        Ok(())
    }
}
