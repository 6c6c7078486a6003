// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of registering and looking up step definitions.

use derive_more::with_trait::{Display, Error};

use crate::step::StepId;

/// Errors of a [`StepRegistry`] operation.
///
/// [`StepRegistry`]: crate::StepRegistry
#[derive(Debug, Display, Error)]
pub enum RegistryError {
    /// Pattern text is not a valid regular expression.
    #[display("Invalid step pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// Source text of the rejected pattern.
        pattern: String,

        /// Regular expression compilation error.
        source: regex::Error,
    },

    /// No step is registered with the requested [`StepId`].
    #[display("No step definition with id {id}")]
    NotFound {
        /// Requested [`StepId`].
        id: StepId,
    },

    /// [`StepId`] `0` cannot identify a step.
    #[display("Step id 0 is reserved")]
    ReservedId,

    /// [`StepId`] is already used by another step.
    #[display("Step id {id} is already in use")]
    DuplicateId {
        /// Conflicting [`StepId`].
        id: StepId,
    },

    /// Every [`StepId`] has been assigned already.
    #[display("No step ids left to assign")]
    IdsExhausted,
}

/// Result type alias for [`RegistryError`].
pub type RegistryResult<T> = Result<T, RegistryError>;

impl RegistryError {
    /// Returns the [`StepId`] this error relates to, if any.
    #[must_use]
    pub const fn id(&self) -> Option<StepId> {
        match self {
            Self::NotFound { id } | Self::DuplicateId { id } => Some(*id),
            Self::InvalidPattern { .. }
            | Self::ReservedId
            | Self::IdsExhausted => None,
        }
    }
}
