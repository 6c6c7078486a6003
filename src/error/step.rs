// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step resolution and execution error types and utilities.
//!
//! This module defines errors that can occur when a step line is resolved
//! against registered step definitions and when the resolved step is invoked.

use std::any::Any;

use derive_more::with_trait::{Display, Error, From};

use super::AmbiguousMatchError;
use crate::step::StepId;

/// Errors of resolving and invoking a step line.
#[derive(Debug, Display, Error, From)]
pub enum StepError {
    /// Step line matches no step definition.
    #[display("No matching step found for: {step_text}")]
    #[from(ignore)]
    Undefined {
        /// Step line that couldn't be matched.
        step_text: String,
    },

    /// Step line matches multiple step definitions.
    #[display("{_0}")]
    Ambiguous(#[error(source)] AmbiguousMatchError),

    /// Captured value couldn't be converted into a step argument.
    #[display("{_0}")]
    ArgumentConversion(#[error(source)] ConversionError),

    /// Step handler failed.
    #[display(
        "Step {id} failed: {message}{}",
        location.as_ref().map(|l| format!(" at {l}")).unwrap_or_default()
    )]
    #[from(ignore)]
    Invocation {
        /// [`StepId`] of the failed step.
        id: StepId,

        /// Failure message.
        message: String,

        /// Location of the panic, if the handler panicked.
        location: Option<String>,
    },
}

/// Result type alias for step operations.
pub type StepResult<T> = Result<T, StepError>;

impl StepError {
    /// Creates a new [`StepError::Undefined`].
    #[must_use]
    pub fn undefined(step_text: impl Into<String>) -> Self {
        Self::Undefined { step_text: step_text.into() }
    }

    /// Creates a new [`StepError::Invocation`].
    #[must_use]
    pub fn invocation(
        id: StepId,
        message: impl Into<String>,
        location: Option<String>,
    ) -> Self {
        Self::Invocation { id, message: message.into(), location }
    }

    /// Returns the step line if this error was raised during resolution.
    #[must_use]
    pub fn step_text(&self) -> Option<&str> {
        match self {
            Self::Undefined { step_text } => Some(step_text),
            Self::Ambiguous(e) => Some(&e.step_text),
            Self::ArgumentConversion(_) | Self::Invocation { .. } => None,
        }
    }

    /// Indicates whether the step line has no step definition, so should be
    /// reported as pending rather than failed.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined { .. })
    }

    /// Indicates whether the step line matched multiple step definitions.
    #[must_use]
    pub const fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous(_))
    }
}

/// Error of converting captured values into step handler arguments.
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum ConversionError {
    /// Captured value cannot be parsed into the argument type.
    #[display(
        "Failed to parse argument {index} with value '{value}' to type \
         {ty}: {reason}"
    )]
    Parse {
        /// Zero-based position of the argument.
        index: usize,

        /// Captured value.
        value: String,

        /// Name of the argument type.
        ty: &'static str,

        /// Parsing error message.
        reason: String,
    },

    /// Number of captured values differs from the number of arguments.
    #[display("Step expects {expected} arguments, but {actual} were captured")]
    Arity {
        /// Number of handler arguments.
        expected: usize,

        /// Number of captured values.
        actual: usize,
    },

    /// Conversion of captured values panicked.
    #[display(
        "Argument conversion panicked: {message}{}",
        location.as_ref().map(|l| format!(" at {l}")).unwrap_or_default()
    )]
    Panic {
        /// Panic message.
        message: String,

        /// Location of the panic, if known.
        location: Option<String>,
    },
}

/// Trait for converting panic payloads to readable error messages.
pub trait PanicPayloadExt {
    /// Converts panic payload to a readable string.
    fn to_readable_string(&self) -> String;
}

impl PanicPayloadExt for Box<dyn Any + Send + 'static> {
    fn to_readable_string(&self) -> String {
        if let Some(s) = self.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = self.downcast_ref::<&str>() {
            (*s).to_owned()
        } else {
            "Unknown panic payload".to_owned()
        }
    }
}
