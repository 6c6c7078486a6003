// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types of registering, resolving and invoking steps.
//!
//! # Modules
//!
//! - [`ambiguous`] - step line matching multiple step definitions
//! - [`registry`] - registration and lookup errors
//! - [`step`] - resolution, argument conversion and invocation errors

pub mod ambiguous;
pub mod registry;
pub mod step;

use derive_more::{Display, Error, From};

pub use self::{
    ambiguous::{AmbiguousMatchError, Candidate},
    registry::{RegistryError, RegistryResult},
    step::{ConversionError, PanicPayloadExt, StepError, StepResult},
};

/// Top-level error of this crate.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Registration or lookup failed.
    #[display("Registry error: {_0}")]
    Registry(#[error(source)] RegistryError),

    /// Step line resolution or invocation failed.
    #[display("Step error: {_0}")]
    Step(#[error(source)] StepError),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
