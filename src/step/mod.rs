// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Definitions of a registered step ([`StepInfo`]) and its parts.
//!
//! - [`captures`]: capture groups extracted from a matched step line
//! - [`location`]: source location of a step definition
//! - [`pattern`]: compiled step pattern preserving its source text

pub mod captures;
pub mod location;
pub mod pattern;

use derive_more::with_trait::{Debug, Display, From, Into};

use crate::invoke::Handler;

pub use self::{
    captures::{CaptureName, Captures},
    location::Location,
    pattern::Pattern,
};

/// Identifier of a [`StepInfo`] inside a [`StepRegistry`].
///
/// Real steps are always identified by positive values, so `0` never refers
/// to a registered step.
///
/// [`StepRegistry`]: crate::StepRegistry
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub struct StepId(u64);

impl StepId {
    /// [`StepId`] assigned to the first step registered.
    pub const FIRST: Self = Self(1);

    /// Creates a new [`StepId`] out of the raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this [`StepId`].
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Registered step definition: a [`Pattern`] bound to a [`Handler`].
///
/// Immutable once constructed by a [`StepRegistry`].
///
/// [`StepRegistry`]: crate::StepRegistry
#[derive(Clone, Debug)]
pub struct StepInfo {
    id: StepId,
    pattern: Pattern,
    handler: Handler,
    location: Option<Location>,
}

impl StepInfo {
    pub(crate) const fn new(
        id: StepId,
        pattern: Pattern,
        handler: Handler,
        location: Option<Location>,
    ) -> Self {
        Self { id, pattern, handler, location }
    }

    /// Returns the [`StepId`] of this step.
    #[must_use]
    pub const fn id(&self) -> StepId {
        self.id
    }

    /// Returns the [`Pattern`] of this step.
    #[must_use]
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns the [`Handler`] bound to this step.
    #[must_use]
    pub const fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Returns the [`Location`] where this step was defined, if known.
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        self.location
    }
}
