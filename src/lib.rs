// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step definitions registry, matching engine and dispatcher of [Cucumber].
//!
//! Step definitions are regular expressions bound to step functions. They are
//! registered into a [`StepRegistry`], which resolves every step line of a
//! scenario to exactly one step definition with a [`MatchEngine`], while an
//! [`Invoker`] converts the captured values into typed arguments and runs the
//! step function.
//!
//! ```rust
//! use std::sync::{
//!     atomic::{AtomicU64, Ordering},
//!     Arc,
//! };
//!
//! use cucumber_steps::{MatchOutcome, StepRegistry};
//!
//! let total = Arc::new(AtomicU64::new(0));
//!
//! let mut steps = StepRegistry::new();
//! let add = steps.register(r"^I add (\d+) and (\d+)$", {
//!     let total = Arc::clone(&total);
//!     move |a: u64, b: u64| total.store(a + b, Ordering::SeqCst)
//! })?;
//!
//! assert_eq!(steps.run_step("I add 2 and 3")?, add);
//! assert_eq!(total.load(Ordering::SeqCst), 5);
//!
//! assert!(matches!(
//!     steps.matcher().resolve("I add 2 and three"),
//!     MatchOutcome::Undefined { .. },
//! ));
//! # Ok::<_, cucumber_steps::Error>(())
//! ```
//!
//! [Cucumber]: https://cucumber.io

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(missing_docs, unused_results)]

pub mod error;
pub mod invoke;
pub mod matcher;
pub mod registry;
pub mod step;

#[doc(inline)]
pub use self::{
    error::{
        AmbiguousMatchError, ConversionError, Error, RegistryError, Result,
        StepError,
    },
    invoke::{Handler, IntoHandler, InvocationOutcome, Invoker},
    matcher::{MatchEngine, MatchOutcome},
    registry::{Config, StepRegistry},
    step::{Captures, Location, Pattern, StepId, StepInfo},
};
