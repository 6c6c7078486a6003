// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Execution of resolved steps.
//!
//! [`Invoker`] is the boundary between the matching engine and step bodies:
//! whatever happens inside a step body (returned error or panic), the caller
//! receives a structured [`InvocationOutcome`].

pub mod handler;
mod trap;

use crate::{
    error::{ConversionError, StepError, StepResult},
    step::{Captures, StepInfo},
};

pub use self::handler::{Call, Handler, IntoHandler, StepOutput};

/// Result of invoking a step.
pub type InvocationOutcome = StepResult<()>;

/// Invoker of resolved [`StepInfo`]s.
///
/// # Panic hook
///
/// Panics of step handlers are caught and reported as errors without reaching
/// the panic hook. The interception is installed on top of the hook set at
/// the first invocation. A hook set later with [`std::panic::set_hook()`]
/// replaces it: panics are still caught, but reach that hook and lose their
/// locations. So custom hooks should be set before invoking any step.
///
/// ```rust
/// use std::{
///     panic,
///     sync::atomic::{AtomicBool, Ordering},
/// };
///
/// use cucumber_steps::StepRegistry;
///
/// static REPORTED: AtomicBool = AtomicBool::new(false);
/// panic::set_hook(Box::new(|_| REPORTED.store(true, Ordering::SeqCst)));
///
/// let mut steps = StepRegistry::new();
/// _ = steps.register("^it breaks$", || -> () { panic!("broken") })?;
/// let err = steps.run_step("it breaks").unwrap_err();
///
/// assert!(err.to_string().contains("broken"));
/// assert!(!REPORTED.load(Ordering::SeqCst));
/// # Ok::<_, cucumber_steps::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Invoker;

impl Invoker {
    /// Creates a new [`Invoker`].
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Converts the `captures` into arguments of the `step`'s [`Handler`] and
    /// executes it.
    ///
    /// # Errors
    ///
    /// - [`StepError::ArgumentConversion`] if the `captures` don't fit the
    ///   [`Handler`]'s parameters, or their conversion panicked. The step
    ///   body is not executed then.
    /// - [`StepError::Invocation`] if the step body returned an error or
    ///   panicked.
    pub fn invoke(
        &self,
        step: &StepInfo,
        captures: &Captures,
    ) -> InvocationOutcome {
        let id = step.id();
        let span = tracing::debug_span!("step", %id, pattern = %step.pattern());
        let _guard = span.enter();

        let prepared = trap::run(|| step.handler().prepare(captures.values()))
            .unwrap_or_else(|panic| {
                Err(ConversionError::Panic {
                    message: panic.payload,
                    location: panic.location,
                })
            });
        let call = match prepared {
            Ok(call) => call,
            Err(e) => {
                tracing::debug!(error = %e, "failed to convert step arguments");
                return Err(e.into());
            }
        };

        let err = match trap::run(call) {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(message)) => StepError::invocation(id, message, None),
            Err(panic) => {
                StepError::invocation(id, panic.payload, panic.location)
            }
        };
        tracing::debug!(error = %err, "step failed");
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    };

    use super::*;
    use crate::{
        registry::Config,
        step::{Pattern, StepId},
    };

    fn step(id: u64, re: &str, handler: impl Into<Handler>) -> StepInfo {
        StepInfo::new(
            StepId::new(id),
            Pattern::compile(re, &Config::default()).unwrap(),
            handler.into(),
            None,
        )
    }

    fn captures(values: &[&str]) -> Captures {
        values.iter().copied().collect()
    }

    #[test]
    fn invokes_with_converted_arguments() {
        let sum = Arc::new(AtomicI64::new(0));
        let handler = {
            let sum = Arc::clone(&sum);
            (move |a: i64, b: i64| sum.store(a + b, Ordering::SeqCst))
                .into_handler()
        };
        let step = step(3, r"^I add (\d+) and (\d+)$", handler);

        Invoker::new().invoke(&step, &captures(&["2", "3"])).unwrap();

        assert_eq!(sum.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn conversion_failure_skips_execution() {
        let sum = Arc::new(AtomicI64::new(0));
        let handler = {
            let sum = Arc::clone(&sum);
            (move |a: i64| sum.store(a, Ordering::SeqCst)).into_handler()
        };
        let step = step(1, r"^I have (\w+)$", handler);

        let err = Invoker::new().invoke(&step, &captures(&["lots"])).unwrap_err();

        assert!(matches!(
            err,
            StepError::ArgumentConversion(ConversionError::Parse { .. }),
        ));
        assert_eq!(sum.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn returned_error_becomes_invocation_error() {
        let handler = (|| Err::<(), _>("expected 5, got 4")).into_handler();
        let step = step(7, "^fails$", handler);

        let err = Invoker::new().invoke(&step, &Captures::default()).unwrap_err();

        match err {
            StepError::Invocation { id, message, location } => {
                assert_eq!(id, StepId::new(7));
                assert_eq!(message, "expected 5, got 4");
                assert_eq!(location, None);
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn panic_becomes_invocation_error() {
        let handler = (|n: u8| assert!(n > 10, "too small: {n}")).into_handler();
        let step = step(2, r"^(\d+)$", handler);

        let err = Invoker::new().invoke(&step, &captures(&["3"])).unwrap_err();

        match err {
            StepError::Invocation { id, message, location } => {
                assert_eq!(id, StepId::new(2));
                assert_eq!(message, "too small: 3");
                assert!(location.is_some_and(|l| l.contains(file!())));
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn panicking_conversion_is_trapped() {
        #[derive(Debug)]
        struct Explosive;

        impl std::str::FromStr for Explosive {
            type Err = String;

            fn from_str(_: &str) -> Result<Self, Self::Err> {
                panic!("parser exploded")
            }
        }

        let handler = (|_: Explosive| {}).into_handler();
        let step = step(4, "^(.*)$", handler);

        let err = Invoker::new().invoke(&step, &captures(&["x"])).unwrap_err();

        match err {
            StepError::ArgumentConversion(ConversionError::Panic {
                message,
                location,
            }) => {
                assert_eq!(message, "parser exploded");
                assert!(location.is_some_and(|l| l.contains(file!())));
            }
            e => panic!("unexpected error: {e}"),
        }
    }
}
