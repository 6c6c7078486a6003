// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step [`Handler`]s and conversion of step functions into them.
//!
//! A step function declares its arguments in its signature, and every
//! argument is parsed from the corresponding capture group via [`FromStr`]:
//!
//! ```rust
//! # use cucumber_steps::IntoHandler as _;
//! let handler = (|a: u64, b: u64| assert_eq!(a + b, 5)).into_handler();
//! assert_eq!(handler.params(), Some(&["u64", "u64"][..]));
//! ```

use std::{any::type_name, fmt::Display, str::FromStr, sync::Arc};

use derive_more::with_trait::Debug;

use crate::error::ConversionError;

/// Deferred execution of a step body with already converted arguments.
pub type Call = Box<dyn FnOnce() -> Result<(), String>>;

/// Conversion of captured values into a [`Call`].
type Prepare =
    dyn Fn(&[String]) -> Result<Call, ConversionError> + Send + Sync;

/// Type-erased step body bound to a step [`Pattern`].
///
/// Remembers the types of its parameters to convert captured values before
/// the step body is executed.
///
/// [`Pattern`]: crate::step::Pattern
#[derive(Clone, Debug)]
pub struct Handler {
    /// Names of the parameter types, or [`None`] if captured values are
    /// passed as is.
    params: Option<Vec<&'static str>>,

    #[debug(skip)]
    prepare: Arc<Prepare>,
}

impl Handler {
    fn new(
        params: Option<Vec<&'static str>>,
        prepare: impl Fn(&[String]) -> Result<Call, ConversionError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self { params, prepare: Arc::new(prepare) }
    }

    /// Creates a [`Handler`] receiving all the captured values as text,
    /// whatever their number is.
    pub fn raw<F, R>(f: F) -> Self
    where
        F: Fn(&[String]) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        let f = Arc::new(f);
        Self::new(None, move |captures| {
            let (f, captures) = (Arc::clone(&f), captures.to_vec());
            let call: Call = Box::new(move || f(&captures).into_step_result());
            Ok(call)
        })
    }

    /// Creates a [`Handler`] doing nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self::raw(|_: &[String]| {})
    }

    /// Returns names of the parameter types of this [`Handler`], or [`None`]
    /// if it accepts any captured values as text.
    #[must_use]
    pub fn params(&self) -> Option<&[&'static str]> {
        self.params.as_deref()
    }

    /// Converts the `captures` into arguments of this [`Handler`], returning
    /// the step body ready to be executed.
    ///
    /// # Errors
    ///
    /// If any of the `captures` cannot be converted into the corresponding
    /// argument, or their number differs from the number of parameters.
    pub fn prepare(&self, captures: &[String]) -> Result<Call, ConversionError> {
        (self.prepare)(captures)
    }
}

/// Return value of a step function.
pub trait StepOutput {
    /// Converts this value into a step result, with a failure message on
    /// error.
    ///
    /// # Errors
    ///
    /// If the step failed.
    fn into_step_result(self) -> Result<(), String>;
}

impl StepOutput for () {
    fn into_step_result(self) -> Result<(), String> {
        Ok(())
    }
}

impl<E: Display> StepOutput for Result<(), E> {
    fn into_step_result(self) -> Result<(), String> {
        self.map_err(|e| e.to_string())
    }
}

/// Conversion of a step function into a [`Handler`].
///
/// `Args` is a tuple of the function arguments, disambiguating the
/// implementations for different arities.
pub trait IntoHandler<Args> {
    /// Converts this step function into a [`Handler`].
    fn into_handler(self) -> Handler;
}

impl IntoHandler<Handler> for Handler {
    fn into_handler(self) -> Handler {
        self
    }
}

/// Parses the captured value at `index` into a `T` argument.
fn parse_arg<T>(captures: &[String], index: usize) -> Result<T, ConversionError>
where
    T: FromStr,
    T::Err: Display,
{
    let value = captures.get(index).ok_or(ConversionError::Arity {
        expected: index + 1,
        actual: captures.len(),
    })?;
    value.parse().map_err(|e: T::Err| ConversionError::Parse {
        index,
        value: value.clone(),
        ty: type_name::<T>(),
        reason: e.to_string(),
    })
}

macro_rules! impl_into_handler {
    ($($ty:ident $var:ident),*) => {
        impl<F, R, $($ty,)*> IntoHandler<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: StepOutput,
            $(
                $ty: FromStr + 'static,
                <$ty as FromStr>::Err: Display,
            )*
        {
            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn into_handler(self) -> Handler {
                let params: Vec<&'static str> = vec![$(type_name::<$ty>()),*];
                let arity = params.len();
                let f = Arc::new(self);

                Handler::new(Some(params), move |captures: &[String]| {
                    if captures.len() != arity {
                        return Err(ConversionError::Arity {
                            expected: arity,
                            actual: captures.len(),
                        });
                    }

                    let mut index = 0;
                    $(
                        let $var = parse_arg::<$ty>(captures, index)?;
                        index += 1;
                    )*

                    let f = Arc::clone(&f);
                    let call: Call =
                        Box::new(move || f($($var),*).into_step_result());
                    Ok(call)
                })
            }
        }
    };
}

impl_into_handler!();
impl_into_handler!(A1 a1);
impl_into_handler!(A1 a1, A2 a2);
impl_into_handler!(A1 a1, A2 a2, A3 a3);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
impl_into_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);
