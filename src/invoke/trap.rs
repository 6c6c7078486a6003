// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Catching panics of step bodies along with their locations.

use std::{
    cell::{Cell, RefCell},
    panic::{self, AssertUnwindSafe},
};

use once_cell::sync::Lazy;

use crate::error::PanicPayloadExt as _;

thread_local! {
    /// Whether the current thread runs inside [`run()`].
    static TRAPPING: Cell<bool> = const { Cell::new(false) };

    /// Location of the last panic trapped on the current thread.
    static LAST_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Panic hook recording locations of trapped panics, and delegating to the
/// previously installed hook otherwise.
///
/// Installed once, so hooks set afterwards override it.
static HOOK: Lazy<()> = Lazy::new(|| {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if TRAPPING.with(Cell::get) {
            let loc = info.location().map(|l| {
                format!("{}:{}:{}", l.file(), l.line(), l.column())
            });
            LAST_LOCATION.with(|last| *last.borrow_mut() = loc);
        } else {
            previous(info);
        }
    }));
});

/// Details of a trapped panic.
#[derive(Clone, Debug)]
pub(crate) struct PanicDetails {
    /// Panic message.
    pub(crate) payload: String,

    /// `file:line:column` the panic originated at, if known.
    pub(crate) location: Option<String>,
}

/// Runs `f` catching its panic, if any.
///
/// Trapped panics are not reported by the panic hook.
pub(crate) fn run<T>(f: impl FnOnce() -> T) -> Result<T, PanicDetails> {
    _ = Lazy::force(&HOOK);

    _ = LAST_LOCATION.with(|last| last.borrow_mut().take());
    let was_trapping = TRAPPING.with(|t| t.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    TRAPPING.with(|t| t.set(was_trapping));

    result.map_err(|payload| PanicDetails {
        payload: payload.to_readable_string(),
        location: LAST_LOCATION.with(|last| last.borrow_mut().take()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_value() {
        assert_eq!(run(|| 42).unwrap(), 42);
    }

    #[test]
    fn traps_panic_with_location() {
        let details = run(|| -> () { panic!("boom") }).unwrap_err();

        assert_eq!(details.payload, "boom");
        let loc = details.location.unwrap();
        assert!(loc.starts_with(file!()), "unexpected location: {loc}");
    }

    #[test]
    fn traps_formatted_panic() {
        let details = run(|| assert_eq!(1, 2, "numbers differ")).unwrap_err();

        assert!(details.payload.contains("numbers differ"));
    }

    #[test]
    fn nested_traps_restore_state() {
        let outer = run(|| {
            let inner = run(|| -> () { panic!("inner") });
            assert!(inner.is_err());
            panic!("outer")
        })
        .unwrap_err();

        assert_eq!(outer.payload, "outer");
        assert!(!TRAPPING.with(Cell::get));
    }
}
