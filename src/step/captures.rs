// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Capture groups extracted from a matched step line.

use super::Pattern;

/// Name of a capturing group inside a [`Pattern`].
pub type CaptureName = Option<String>;

/// Values of the capture groups of a [`Pattern`] matching a step line.
///
/// The whole match is not included, so the first value belongs to the first
/// parenthesized sub-expression. A group which didn't participate in the match
/// has an empty value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Captures {
    names: Vec<CaptureName>,
    values: Vec<String>,
}

impl Captures {
    /// Extracts [`Captures`] of the given `line` matched by the `pattern`.
    ///
    /// Returns [`None`] if the `pattern` doesn't match the whole `line`.
    #[must_use]
    pub fn extract(pattern: &Pattern, line: &str) -> Option<Self> {
        let re = pattern.regex();
        let caps = re.captures(line)?;

        let (names, values) = re
            .capture_names()
            .zip(caps.iter())
            .skip(1)
            .map(|(name, group)| {
                (
                    name.map(str::to_owned),
                    group.map_or_else(String::new, |m| m.as_str().to_owned()),
                )
            })
            .unzip();

        Some(Self { names, values })
    }

    /// Returns the captured values in order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the value of the capture group by its `index` (starting at 0
    /// for the first group).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Returns the value of the named capture group, if any.
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .position(|n| n.as_deref() == Some(name))
            .and_then(|i| self.get(i))
    }

    /// Returns the number of captured groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Indicates whether the [`Pattern`] has no capture groups at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Captures {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let values: Vec<String> = iter.into_iter().map(Into::into).collect();
        Self { names: vec![None; values.len()], values }
    }
}
