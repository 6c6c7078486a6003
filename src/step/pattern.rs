// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Pattern`] of a step definition.
//!
//! A [`Pattern`] keeps the source text exactly as it was registered, while
//! matching against its syntax tree wrapped into start and end anchors, so a
//! step line is matched only when the whole line satisfies the pattern.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use derive_more::with_trait::{Debug, Display};
use regex::{Regex, RegexBuilder};
use regex_syntax::{
    hir::{Hir, Look},
    ParserBuilder,
};

use crate::registry::Config;

/// Compiled step [`Regex`] along with its original source text.
///
/// Implements [`Eq`], [`Ord`] and [`Hash`] by the source text.
#[derive(Clone, Debug, Display)]
#[display("{source}")]
pub struct Pattern {
    /// Source text as registered.
    source: String,

    /// `source` anchored to match the whole line.
    #[debug(skip)]
    regex: Regex,
}

impl Pattern {
    /// Compiles the given `source` text with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the `source` is not a valid regular expression.
    pub fn compile(source: &str, config: &Config) -> Result<Self, regex::Error> {
        _ = configured(&mut RegexBuilder::new(source), config).build()?;

        // Anchors are added to the parsed tree rather than to the text, so
        // flags and comments of the `source` cannot swallow them.
        let hir = ParserBuilder::new()
            .case_insensitive(config.case_insensitive)
            .unicode(config.unicode)
            .build()
            .parse(source)
            .map_err(|e| regex::Error::Syntax(e.to_string()))?;
        let anchored =
            Hir::concat(vec![Hir::look(Look::Start), hir, Hir::look(Look::End)]);

        let regex =
            configured(&mut RegexBuilder::new(&anchored.to_string()), config)
                .build()?;

        Ok(Self { source: source.to_owned(), regex })
    }

    /// Returns the source text this [`Pattern`] was registered with.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the anchored [`Regex`] used for matching.
    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Checks whether the whole `line` is matched by this [`Pattern`].
    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

fn configured<'b>(
    builder: &'b mut RegexBuilder,
    config: &Config,
) -> &'b mut RegexBuilder {
    builder
        .case_insensitive(config.case_insensitive)
        .unicode(config.unicode)
        .size_limit(config.size_limit)
}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl PartialOrd for Pattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pattern {
    fn cmp(&self, other: &Self) -> Ordering {
        self.source.cmp(&other.source)
    }
}
