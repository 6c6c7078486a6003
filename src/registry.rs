// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`StepRegistry`] storing registered step definitions.
//!
//! A [`StepRegistry`] is populated during a setup phase and then only read
//! while steps are executed. Mutation requires exclusive access, while
//! resolving and invoking steps is done through a shared reference, so any
//! number of scenarios may be executed in parallel against the same
//! [`StepRegistry`].

use linked_hash_map::LinkedHashMap;
use smart_default::SmartDefault;

use crate::{
    error::{RegistryError, RegistryResult, StepResult},
    invoke::{IntoHandler, Invoker},
    matcher::MatchEngine,
    step::{Location, Pattern, StepId, StepInfo},
};

/// Options of compiling step patterns.
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub struct Config {
    /// Match step lines case-insensitively.
    pub case_insensitive: bool,

    /// Enable Unicode support in patterns (`\w` matching non-ASCII letters,
    /// for example).
    #[default = true]
    pub unicode: bool,

    /// Approximate size limit (in bytes) of a single compiled pattern.
    #[default(10 * (1 << 20))]
    pub size_limit: usize,
}

/// Registry of step definitions.
///
/// Assigns every registered step a [`StepId`] greater than any other
/// [`StepId`] in use, and keeps steps in the order they were registered.
#[derive(Clone, Debug)]
pub struct StepRegistry {
    steps: LinkedHashMap<StepId, StepInfo>,
    next_id: u64,
    config: Config,
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl StepRegistry {
    /// Creates an empty [`StepRegistry`] with the default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty [`StepRegistry`] compiling patterns with the given
    /// [`Config`].
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            steps: LinkedHashMap::new(),
            next_id: StepId::FIRST.get(),
            config,
        }
    }

    /// Returns the [`Config`] patterns are compiled with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Registers a new step matching the `pattern` and executing the
    /// `handler`.
    ///
    /// # Errors
    ///
    /// - If the `pattern` is not a valid regular expression.
    /// - If no [`StepId`]s are left to assign.
    #[track_caller]
    pub fn register<Args>(
        &mut self,
        pattern: &str,
        handler: impl IntoHandler<Args>,
    ) -> RegistryResult<StepId> {
        let location = Location::caller();
        let pattern = self.compile(pattern)?;

        let id = StepId::new(self.next_id);
        // The counter only lands on a taken id once it saturated.
        if self.steps.contains_key(&id) {
            return Err(RegistryError::IdsExhausted);
        }
        self.next_id = self.next_id.saturating_add(1);

        self.insert(StepInfo::new(
            id,
            pattern,
            handler.into_handler(),
            Some(location),
        ));
        Ok(id)
    }

    /// Registers a new step with the `desired_id`, bypassing normal
    /// [`StepId`] assignment.
    ///
    /// Intended for building deterministic registries in tests only. Further
    /// [`StepRegistry::register()`] calls assign [`StepId`]s greater than the
    /// `desired_id`.
    ///
    /// # Errors
    ///
    /// - If the `desired_id` is `0` or is already in use.
    /// - If the `pattern` is not a valid regular expression.
    #[track_caller]
    pub fn register_with_id<Args>(
        &mut self,
        desired_id: StepId,
        pattern: &str,
        handler: impl IntoHandler<Args>,
    ) -> RegistryResult<()> {
        let location = Location::caller();
        if desired_id.get() == 0 {
            return Err(RegistryError::ReservedId);
        }
        if self.steps.contains_key(&desired_id) {
            return Err(RegistryError::DuplicateId { id: desired_id });
        }
        let pattern = self.compile(pattern)?;

        self.next_id = self.next_id.max(desired_id.get().saturating_add(1));

        self.insert(StepInfo::new(
            desired_id,
            pattern,
            handler.into_handler(),
            Some(location),
        ));
        Ok(())
    }

    fn compile(&self, pattern: &str) -> RegistryResult<Pattern> {
        Pattern::compile(pattern, &self.config).map_err(|source| {
            RegistryError::InvalidPattern { pattern: pattern.to_owned(), source }
        })
    }

    fn insert(&mut self, step: StepInfo) {
        tracing::debug!(
            id = %step.id(),
            pattern = %step.pattern(),
            location = ?step.location(),
            "registered step definition"
        );
        _ = self.steps.insert(step.id(), step);
    }

    /// Removes all the registered steps, and starts assigning [`StepId`]s
    /// from the beginning.
    pub fn clear(&mut self) {
        tracing::debug!(count = self.steps.len(), "clearing step definitions");
        self.steps.clear();
        self.next_id = StepId::FIRST.get();
    }

    /// Returns the number of registered steps.
    #[must_use]
    pub fn count(&self) -> usize {
        self.steps.len()
    }

    /// Indicates whether no steps are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the step registered with the given `id`.
    ///
    /// # Errors
    ///
    /// If no step is registered with the `id`.
    pub fn find_by_id(&self, id: StepId) -> RegistryResult<&StepInfo> {
        self.steps.get(&id).ok_or(RegistryError::NotFound { id })
    }

    /// Returns the [`StepId`] of the step registered with exactly the given
    /// pattern `text`.
    ///
    /// This compares pattern source texts only, so it doesn't tell which
    /// step a line would be resolved to. Use [`StepRegistry::matcher()`] for
    /// that.
    #[must_use]
    pub fn find_by_pattern_text(&self, text: &str) -> Option<StepId> {
        self.steps
            .values()
            .find(|step| step.pattern().as_str() == text)
            .map(StepInfo::id)
    }

    /// Iterates over the registered steps in the order of registration.
    pub fn iter(&self) -> impl Iterator<Item = &StepInfo> + '_ {
        self.steps.values()
    }

    /// Returns a [`MatchEngine`] resolving step lines against this registry.
    #[must_use]
    pub const fn matcher(&self) -> MatchEngine<'_> {
        MatchEngine::new(self)
    }

    /// Resolves the step `line` and invokes the step it resolves to.
    ///
    /// # Errors
    ///
    /// If the `line` doesn't resolve to exactly one step, or the step fails.
    pub fn run_step(&self, line: &str) -> StepResult<StepId> {
        let (step, captures) = self.matcher().resolve(line).into_result()?;
        Invoker::new().invoke(step, &captures)?;
        Ok(step.id())
    }
}

impl<'r> IntoIterator for &'r StepRegistry {
    type Item = &'r StepInfo;
    type IntoIter = linked_hash_map::Values<'r, StepId, StepInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.values()
    }
}
