// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Execution Context
//!
//! This module provides the state an expression can read besides the current
//! row: user variables (`@name`), session variables (`@@name`), stored
//! procedure parameters and the regular expression engine limits.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::core::Value;
use crate::functions::regexp::RegexConfig;

/// Execution context for expression evaluation
///
/// Variable maps are wrapped in Arc so that cloning the context per
/// statement is cheap. Variable names are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// User variables (SET @name = value)
    user_vars: Arc<FxHashMap<String, Value>>,
    /// Session variables (SET @@name = value)
    session_vars: Arc<FxHashMap<String, Value>>,
    /// Parameters of the stored procedure currently executing
    procedure_params: Arc<FxHashMap<String, Value>>,
    /// Limits for pattern compilation
    regex_config: RegexConfig,
}

impl ExecutionContext {
    /// Create a new empty execution context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an execution context with custom regex limits
    pub fn with_regex_config(regex_config: RegexConfig) -> Self {
        Self {
            regex_config,
            ..Self::new()
        }
    }

    /// Get a user variable by name
    pub fn get_user_var(&self, name: &str) -> Option<&Value> {
        self.user_vars.get(&name.to_lowercase())
    }

    /// Set a user variable
    pub fn set_user_var(&mut self, name: impl AsRef<str>, value: Value) {
        Arc::make_mut(&mut self.user_vars).insert(name.as_ref().to_lowercase(), value);
    }

    /// Get a session variable by name
    pub fn get_session_var(&self, name: &str) -> Option<&Value> {
        self.session_vars.get(&name.to_lowercase())
    }

    /// Set a session variable
    pub fn set_session_var(&mut self, name: impl AsRef<str>, value: Value) {
        Arc::make_mut(&mut self.session_vars).insert(name.as_ref().to_lowercase(), value);
    }

    /// Get a stored procedure parameter by name
    pub fn get_procedure_param(&self, name: &str) -> Option<&Value> {
        self.procedure_params.get(&name.to_lowercase())
    }

    /// Set a stored procedure parameter
    pub fn set_procedure_param(&mut self, name: impl AsRef<str>, value: Value) {
        Arc::make_mut(&mut self.procedure_params).insert(name.as_ref().to_lowercase(), value);
    }

    /// Limits applied when compiling regular expressions
    pub fn regex_config(&self) -> &RegexConfig {
        &self.regex_config
    }

    /// Replace the regular expression limits
    pub fn set_regex_config(&mut self, regex_config: RegexConfig) {
        self.regex_config = regex_config;
    }
}

/// Builder for ExecutionContext
pub struct ExecutionContextBuilder {
    ctx: ExecutionContext,
}

impl ExecutionContextBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            ctx: ExecutionContext::new(),
        }
    }

    /// Set a user variable
    pub fn user_var(mut self, name: impl AsRef<str>, value: Value) -> Self {
        self.ctx.set_user_var(name, value);
        self
    }

    /// Set a session variable
    pub fn session_var(mut self, name: impl AsRef<str>, value: Value) -> Self {
        self.ctx.set_session_var(name, value);
        self
    }

    /// Set a stored procedure parameter
    pub fn procedure_param(mut self, name: impl AsRef<str>, value: Value) -> Self {
        self.ctx.set_procedure_param(name, value);
        self
    }

    /// Set the regular expression limits
    pub fn regex_config(mut self, regex_config: RegexConfig) -> Self {
        self.ctx.regex_config = regex_config;
        self
    }

    /// Build the execution context
    pub fn build(self) -> ExecutionContext {
        self.ctx
    }
}

impl Default for ExecutionContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
