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

//! Function Registry
//!
//! This module provides the function registry for looking up SQL functions
//! by name and building function nodes over analyzed arguments.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::regexp::{RegexpLikeFunction, RegexpReplaceFunction};
use super::{FunctionInfo, ScalarFunction};
use crate::core::{Error, Result};
use crate::expression::ExprRef;

/// Global function registry instance
static GLOBAL_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// Get the global function registry
#[inline]
pub fn global_registry() -> &'static FunctionRegistry {
    GLOBAL_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Type alias for scalar function factory
type ScalarFnFactory = Arc<dyn Fn(Vec<ExprRef>) -> Result<ExprRef> + Send + Sync>;

/// Function registry for SQL functions
pub struct FunctionRegistry {
    /// Scalar functions, keyed by upper-case name
    scalar_functions: RwLock<FxHashMap<String, ScalarFnFactory>>,
    /// Function info cache
    function_info: RwLock<FxHashMap<String, FunctionInfo>>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Create a new function registry with all built-in functions registered
    pub fn new() -> Self {
        let registry = Self {
            scalar_functions: RwLock::new(FxHashMap::default()),
            function_info: RwLock::new(FxHashMap::default()),
        };

        // Regular expression functions
        registry.register_scalar::<RegexpLikeFunction>();
        registry.register_scalar::<RegexpReplaceFunction>();

        registry
    }

    /// Register a scalar function
    pub fn register_scalar<F>(&self)
    where
        F: ScalarFunction + 'static,
    {
        let info = F::function_info();
        let name = info.name.to_uppercase();
        let factory: ScalarFnFactory =
            Arc::new(|args: Vec<ExprRef>| -> Result<ExprRef> { Ok(Arc::new(F::create(args)?)) });

        self.scalar_functions.write().insert(name.clone(), factory);
        self.function_info.write().insert(name, info);
    }

    /// Build a function node by name
    ///
    /// The argument count is validated by the function itself.
    pub fn create(&self, name: &str, args: Vec<ExprRef>) -> Result<ExprRef> {
        let factory = {
            let funcs = self.scalar_functions.read();
            funcs.get(&name.to_uppercase()).cloned()
        };
        match factory {
            Some(factory) => factory(args),
            None => Err(Error::invalid_argument(format!(
                "function not found: {}",
                name
            ))),
        }
    }

    /// Check if a function name is a scalar function
    pub fn is_scalar(&self, name: &str) -> bool {
        let funcs = self.scalar_functions.read();
        if funcs.contains_key(name) {
            return true;
        }
        funcs.contains_key(&name.to_uppercase())
    }

    /// Check if a function exists
    pub fn exists(&self, name: &str) -> bool {
        self.is_scalar(name)
    }

    /// Get function info by name
    pub fn get_info(&self, name: &str) -> Option<FunctionInfo> {
        let name = name.to_uppercase();
        self.function_info.read().get(&name).cloned()
    }

    /// List all scalar function names
    pub fn list_scalars(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scalar_functions.read().keys().cloned().collect();
        names.sort();
        names
    }
}
