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

//! # Stoolap Regexp - MySQL-compatible regular expression functions
//!
//! The regular expression part of Stoolap's builtin function library:
//! `REGEXP_LIKE` and `REGEXP_REPLACE` with MySQL semantics.
//!
//! ## Key Features
//!
//! - **Compile once** - Constant patterns are compiled on first evaluation and
//!   reused for every row
//! - **Constant folding** - Calls whose arguments never change compute their
//!   result once
//! - **Collation aware** - Case-insensitive collations imply the `i` flag
//! - **Explicit lifecycle** - Compiled patterns are released on close, and
//!   leaks are reported
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use stoolap_regexp::core::{Row, Value};
//! use stoolap_regexp::executor::ExecutionContext;
//! use stoolap_regexp::expression::{close_tree, Expr, ExprRef, Literal};
//! use stoolap_regexp::functions::global_registry;
//!
//! let args: Vec<ExprRef> = vec![
//!     Arc::new(Literal::new("abc def ghi")),
//!     Arc::new(Literal::new("[a-z]")),
//!     Arc::new(Literal::new("X")),
//! ];
//! let expr = global_registry().create("REGEXP_REPLACE", args).unwrap();
//!
//! let ctx = ExecutionContext::new();
//! let value = expr.eval(&ctx, &Row::new()).unwrap();
//! assert_eq!(value, Value::text("XXX XXX XXX"));
//!
//! close_tree(expr.as_ref()).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Core types ([`DataType`], [`Value`], [`Row`], [`Collation`], [`Error`])
//! - [`expression`] - Expression nodes and tree visitors
//! - [`functions`] - Function registry and the REGEXP functions
//! - [`executor`] - Execution context

pub mod core;
pub mod executor;
pub mod expression;
pub mod functions;

// Re-export main types for convenience
pub use crate::core::{Collation, DataType, Error, Result, Row, Value};
pub use executor::{ExecutionContext, ExecutionContextBuilder};
pub use expression::{close_tree, Expr, ExprRef};
pub use functions::regexp::{RegexConfig, RegexFlags};
pub use functions::{global_registry, RegexpLikeFunction, RegexpReplaceFunction};
