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

//! Regular Expression Functions
//!
//! - [`RegexpLikeFunction`] - REGEXP_LIKE(text, pattern[, flags])
//! - [`RegexpReplaceFunction`] - REGEXP_REPLACE(text, pattern, replacement[, position[, occurrence[, flags]]])
//!
//! Each function node owns a [`CompileCache`]. When the pattern and flag
//! arguments are row-independent the pattern is compiled on first evaluation
//! and reused until the node is closed; otherwise a pattern is compiled and
//! released within every evaluation. When all arguments are row-independent
//! the result itself is computed once ([`ConstantResult`]).
//!
//! Positions and lengths count characters, not bytes.

mod cache;
mod config;
mod flags;
mod like;
mod pattern;
mod replace;

pub use cache::{CompileCache, CompileState, ConstantResult};
pub use config::RegexConfig;
pub use flags::RegexFlags;
pub use like::RegexpLikeFunction;
pub use pattern::{
    clear_leak_handler, set_leak_handler, CompiledPattern, LeakHandler, LeakReport, MatchSpan,
    Pattern, PatternCompiler, PatternGuard,
};
pub use replace::RegexpReplaceFunction;

use std::fmt;

use crate::expression::ExprRef;

/// Write `NAME(arg, arg, ...)`
fn fmt_call(f: &mut fmt::Formatter<'_>, name: &str, args: &[ExprRef]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    write!(f, ")")
}
