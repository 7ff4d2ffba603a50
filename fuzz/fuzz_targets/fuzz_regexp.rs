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

#![no_main]

use std::sync::Arc;

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use stoolap_regexp::core::{Row, Value};
use stoolap_regexp::executor::ExecutionContext;
use stoolap_regexp::expression::{close_tree, Expr, ExprRef, Literal};
use stoolap_regexp::functions::global_registry;
use stoolap_regexp::RegexConfig;

/// One REGEXP_LIKE or REGEXP_REPLACE call with arbitrary arguments
#[derive(Debug, Arbitrary)]
enum RegexpCall {
    Like {
        text: String,
        pattern: String,
        flags: Option<String>,
    },
    Replace {
        text: String,
        pattern: String,
        replacement: String,
        position: Option<i64>,
        occurrence: Option<i64>,
        flags: Option<String>,
    },
}

fn lit(value: impl Into<Value>) -> ExprRef {
    Arc::new(Literal::new(value))
}

impl RegexpCall {
    fn build(self) -> (&'static str, Vec<ExprRef>) {
        match self {
            RegexpCall::Like {
                text,
                pattern,
                flags,
            } => {
                let mut args = vec![lit(text), lit(pattern)];
                args.extend(flags.map(lit));
                ("REGEXP_LIKE", args)
            }
            RegexpCall::Replace {
                text,
                pattern,
                replacement,
                position,
                occurrence,
                flags,
            } => {
                let mut args = vec![lit(text), lit(pattern), lit(replacement)];
                // Trailing arguments are positional
                if let Some(position) = position {
                    args.push(lit(position));
                    if let Some(occurrence) = occurrence {
                        args.push(lit(occurrence));
                        args.extend(flags.map(lit));
                    }
                }
                ("REGEXP_REPLACE", args)
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    if let Ok(call) = RegexpCall::arbitrary(&mut unstructured) {
        let (name, args) = call.build();
        if let Ok(expr) = global_registry().create(name, args) {
            let ctx = ExecutionContext::with_regex_config(RegexConfig::constrained());
            // Errors are fine, panics are not
            let _ = expr.eval(&ctx, &Row::new());
            let _ = close_tree(expr.as_ref());
        }
    }
});
