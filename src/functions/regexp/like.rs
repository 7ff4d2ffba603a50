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

//! REGEXP_LIKE function

use std::fmt;
use std::sync::Arc;

use super::cache::{CompileCache, ConstantResult};
use super::pattern::PatternCompiler;
use crate::core::{DataType, Error, Result, Row, Value};
use crate::executor::ExecutionContext;
use crate::expression::{all_row_independent, Expr, ExprRef, NodeKind};
use crate::functions::scalar::value_to_string;
use crate::functions::{FunctionDataType, FunctionInfo, FunctionSignature, ScalarFunction};
use crate::validate_arg_count;

const NAME: &str = "REGEXP_LIKE";

/// REGEXP_LIKE(text, pattern[, flags])
///
/// Returns 1 if the pattern matches anywhere in the text, 0 if it does not,
/// and NULL if any argument is NULL.
#[derive(Debug)]
pub struct RegexpLikeFunction {
    args: Vec<ExprRef>,
    cache: CompileCache,
    result: ConstantResult,
}

impl RegexpLikeFunction {
    fn build(args: Vec<ExprRef>) -> Self {
        let cache = CompileCache::new(all_row_independent(&args[1..]));
        let result = ConstantResult::new(all_row_independent(&args));
        Self {
            args,
            cache,
            result,
        }
    }

    /// Number of pattern compilations performed by this node
    pub fn compile_count(&self) -> usize {
        self.cache.compile_count()
    }

    /// Whether the compiled pattern is reused across evaluations
    pub fn is_compile_once(&self) -> bool {
        self.cache.is_compile_once()
    }

    /// The retained result, for row-independent calls that were evaluated
    pub fn cached_result(&self) -> Option<Value> {
        self.result.get()
    }

    fn compute(&self, ctx: &ExecutionContext, row: &Row) -> Result<Value> {
        // A NULL text never reaches the compiler
        let text = self.args[0].eval(ctx, row)?;
        if text.is_null() {
            self.cache.ensure_open()?;
            return Ok(Value::null(DataType::Integer));
        }
        let text = value_to_string(&text);

        let compiler = PatternCompiler::new(
            self.args[0].as_ref(),
            self.args[1].as_ref(),
            self.args.get(2).map(|flags| flags.as_ref()),
            NAME,
        );

        let matched = self
            .cache
            .with_pattern(|| compiler.compile(ctx, row), |re| re.is_match(&text))?;

        Ok(match matched {
            Some(true) => Value::integer(1),
            Some(false) => Value::integer(0),
            None => Value::null(DataType::Integer),
        })
    }
}

impl fmt::Display for RegexpLikeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::fmt_call(f, NAME, &self.args)
    }
}

impl Expr for RegexpLikeFunction {
    fn eval(&self, ctx: &ExecutionContext, row: &Row) -> Result<Value> {
        self.result.get_or_compute(|| self.compute(ctx, row))
    }

    fn data_type(&self) -> DataType {
        DataType::Integer
    }

    fn children(&self) -> &[ExprRef] {
        &self.args
    }

    fn with_children(&self, children: Vec<ExprRef>) -> Result<ExprRef> {
        if children.len() != self.args.len() {
            return Err(Error::invalid_children_count(
                NAME,
                self.args.len(),
                children.len(),
            ));
        }
        Ok(Arc::new(Self::build(children)))
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Function
    }

    fn close(&self) -> Result<()> {
        self.cache.close();
        Ok(())
    }
}

impl ScalarFunction for RegexpLikeFunction {
    fn name(&self) -> &str {
        NAME
    }

    fn info(&self) -> FunctionInfo {
        Self::function_info()
    }

    fn function_info() -> FunctionInfo {
        FunctionInfo::new(
            NAME,
            "Returns 1 if the text matches the regular expression, 0 otherwise",
            FunctionSignature::new(
                FunctionDataType::Integer,
                vec![
                    FunctionDataType::String,
                    FunctionDataType::String,
                    FunctionDataType::String,
                ],
                2,
                3,
            ),
        )
    }

    fn create(args: Vec<ExprRef>) -> Result<Self> {
        validate_arg_count!(args, NAME, 2, 3);
        Ok(Self::build(args))
    }
}
