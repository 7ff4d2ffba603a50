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

//! REGEXP_REPLACE function

use std::fmt;
use std::sync::Arc;

use super::cache::{CompileCache, ConstantResult};
use super::pattern::{CompiledPattern, MatchSpan, PatternCompiler};
use crate::core::{Collation, DataType, Error, Result, Row, Value};
use crate::executor::ExecutionContext;
use crate::expression::{all_row_independent, Expr, ExprRef, NodeKind};
use crate::functions::scalar::{coerce_to_i64, value_to_string};
use crate::functions::{FunctionDataType, FunctionInfo, FunctionSignature, ScalarFunction};
use crate::validate_arg_count;

const NAME: &str = "REGEXP_REPLACE";

const POSITION_OUT_OF_RANGE: &str = "index out of bounds for regular expression search";

/// REGEXP_REPLACE(text, pattern, replacement[, position[, occurrence[, flags]]])
///
/// Replaces matches of the pattern in the text, starting the search at the
/// 1-based character `position` (default 1). `occurrence` selects the N-th
/// match only; 0 (the default) replaces every match and a negative value
/// means the first. The replacement is inserted literally.
#[derive(Debug)]
pub struct RegexpReplaceFunction {
    args: Vec<ExprRef>,
    cache: CompileCache,
    result: ConstantResult,
}

impl RegexpReplaceFunction {
    fn build(args: Vec<ExprRef>) -> Self {
        let mut pattern_args = vec![Arc::clone(&args[1])];
        pattern_args.extend(args.get(5).cloned());
        let cache = CompileCache::new(all_row_independent(&pattern_args));
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
        let compiler = PatternCompiler::new(
            self.args[0].as_ref(),
            self.args[1].as_ref(),
            self.args.get(5).map(|flags| flags.as_ref()),
            NAME,
        );

        let replaced = self.cache.with_pattern(
            || compiler.compile(ctx, row),
            |re| self.replace(re, ctx, row),
        )?;

        Ok(replaced.flatten().unwrap_or(Value::null(DataType::Text)))
    }

    /// Validate the remaining arguments and run the substitution
    fn replace(
        &self,
        re: &CompiledPattern,
        ctx: &ExecutionContext,
        row: &Row,
    ) -> Result<Option<Value>> {
        let text = self.args[0].eval(ctx, row)?;
        let replacement = self.args[2].eval(ctx, row)?;
        if text.is_null() || replacement.is_null() {
            return Ok(None);
        }

        let text = value_to_string(&text);
        if text.is_empty() {
            return Ok(Some(Value::text(text)));
        }

        let position = match self.optional_int(3, 1, ctx, row)? {
            Some(position) => position,
            None => return Ok(None),
        };
        let occurrence = match self.optional_int(4, 0, ctx, row)? {
            Some(occurrence) => occurrence,
            None => return Ok(None),
        };

        if position <= 0 {
            return Err(Error::invalid_argument(format!(
                "{}: position must be positive, got {}",
                NAME, position
            )));
        }
        let start = char_offset(&text, position)
            .ok_or_else(|| Error::out_of_range(POSITION_OUT_OF_RANGE))?;
        // MySQL treats a negative occurrence as the first
        let occurrence = if occurrence < 0 { 1 } else { occurrence };

        let (prefix, suffix) = text.split_at(start);
        let spans = re.find_spans(suffix)?;
        let stitched = match stitch(suffix, &spans, &value_to_string(&replacement), occurrence) {
            Some(stitched) => stitched,
            None => return Ok(Some(Value::text(text))),
        };

        let mut result = String::with_capacity(prefix.len() + stitched.len());
        result.push_str(prefix);
        result.push_str(&stitched);
        Ok(Some(Value::text(result)))
    }

    /// Evaluate an optional integer argument, None if it is NULL
    fn optional_int(
        &self,
        index: usize,
        default: i64,
        ctx: &ExecutionContext,
        row: &Row,
    ) -> Result<Option<i64>> {
        match self.args.get(index) {
            Some(arg) => {
                let value = arg.eval(ctx, row)?;
                if value.is_null() {
                    Ok(None)
                } else {
                    coerce_to_i64(&value).map(Some)
                }
            }
            None => Ok(Some(default)),
        }
    }
}

/// Byte offset of the 1-based character `position`, None past the end
fn char_offset(text: &str, position: i64) -> Option<usize> {
    let index = usize::try_from(position - 1).ok()?;
    text.char_indices().nth(index).map(|(offset, _)| offset)
}

/// Replace the selected spans of `haystack`
///
/// Returns None when nothing is replaced: no spans, or `occurrence` beyond
/// the number of spans.
fn stitch(
    haystack: &str,
    spans: &[MatchSpan],
    replacement: &str,
    occurrence: i64,
) -> Option<String> {
    let selected: &[MatchSpan] = if occurrence == 0 {
        spans
    } else {
        let index = usize::try_from(occurrence - 1).ok()?;
        std::slice::from_ref(spans.get(index)?)
    };
    if selected.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(haystack.len() + replacement.len() * selected.len());
    let mut last = 0;
    for span in selected {
        out.push_str(&haystack[last..span.start]);
        out.push_str(replacement);
        last = span.end;
    }
    out.push_str(&haystack[last..]);
    Some(out)
}

impl fmt::Display for RegexpReplaceFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::fmt_call(f, NAME, &self.args)
    }
}

impl Expr for RegexpReplaceFunction {
    fn eval(&self, ctx: &ExecutionContext, row: &Row) -> Result<Value> {
        self.result.get_or_compute(|| self.compute(ctx, row))
    }

    fn data_type(&self) -> DataType {
        DataType::Text
    }

    fn collation(&self) -> Collation {
        self.args[0].collation()
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

impl ScalarFunction for RegexpReplaceFunction {
    fn name(&self) -> &str {
        NAME
    }

    fn info(&self) -> FunctionInfo {
        Self::function_info()
    }

    fn function_info() -> FunctionInfo {
        FunctionInfo::new(
            NAME,
            "Replaces occurrences of a regular expression in a string",
            FunctionSignature::new(
                FunctionDataType::String,
                vec![
                    FunctionDataType::String,
                    FunctionDataType::String,
                    FunctionDataType::String,
                    FunctionDataType::Integer,
                    FunctionDataType::Integer,
                    FunctionDataType::String,
                ],
                3,
                6,
            ),
        )
    }

    fn create(args: Vec<ExprRef>) -> Result<Self> {
        validate_arg_count!(args, NAME, 3, 6);
        Ok(Self::build(args))
    }
}
