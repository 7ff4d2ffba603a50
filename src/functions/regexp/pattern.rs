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

//! Pattern compilation
//!
//! A [`Pattern`] is the pattern text plus its effective flags. Compiling it
//! yields a [`CompiledPattern`], an owned resource that must be released with
//! [`CompiledPattern::close`] exactly once. A compiled pattern dropped while
//! still open is reported to the leak handler (see [`set_leak_handler`]).
//!
//! [`PatternCompiler`] turns the pattern, text and flag arguments of a
//! function call into a compiled pattern:
//!
//! 1. A NULL pattern yields no pattern and no error.
//! 2. An empty pattern is rejected.
//! 3. Default flags come from the collation of the (text, pattern) pair: a
//!    case-insensitive collation implies `i`.
//! 4. An explicit flag argument replaces the default entirely; NULL flags
//!    yield no pattern.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};

use super::config::RegexConfig;
use super::flags::RegexFlags;
use crate::core::{resolve_coercibility, Error, Result, Row};
use crate::executor::ExecutionContext;
use crate::expression::{collation_coercibility, Expr};
use crate::functions::scalar::value_to_string;

/// Message for an empty pattern argument
const ILLEGAL_ARGUMENT: &str = "illegal argument to regular expression";

const PYTHON_NAMED_GROUP: &str = "(?P named groups are not supported";

/// Returns true if the pattern opens a `(?P<name>` group or a `(?P=name)`
/// reference outside a character class
///
/// The `regex` crate accepts both; MySQL rejects them.
fn has_python_named_group(source: &str) -> bool {
    let bytes = source.as_bytes();
    let mut in_class = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' if !in_class => {
                in_class = true;
                // A `]` right after the opening bracket is a literal
                if bytes.get(i + 1) == Some(&b'^') {
                    i += 1;
                }
                if bytes.get(i + 1) == Some(&b']') {
                    i += 1;
                }
            }
            b']' if in_class => in_class = false,
            b'(' if !in_class => {
                let rest = &bytes[i + 1..];
                if rest.starts_with(b"?P<") || rest.starts_with(b"?P=") {
                    return true;
                }
            }
            _ => {}
        }
        i += 1;
    }
    false
}

/// Pattern text together with its effective flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: Arc<str>,
    flags: RegexFlags,
}

impl Pattern {
    /// Create a pattern
    pub fn new(source: impl Into<Arc<str>>, flags: RegexFlags) -> Self {
        Self {
            source: source.into(),
            flags,
        }
    }

    /// Pattern text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Effective flags
    pub fn flags(&self) -> RegexFlags {
        self.flags
    }

    /// Returns true if letters must match case exactly
    pub fn is_case_sensitive(&self) -> bool {
        !self.flags.is_case_insensitive()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

/// Half-open byte range `[start, end)` of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    /// Length of the match in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for a zero-width match
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// =========================================================================
// Leak detection
// =========================================================================

/// Description of a compiled pattern that was dropped without being closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakReport {
    /// Pattern text
    pub pattern: String,
    /// Effective flags
    pub flags: RegexFlags,
}

/// Callback invoked for every leaked compiled pattern
pub type LeakHandler = Arc<dyn Fn(&LeakReport) + Send + Sync>;

static LEAK_HANDLER: RwLock<Option<LeakHandler>> = parking_lot::const_rwlock(None);

/// Install a leak handler, returning the previously installed one
pub fn set_leak_handler(handler: LeakHandler) -> Option<LeakHandler> {
    LEAK_HANDLER.write().replace(handler)
}

/// Restore the default leak handler, returning the previously installed one
pub fn clear_leak_handler() -> Option<LeakHandler> {
    LEAK_HANDLER.write().take()
}

fn report_leak(report: &LeakReport) {
    let handler = LEAK_HANDLER.read().clone();
    match handler {
        Some(handler) => handler(report),
        None => tracing::warn!(
            pattern = %report.pattern,
            flags = %report.flags,
            "compiled regular expression dropped without close"
        ),
    }
}

// =========================================================================
// Compiled pattern
// =========================================================================

/// A compiled regular expression owned by one expression instance
#[derive(Debug)]
pub struct CompiledPattern {
    pattern: Pattern,
    regex: Option<Regex>,
}

impl CompiledPattern {
    /// Compile a pattern within the configured limits
    ///
    /// `function` names the calling SQL function in error messages.
    pub fn compile(pattern: Pattern, config: &RegexConfig, function: &str) -> Result<Self> {
        if pattern.source().is_empty() {
            return Err(Error::regex_compile(function, ILLEGAL_ARGUMENT));
        }
        if has_python_named_group(pattern.source()) {
            return Err(Error::regex_compile(function, PYTHON_NAMED_GROUP));
        }

        let flags = pattern.flags();
        let regex = RegexBuilder::new(pattern.source())
            .case_insensitive(flags.contains(RegexFlags::CASE_INSENSITIVE))
            .multi_line(flags.contains(RegexFlags::MULTILINE))
            .dot_matches_new_line(flags.contains(RegexFlags::DOT_ALL))
            .crlf(!flags.contains(RegexFlags::UNIX_LINES))
            .size_limit(config.size_limit)
            .dfa_size_limit(config.dfa_size_limit)
            .nest_limit(config.nest_limit)
            .build()
            .map_err(|err| Error::regex_compile(function, err.to_string()))?;

        tracing::debug!(function, pattern = %pattern, "compiled regular expression");

        Ok(Self {
            pattern,
            regex: Some(regex),
        })
    }

    /// The pattern this was compiled from
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns true once the pattern has been released
    pub fn is_closed(&self) -> bool {
        self.regex.is_none()
    }

    /// Release the compiled program
    ///
    /// Returns true if this call released it; later calls are no-ops.
    pub fn close(&mut self) -> bool {
        self.regex.take().is_some()
    }

    fn regex(&self) -> Result<&Regex> {
        self.regex.as_ref().ok_or_else(|| {
            Error::internal(format!(
                "regular expression {} used after close",
                self.pattern
            ))
        })
    }

    /// Unanchored containment test
    pub fn is_match(&self, text: &str) -> Result<bool> {
        Ok(self.regex()?.is_match(text))
    }

    /// Leftmost-first, non-overlapping matches in order
    pub fn find_spans(&self, text: &str) -> Result<Vec<MatchSpan>> {
        Ok(self
            .regex()?
            .find_iter(text)
            .map(|m| MatchSpan {
                start: m.start(),
                end: m.end(),
            })
            .collect())
    }
}

impl Drop for CompiledPattern {
    fn drop(&mut self) {
        if self.regex.is_some() {
            report_leak(&LeakReport {
                pattern: self.pattern.source().to_string(),
                flags: self.pattern.flags(),
            });
        }
    }
}

/// Closes the wrapped pattern when dropped
///
/// Used for patterns compiled for a single call.
#[derive(Debug)]
pub struct PatternGuard(CompiledPattern);

impl PatternGuard {
    /// Take ownership of a compiled pattern
    pub fn new(pattern: CompiledPattern) -> Self {
        Self(pattern)
    }
}

impl Deref for PatternGuard {
    type Target = CompiledPattern;

    fn deref(&self) -> &CompiledPattern {
        &self.0
    }
}

impl Drop for PatternGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}

// =========================================================================
// Compiler
// =========================================================================

/// Resolves the pattern arguments of a function call and compiles them
#[derive(Debug, Clone, Copy)]
pub struct PatternCompiler<'a> {
    text: &'a dyn Expr,
    pattern: &'a dyn Expr,
    flags: Option<&'a dyn Expr>,
    function: &'a str,
}

impl<'a> PatternCompiler<'a> {
    /// Create a compiler over the text, pattern and optional flag arguments
    pub fn new(
        text: &'a dyn Expr,
        pattern: &'a dyn Expr,
        flags: Option<&'a dyn Expr>,
        function: &'a str,
    ) -> Self {
        Self {
            text,
            pattern,
            flags,
            function,
        }
    }

    /// Evaluate the pattern and flags, returning None if either is NULL
    pub fn resolve(&self, ctx: &ExecutionContext, row: &Row) -> Result<Option<Pattern>> {
        let pattern = self.pattern.eval(ctx, row)?;
        if pattern.is_null() {
            return Ok(None);
        }
        let source = value_to_string(&pattern);
        if source.is_empty() {
            return Err(Error::regex_compile(self.function, ILLEGAL_ARGUMENT));
        }

        let flags = match self.flags {
            Some(flags_expr) => {
                let flags = flags_expr.eval(ctx, row)?;
                if flags.is_null() {
                    return Ok(None);
                }
                RegexFlags::parse(&value_to_string(&flags), self.function)?
            }
            None => self.collation_flags()?,
        };

        Ok(Some(Pattern::new(source, flags)))
    }

    /// Resolve and compile, returning None if a governing input is NULL
    pub fn compile(&self, ctx: &ExecutionContext, row: &Row) -> Result<Option<CompiledPattern>> {
        match self.resolve(ctx, row)? {
            Some(pattern) => {
                CompiledPattern::compile(pattern, ctx.regex_config(), self.function).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Default flags implied by the collation of the text and pattern
    fn collation_flags(&self) -> Result<RegexFlags> {
        let (left, left_coercibility) = collation_coercibility(self.text);
        let (right, right_coercibility) = collation_coercibility(self.pattern);
        let collation = resolve_coercibility(left, left_coercibility, right, right_coercibility)?;
        if collation.is_case_sensitive() {
            Ok(RegexFlags::NONE)
        } else {
            Ok(RegexFlags::CASE_INSENSITIVE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Collation, DataType, Value};
    use crate::expression::{CollatedExpr, ColumnRef, Literal};
    use parking_lot::Mutex;

    fn compile(source: &str, flags: &str) -> Result<CompiledPattern> {
        let flags = RegexFlags::parse(flags, "TEST")?;
        CompiledPattern::compile(Pattern::new(source, flags), &RegexConfig::default(), "TEST")
    }

    #[test]
    fn test_compile_and_match() {
        let mut re = compile("^f.*$", "").unwrap();
        assert!(re.is_match("fofo").unwrap());
        assert!(!re.is_match("fo\r\nfo").unwrap());
        assert!(re.close());
    }

    #[test]
    fn test_line_terminator_flags() {
        let mut multi = compile("^f.*$", "m").unwrap();
        assert!(multi.is_match("fo\r\nfo").unwrap());
        multi.close();

        // `.` stops at \r unless only \n terminates lines
        let mut crlf = compile("o.f", "").unwrap();
        assert!(!crlf.is_match("o\rf").unwrap());
        crlf.close();
        let mut unix = compile("o.f", "u").unwrap();
        assert!(unix.is_match("o\rf").unwrap());
        assert!(!unix.is_match("o\nf").unwrap());
        unix.close();

        let mut dot_all = compile("o.f", "n").unwrap();
        assert!(dot_all.is_match("o\nf").unwrap());
        dot_all.close();
    }

    #[test]
    fn test_compile_errors_name_function() {
        let err = compile("", "").unwrap_err();
        assert_eq!(err, Error::regex_compile("TEST", ILLEGAL_ARGUMENT));

        let err = compile("(unclosed", "").unwrap_err();
        assert!(matches!(err, Error::RegexCompile { ref function, .. } if function == "TEST"));
    }

    #[test]
    fn test_python_named_groups_are_rejected() {
        assert!(has_python_named_group("(?P<foo_123>a)"));
        assert!(has_python_named_group("(a)(?P=foo)"));
        assert!(!has_python_named_group("(?<foo>a)"));
        assert!(!has_python_named_group("\\(?P<a>"));
        assert!(!has_python_named_group("[(?P<]"));
        assert!(!has_python_named_group("[]?P<(]"));

        let err = compile("(?P<foo_123>a)", "").unwrap_err();
        assert!(matches!(err, Error::RegexCompile { ref function, .. } if function == "TEST"));
        let mut re = compile("(?<foo>a)", "").unwrap();
        assert!(re.is_match("a").unwrap());
        re.close();
    }

    #[test]
    fn test_size_limit_is_enforced() {
        let config = RegexConfig::new().with_size_limit(64);
        let err = CompiledPattern::compile(
            Pattern::new("\\w{100}", RegexFlags::NONE),
            &config,
            "TEST",
        )
        .unwrap_err();
        assert!(matches!(err, Error::RegexCompile { .. }));
    }

    #[test]
    fn test_find_spans() {
        let mut re = compile("[a-z]+", "").unwrap();
        let spans = re.find_spans("ab 12 cde").unwrap();
        assert_eq!(
            spans,
            vec![MatchSpan { start: 0, end: 2 }, MatchSpan { start: 6, end: 9 }]
        );
        assert_eq!(spans[1].len(), 3);
        re.close();
    }

    #[test]
    fn test_use_after_close() {
        let mut re = compile("a", "").unwrap();
        assert!(re.close());
        assert!(re.is_closed());
        assert!(!re.close());
        assert!(matches!(re.is_match("a"), Err(Error::Internal { .. })));
        assert!(matches!(re.find_spans("a"), Err(Error::Internal { .. })));
    }

    #[test]
    fn test_leak_handler_reports_unclosed_patterns() {
        let seen: Arc<Mutex<Vec<LeakReport>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let previous = set_leak_handler(Arc::new(move |report: &LeakReport| {
            if report.pattern.starts_with("leak-unit-") {
                sink.lock().push(report.clone());
            }
        }));

        // Closed twice: no report
        let mut closed = compile("leak-unit-closed", "").unwrap();
        closed.close();
        closed.close();
        drop(closed);

        // Guarded: no report
        drop(PatternGuard::new(compile("leak-unit-guarded", "").unwrap()));

        // Leaked: exactly one report
        drop(compile("leak-unit-leaked", "i").unwrap());

        match previous {
            Some(handler) => {
                set_leak_handler(handler);
            }
            None => {
                clear_leak_handler();
            }
        }

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].pattern, "leak-unit-leaked");
        assert_eq!(seen[0].flags, RegexFlags::CASE_INSENSITIVE);
    }

    #[test]
    fn test_compiler_null_inputs() {
        let ctx = ExecutionContext::new();
        let text = Literal::new("abc");
        let null_pattern = Literal::null(DataType::Text);
        let compiler = PatternCompiler::new(&text, &null_pattern, None, "TEST");
        assert!(compiler.resolve(&ctx, &Row::new()).unwrap().is_none());

        let pattern = Literal::new("a");
        let null_flags = Literal::null(DataType::Text);
        let compiler = PatternCompiler::new(&text, &pattern, Some(&null_flags), "TEST");
        assert!(compiler.compile(&ctx, &Row::new()).unwrap().is_none());
    }

    #[test]
    fn test_compiler_collation_default() {
        let ctx = ExecutionContext::new();
        let row = Row::new();
        let pattern = Literal::new("ABC");

        let text = Literal::new("abc");
        let resolved = PatternCompiler::new(&text, &pattern, None, "TEST")
            .resolve(&ctx, &row)
            .unwrap()
            .unwrap();
        assert!(resolved.is_case_sensitive());

        let ci_column = ColumnRef::new(0, "c", DataType::Text)
            .with_collation(Collation::Utf8mb40900AiCi);
        let resolved = PatternCompiler::new(&ci_column, &pattern, None, "TEST")
            .resolve(&ctx, &row)
            .unwrap()
            .unwrap();
        assert!(!resolved.is_case_sensitive());

        // An explicit COLLATE on the pattern beats the column
        let collated = CollatedExpr::new(Arc::new(Literal::new("ABC")), Collation::Utf8mb4Bin);
        let resolved = PatternCompiler::new(&ci_column, &collated, None, "TEST")
            .resolve(&ctx, &row)
            .unwrap()
            .unwrap();
        assert!(resolved.is_case_sensitive());
    }

    #[test]
    fn test_compiler_flags_override_collation() {
        let ctx = ExecutionContext::new();
        let ci_text = CollatedExpr::new(Arc::new(Literal::new("abc")), Collation::Utf8mb40900AiCi);
        let pattern = Literal::new("ABC");
        let flags = Literal::new("m");
        let resolved = PatternCompiler::new(&ci_text, &pattern, Some(&flags), "TEST")
            .resolve(&ctx, &Row::new())
            .unwrap()
            .unwrap();
        assert_eq!(resolved.flags(), RegexFlags::MULTILINE);

        let bad_flags = Literal::new("z");
        let err = PatternCompiler::new(&ci_text, &pattern, Some(&bad_flags), "TEST")
            .resolve(&ctx, &Row::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_compiler_converts_non_text_pattern() {
        let ctx = ExecutionContext::new();
        let text = Literal::new("a1b");
        let pattern = Literal::new(Value::integer(1));
        let resolved = PatternCompiler::new(&text, &pattern, None, "TEST")
            .resolve(&ctx, &Row::new())
            .unwrap()
            .unwrap();
        assert_eq!(resolved.source(), "1");
        assert_eq!(resolved.to_string(), "/1/");
    }
}
