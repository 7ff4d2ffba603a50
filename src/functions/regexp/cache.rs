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

//! Per-expression caches
//!
//! - [`CompileCache`] - compiles a pattern once per expression instance and
//!   owns it until the instance is closed
//! - [`ConstantResult`] - keeps the first result of an expression whose
//!   inputs never change between rows

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{RwLock, RwLockWriteGuard};

use super::pattern::{CompiledPattern, PatternGuard};
use crate::core::{Error, Result, Value};

/// Lifecycle of a cached compilation
///
/// `Uninitialized -> Compiling -> {Ready, Null, Failed} -> Closed`
#[derive(Debug, Default)]
pub enum CompileState {
    /// Nothing compiled yet
    #[default]
    Uninitialized,
    /// A compilation is in progress
    Compiling,
    /// Compiled and ready for matching
    Ready(CompiledPattern),
    /// A compile-governing input was NULL
    Null,
    /// Compilation failed; the error is returned on every evaluation
    Failed(Error),
    /// Released by close
    Closed,
}

impl CompileState {
    /// Short name of the state, for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            CompileState::Uninitialized => "uninitialized",
            CompileState::Compiling => "compiling",
            CompileState::Ready(_) => "ready",
            CompileState::Null => "null",
            CompileState::Failed(_) => "failed",
            CompileState::Closed => "closed",
        }
    }
}

fn closed_error() -> Error {
    Error::internal("regular expression evaluated after close")
}

/// One-shot compilation guard for one expression instance
///
/// When the pattern inputs are row-independent (`compile_once`), the first
/// evaluation compiles and every later evaluation reuses the outcome,
/// including a failure. Otherwise each evaluation compiles its own pattern
/// and releases it before returning.
#[derive(Debug)]
pub struct CompileCache {
    state: RwLock<CompileState>,
    compile_once: bool,
    compiles: AtomicUsize,
}

impl CompileCache {
    /// Create an empty cache
    pub fn new(compile_once: bool) -> Self {
        Self {
            state: RwLock::new(CompileState::Uninitialized),
            compile_once,
            compiles: AtomicUsize::new(0),
        }
    }

    /// Whether the compiled pattern is shared across evaluations
    pub fn is_compile_once(&self) -> bool {
        self.compile_once
    }

    /// Number of compilations performed so far
    pub fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::Relaxed)
    }

    /// Name of the current state
    pub fn state_name(&self) -> &'static str {
        self.state.read().name()
    }

    /// Run `f` against the compiled pattern
    ///
    /// `compile` is called only when a pattern is needed. Returns `Ok(None)`
    /// when a compile-governing input is NULL.
    pub fn with_pattern<T, C, F>(&self, compile: C, f: F) -> Result<Option<T>>
    where
        C: FnOnce() -> Result<Option<CompiledPattern>>,
        F: FnOnce(&CompiledPattern) -> Result<T>,
    {
        if !self.compile_once {
            return self.with_transient_pattern(compile, f);
        }

        {
            let state = self.state.read();
            if !matches!(*state, CompileState::Uninitialized) {
                return Self::apply(&state, f);
            }
        }

        let mut state = self.state.write();
        if matches!(*state, CompileState::Uninitialized) {
            *state = CompileState::Compiling;
            self.compiles.fetch_add(1, Ordering::Relaxed);
            *state = match compile() {
                Ok(Some(pattern)) => CompileState::Ready(pattern),
                Ok(None) => CompileState::Null,
                Err(err) => CompileState::Failed(err),
            };
            tracing::debug!(state = state.name(), "regular expression cache initialized");
        }
        let state = RwLockWriteGuard::downgrade(state);
        Self::apply(&state, f)
    }

    fn with_transient_pattern<T, C, F>(&self, compile: C, f: F) -> Result<Option<T>>
    where
        C: FnOnce() -> Result<Option<CompiledPattern>>,
        F: FnOnce(&CompiledPattern) -> Result<T>,
    {
        if matches!(*self.state.read(), CompileState::Closed) {
            return Err(closed_error());
        }
        self.compiles.fetch_add(1, Ordering::Relaxed);
        match compile()? {
            Some(pattern) => {
                let guard = PatternGuard::new(pattern);
                f(&guard).map(Some)
            }
            None => Ok(None),
        }
    }

    fn apply<T, F>(state: &CompileState, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&CompiledPattern) -> Result<T>,
    {
        match state {
            CompileState::Ready(pattern) => f(pattern).map(Some),
            CompileState::Null => Ok(None),
            CompileState::Failed(err) => Err(err.clone()),
            CompileState::Closed => Err(closed_error()),
            CompileState::Compiling => Err(Error::internal(
                "regular expression compilation did not complete",
            )),
            CompileState::Uninitialized => Err(Error::internal(
                "regular expression used before compilation",
            )),
        }
    }

    /// Release the cached pattern
    ///
    /// Safe to call any number of times, including before any evaluation.
    pub fn close(&self) {
        let mut state = self.state.write();
        if let CompileState::Ready(pattern) = &mut *state {
            pattern.close();
            tracing::debug!(pattern = %pattern.pattern(), "regular expression released");
        }
        *state = CompileState::Closed;
    }

    /// Returns true once close has been called
    pub fn is_closed(&self) -> bool {
        matches!(*self.state.read(), CompileState::Closed)
    }

    /// Fail with the use-after-close error once closed
    pub fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(closed_error());
        }
        Ok(())
    }
}

/// Set-once result box for row-independent expressions
///
/// When disabled every call computes afresh. When enabled the first
/// successful result is kept; concurrent first computations may race, but
/// only one value is ever retained and returned.
#[derive(Debug)]
pub struct ConstantResult {
    enabled: bool,
    value: RwLock<Option<Value>>,
}

impl ConstantResult {
    /// Create an empty box
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            value: RwLock::new(None),
        }
    }

    /// Whether results are retained
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The retained value, if any
    pub fn get(&self) -> Option<Value> {
        self.value.read().clone()
    }

    /// Return the retained value, computing and retaining it on first use
    ///
    /// Errors are returned as is and never retained.
    pub fn get_or_compute<F>(&self, compute: F) -> Result<Value>
    where
        F: FnOnce() -> Result<Value>,
    {
        if !self.enabled {
            return compute();
        }
        if let Some(value) = self.value.read().as_ref() {
            tracing::trace!(value = %value, "constant result reused");
            return Ok(value.clone());
        }
        let computed = compute()?;
        let mut slot = self.value.write();
        Ok(slot.get_or_insert(computed).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::regexp::{Pattern, RegexConfig, RegexFlags};
    use std::cell::Cell;

    fn compile(source: &str) -> Result<Option<CompiledPattern>> {
        CompiledPattern::compile(
            Pattern::new(source, RegexFlags::NONE),
            &RegexConfig::default(),
            "TEST",
        )
        .map(Some)
    }

    #[test]
    fn test_compile_once() {
        let cache = CompileCache::new(true);
        assert_eq!(cache.state_name(), "uninitialized");
        for text in ["abc", "xbz", "zzz"] {
            let matched = cache
                .with_pattern(|| compile("b"), |re| re.is_match(text))
                .unwrap();
            assert_eq!(matched, Some(text.contains('b')));
        }
        assert_eq!(cache.compile_count(), 1);
        assert_eq!(cache.state_name(), "ready");
        cache.close();
        assert!(cache.is_closed());
    }

    #[test]
    fn test_failure_is_cached() {
        let cache = CompileCache::new(true);
        let calls = Cell::new(0);
        for _ in 0..3 {
            let result = cache.with_pattern(
                || {
                    calls.set(calls.get() + 1);
                    compile("(")
                },
                |re| re.is_match("x"),
            );
            assert!(matches!(result, Err(Error::RegexCompile { .. })));
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.state_name(), "failed");
    }

    #[test]
    fn test_null_is_cached() {
        let cache = CompileCache::new(true);
        for _ in 0..2 {
            let result = cache.with_pattern(|| Ok(None), |re| re.is_match("x"));
            assert_eq!(result, Ok(None));
        }
        assert_eq!(cache.compile_count(), 1);
        assert_eq!(cache.state_name(), "null");
    }

    #[test]
    fn test_transient_patterns_compile_per_call() {
        let cache = CompileCache::new(false);
        for source in ["a", "b", "c"] {
            let matched = cache
                .with_pattern(|| compile(source), |re| re.is_match("abc"))
                .unwrap();
            assert_eq!(matched, Some(true));
        }
        assert_eq!(cache.compile_count(), 3);
        assert_eq!(cache.state_name(), "uninitialized");
    }

    #[test]
    fn test_eval_after_close() {
        let cache = CompileCache::new(true);
        cache
            .with_pattern(|| compile("a"), |re| re.is_match("a"))
            .unwrap();
        cache.close();
        cache.close();
        let result = cache.with_pattern(|| compile("a"), |re| re.is_match("a"));
        assert!(matches!(result, Err(Error::Internal { .. })));

        let transient = CompileCache::new(false);
        transient.close();
        let result = transient.with_pattern(|| compile("a"), |re| re.is_match("a"));
        assert!(matches!(result, Err(Error::Internal { .. })));
    }

    #[test]
    fn test_close_before_use_is_harmless() {
        let cache = CompileCache::new(true);
        assert!(cache.ensure_open().is_ok());
        cache.close();
        assert!(cache.is_closed());
        assert!(matches!(cache.ensure_open(), Err(Error::Internal { .. })));
        assert_eq!(cache.compile_count(), 0);
    }

    #[test]
    fn test_constant_result() {
        let box_ = ConstantResult::new(true);
        assert!(box_.get().is_none());
        let first = box_.get_or_compute(|| Ok(Value::integer(1))).unwrap();
        let second = box_.get_or_compute(|| Ok(Value::integer(2))).unwrap();
        assert_eq!(first, Value::integer(1));
        assert_eq!(second, Value::integer(1));
        assert_eq!(box_.get(), Some(Value::integer(1)));
    }

    #[test]
    fn test_constant_result_disabled_or_failing() {
        let disabled = ConstantResult::new(false);
        assert_eq!(
            disabled.get_or_compute(|| Ok(Value::integer(1))).unwrap(),
            Value::integer(1)
        );
        assert_eq!(
            disabled.get_or_compute(|| Ok(Value::integer(2))).unwrap(),
            Value::integer(2)
        );
        assert!(disabled.get().is_none());

        let enabled = ConstantResult::new(true);
        assert!(enabled
            .get_or_compute(|| Err(Error::internal("boom")))
            .is_err());
        assert!(enabled.get().is_none());
    }

    #[test]
    fn test_concurrent_compile_once() {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(CompileCache::new(true));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    cache
                        .with_pattern(|| compile("[0-9]+"), |re| re.is_match("a1"))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(true));
        }
        assert_eq!(cache.compile_count(), 1);
        cache.close();
    }

    #[test]
    fn test_concurrent_constant_result_converges() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        const THREADS: usize = 8;
        let result = Arc::new(ConstantResult::new(true));
        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let result = Arc::clone(&result);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    // Every thread offers a different value; one must win
                    result
                        .get_or_compute(|| Ok(Value::integer(i as i64)))
                        .unwrap()
                })
            })
            .collect();

        let values: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let retained = result.get().unwrap();
        assert!(values.iter().all(|value| *value == retained));
    }
}
