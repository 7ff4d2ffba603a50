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

//! Regular expression engine configuration

/// Limits applied when compiling a pattern
///
/// Patterns come straight from SQL text, so the compiled program size is
/// bounded to keep a single statement from exhausting memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegexConfig {
    /// Approximate upper bound on the size of a compiled program in bytes
    /// Default: 10485760 (10MB)
    pub size_limit: usize,

    /// Upper bound on the lazy DFA cache per pattern in bytes
    /// Default: 2097152 (2MB)
    pub dfa_size_limit: usize,

    /// Maximum nesting depth of groups and repetitions
    /// Default: 250
    pub nest_limit: u32,
}

impl Default for RegexConfig {
    fn default() -> Self {
        Self {
            size_limit: 10 * 1024 * 1024,   // 10MB
            dfa_size_limit: 2 * 1024 * 1024, // 2MB
            nest_limit: 250,
        }
    }
}

impl RegexConfig {
    /// Creates a RegexConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a RegexConfig for memory constrained deployments
    pub fn constrained() -> Self {
        Self {
            size_limit: 1024 * 1024,    // 1MB
            dfa_size_limit: 256 * 1024, // 256KB
            nest_limit: 64,
        }
    }

    /// Sets the compiled program size limit
    pub fn with_size_limit(mut self, size_limit: usize) -> Self {
        self.size_limit = size_limit;
        self
    }

    /// Sets the lazy DFA cache limit
    pub fn with_dfa_size_limit(mut self, dfa_size_limit: usize) -> Self {
        self.dfa_size_limit = dfa_size_limit;
        self
    }

    /// Sets the nesting limit
    pub fn with_nest_limit(mut self, nest_limit: u32) -> Self {
        self.nest_limit = nest_limit;
        self
    }
}
