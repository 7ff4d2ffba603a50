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

//! Match-control flags
//!
//! The flag argument of the REGEXP functions is a string of single-character
//! modifiers applied left to right:
//!
//! | Flag | Meaning |
//! |------|---------|
//! | `c`  | case-sensitive (removes `i`) |
//! | `i`  | case-insensitive |
//! | `m`  | `^` and `$` match at line terminators |
//! | `n`  | `.` matches line terminators |
//! | `u`  | only `\n` is a line terminator |
//!
//! Since `c` and `i` cancel each other, the last one wins: `"ic"` is
//! case-sensitive and `"ci"` is not.

use std::fmt;

use crate::core::{Error, Result};

/// Canonical set of match-control flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegexFlags(u8);

impl RegexFlags {
    /// No flags
    pub const NONE: RegexFlags = RegexFlags(0);
    /// `i`: case-insensitive matching
    pub const CASE_INSENSITIVE: RegexFlags = RegexFlags(1);
    /// `m`: multi-line anchors
    pub const MULTILINE: RegexFlags = RegexFlags(1 << 1);
    /// `n`: `.` matches line terminators
    pub const DOT_ALL: RegexFlags = RegexFlags(1 << 2);
    /// `u`: Unix line endings only
    pub const UNIX_LINES: RegexFlags = RegexFlags(1 << 3);

    /// Flag characters in canonical order
    const CANONICAL: [(char, RegexFlags); 4] = [
        ('i', RegexFlags::CASE_INSENSITIVE),
        ('m', RegexFlags::MULTILINE),
        ('n', RegexFlags::DOT_ALL),
        ('u', RegexFlags::UNIX_LINES),
    ];

    /// Parse a flag string starting from an empty set
    ///
    /// `function` names the calling SQL function in error messages.
    pub fn parse(flags: &str, function: &str) -> Result<Self> {
        Self::NONE.apply(flags, function)
    }

    /// Apply a flag string on top of this set
    pub fn apply(mut self, flags: &str, function: &str) -> Result<Self> {
        for ch in flags.chars() {
            match ch {
                'c' => self.remove(Self::CASE_INSENSITIVE),
                'i' => self.insert(Self::CASE_INSENSITIVE),
                'm' => self.insert(Self::MULTILINE),
                'n' => self.insert(Self::DOT_ALL),
                'u' => self.insert(Self::UNIX_LINES),
                _ => {
                    return Err(Error::invalid_argument(format!(
                        "{}: unknown flag '{}'",
                        function, ch
                    )))
                }
            }
        }
        Ok(self)
    }

    /// Returns true if all flags of `other` are set
    #[inline]
    pub fn contains(&self, other: RegexFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the flags of `other`
    #[inline]
    pub fn insert(&mut self, other: RegexFlags) {
        self.0 |= other.0;
    }

    /// Clear the flags of `other`
    #[inline]
    pub fn remove(&mut self, other: RegexFlags) {
        self.0 &= !other.0;
    }

    /// Returns true if no flag is set
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if matching ignores case
    #[inline]
    pub fn is_case_insensitive(&self) -> bool {
        self.contains(Self::CASE_INSENSITIVE)
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ch, flag) in Self::CANONICAL {
            if self.contains(flag) {
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}
