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

//! Error types for the regular expression functions
//!
//! Every failure surfaced to the SQL layer is one of the variants below, so
//! callers only need to match on the variant to know the kind of error.

use thiserror::Error;

/// Result type alias for function evaluation
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for expression evaluation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Argument errors
    // =========================================================================
    /// Invalid argument for function
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Argument outside of the accepted range
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Wrong number of children passed to `with_children`
    #[error("invalid children count for {expression}, expected {expected}, got {got}")]
    InvalidChildrenCount {
        expression: String,
        expected: usize,
        got: usize,
    },

    // =========================================================================
    // Regular expression errors
    // =========================================================================
    /// Pattern rejected before or during compilation
    #[error("{function}: {message}")]
    RegexCompile { function: String, message: String },

    // =========================================================================
    // Collation errors
    // =========================================================================
    /// Two collations cannot be combined
    #[error("illegal mix of collations ({left}) and ({right})")]
    CollationIllegalMix { left: String, right: String },

    /// Collation name is not known
    #[error("unknown collation: '{0}'")]
    UnknownCollation(String),

    // =========================================================================
    // Value errors
    // =========================================================================
    /// Type conversion error
    #[error("type conversion error: cannot convert {from} to {to}")]
    TypeConversion { from: String, to: String },

    /// Column index outside of the row
    #[error("column index {index} out of bounds")]
    ColumnIndexOutOfBounds { index: usize },

    // =========================================================================
    // Other errors
    // =========================================================================
    /// Internal error for unexpected conditions
    #[error("{message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a new OutOfRange error
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Error::OutOfRange(message.into())
    }

    /// Create a new InvalidChildrenCount error
    pub fn invalid_children_count(
        expression: impl Into<String>,
        expected: usize,
        got: usize,
    ) -> Self {
        Error::InvalidChildrenCount {
            expression: expression.into(),
            expected,
            got,
        }
    }

    /// Create a new RegexCompile error
    pub fn regex_compile(function: impl Into<String>, message: impl Into<String>) -> Self {
        Error::RegexCompile {
            function: function.into(),
            message: message.into(),
        }
    }

    /// Create a new CollationIllegalMix error
    pub fn collation_illegal_mix(left: impl Into<String>, right: impl Into<String>) -> Self {
        Error::CollationIllegalMix {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create a new TypeConversion error
    pub fn type_conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        Error::TypeConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Check if this error was raised while validating user arguments
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument(_) | Error::OutOfRange(_) | Error::TypeConversion { .. }
        )
    }
}
