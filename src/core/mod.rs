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

//! Core types and definitions
//!
//! - [`DataType`] - SQL data types (INTEGER, TEXT, FLOAT, etc.)
//! - [`Value`] - Runtime values with type information
//! - [`Row`] - A row of column values
//! - [`Collation`] - Collations, character sets and coercibility
//! - [`Error`] - Error type for all evaluation failures

pub mod collation;
pub mod error;
pub mod row;
pub mod types;
pub mod value;

// Re-export main types for convenience
pub use collation::{resolve_coercibility, CharacterSet, Coercibility, Collation};
pub use error::{Error, Result};
pub use row::Row;
pub use types::DataType;
pub use value::Value;
