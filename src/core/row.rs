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

//! Row type - the column values an expression is evaluated against

use std::ops::Index;
use std::sync::Arc;

use super::error::{Error, Result};
use super::value::Value;

/// Internal storage for Row - either owned Vec or shared Arc
#[derive(Debug, Clone)]
enum RowStorage {
    /// Owned storage
    Owned(Vec<Value>),
    /// Shared storage - O(1) clone
    Shared(Arc<[Value]>),
}

impl RowStorage {
    #[inline]
    fn as_slice(&self) -> &[Value] {
        match self {
            RowStorage::Owned(v) => v,
            RowStorage::Shared(a) => a,
        }
    }
}

/// A row of column values
///
/// The row is read-only from the point of view of expression evaluation;
/// column references index into it by position.
#[derive(Debug, Clone)]
pub struct Row {
    storage: RowStorage,
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Row {
    /// Create a new empty row
    #[inline]
    pub fn new() -> Self {
        Self {
            storage: RowStorage::Owned(Vec::new()),
        }
    }

    /// Create a row from a vector of values
    #[inline]
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            storage: RowStorage::Owned(values),
        }
    }

    /// Create a row sharing an existing value slice
    #[inline]
    pub fn from_arc(values: Arc<[Value]>) -> Self {
        Self {
            storage: RowStorage::Shared(values),
        }
    }

    /// Number of columns in the row
    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the row has no columns
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Get a column value by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.as_slice().get(index)
    }

    /// Get a column value by index, failing when the index is out of bounds
    pub fn try_get(&self, index: usize) -> Result<&Value> {
        self.get(index)
            .ok_or(Error::ColumnIndexOutOfBounds { index })
    }

    /// Borrow all values
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        self.storage.as_slice()
    }
}

impl Index<usize> for Row {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::from_values(values)
    }
}
