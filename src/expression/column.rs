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

//! Column reference expression

use std::fmt;
use std::sync::Arc;

use super::{Expr, ExprRef, NodeKind};
use crate::core::{Collation, DataType, Error, Result, Row, Value};
use crate::executor::ExecutionContext;

/// Reference to a column of the current row, resolved to its position
#[derive(Debug, Clone)]
pub struct ColumnRef {
    index: usize,
    name: String,
    data_type: DataType,
    collation: Collation,
    nullable: bool,
}

impl ColumnRef {
    /// Create a nullable column reference with the default collation
    pub fn new(index: usize, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            index,
            name: name.into(),
            data_type,
            collation: Collation::default(),
            nullable: true,
        }
    }

    /// Set the column collation
    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    /// Set whether the column accepts NULL
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Position of the column within the row
    pub fn index(&self) -> usize {
        self.index
    }

    /// Column name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Expr for ColumnRef {
    fn eval(&self, _ctx: &ExecutionContext, row: &Row) -> Result<Value> {
        row.try_get(self.index).cloned()
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn collation(&self) -> Collation {
        self.collation
    }

    fn nullable(&self) -> bool {
        self.nullable
    }

    fn children(&self) -> &[ExprRef] {
        &[]
    }

    fn with_children(&self, children: Vec<ExprRef>) -> Result<ExprRef> {
        if !children.is_empty() {
            return Err(Error::invalid_children_count(&self.name, 0, children.len()));
        }
        Ok(Arc::new(self.clone()))
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Column
    }
}
