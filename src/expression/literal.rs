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

//! Literal expression

use std::fmt;
use std::sync::Arc;

use super::{Expr, ExprRef, NodeKind};
use crate::core::{Collation, DataType, Error, Result, Row, Value};
use crate::executor::ExecutionContext;

/// A constant value
#[derive(Debug, Clone)]
pub struct Literal {
    value: Value,
    collation: Collation,
}

impl Literal {
    /// Create a literal with the default collation
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            collation: Collation::default(),
        }
    }

    /// Create a typed NULL literal
    pub fn null(data_type: DataType) -> Self {
        Self::new(Value::null(data_type))
    }

    /// Set the collation of a text literal (`_utf8mb4'abc'` style introducers)
    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    /// The constant value
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            other => write!(f, "{}", other),
        }
    }
}

impl Expr for Literal {
    fn eval(&self, _ctx: &ExecutionContext, _row: &Row) -> Result<Value> {
        Ok(self.value.clone())
    }

    fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    fn collation(&self) -> Collation {
        self.collation
    }

    fn nullable(&self) -> bool {
        self.value.is_null()
    }

    fn children(&self) -> &[ExprRef] {
        &[]
    }

    fn with_children(&self, children: Vec<ExprRef>) -> Result<ExprRef> {
        if !children.is_empty() {
            return Err(Error::invalid_children_count("literal", 0, children.len()));
        }
        Ok(Arc::new(self.clone()))
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Literal
    }
}
