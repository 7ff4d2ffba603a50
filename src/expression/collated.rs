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

//! Explicit collation clause (`expr COLLATE name`)

use std::fmt;
use std::sync::Arc;

use super::{Expr, ExprRef, NodeKind};
use crate::core::{Collation, DataType, Error, Result, Row, Value};
use crate::executor::ExecutionContext;

/// Wraps a text expression and overrides its collation
#[derive(Debug, Clone)]
pub struct CollatedExpr {
    children: Vec<ExprRef>,
    collation: Collation,
}

impl CollatedExpr {
    /// Create a collated expression
    pub fn new(child: ExprRef, collation: Collation) -> Self {
        Self {
            children: vec![child],
            collation,
        }
    }

    /// The wrapped expression
    pub fn child(&self) -> &ExprRef {
        &self.children[0]
    }
}

impl fmt::Display for CollatedExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} COLLATE {}", self.child(), self.collation)
    }
}

impl Expr for CollatedExpr {
    fn eval(&self, ctx: &ExecutionContext, row: &Row) -> Result<Value> {
        let child = self.child();
        if child.data_type() != DataType::Text {
            return Err(Error::invalid_argument(format!(
                "COLLATE clause not valid for type {}",
                child.data_type()
            )));
        }
        let charset = child.collation().character_set();
        if charset != self.collation.character_set() {
            return Err(Error::invalid_argument(format!(
                "COLLATION '{}' is not valid for CHARACTER SET '{}'",
                self.collation,
                charset.name()
            )));
        }
        child.eval(ctx, row)
    }

    fn data_type(&self) -> DataType {
        self.child().data_type()
    }

    fn collation(&self) -> Collation {
        self.collation
    }

    fn nullable(&self) -> bool {
        self.child().nullable()
    }

    fn children(&self) -> &[ExprRef] {
        &self.children
    }

    fn with_children(&self, children: Vec<ExprRef>) -> Result<ExprRef> {
        if children.len() != 1 {
            return Err(Error::invalid_children_count("COLLATE", 1, children.len()));
        }
        Ok(Arc::new(Self {
            children,
            collation: self.collation,
        }))
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Collated
    }
}
