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

//! Variable expressions
//!
//! User variables, session variables and stored procedure parameters all
//! read a named value from the [`ExecutionContext`]. An unset name evaluates
//! to NULL. The declared type defaults to TEXT, which is what the analyzer
//! assigns to string-valued variables.

use std::fmt;
use std::sync::Arc;

use super::{Expr, ExprRef, NodeKind};
use crate::core::{Collation, DataType, Error, Result, Row, Value};
use crate::executor::ExecutionContext;

macro_rules! variable_expr {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:expr, $prefix:expr, $lookup:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            name: String,
            data_type: DataType,
            collation: Collation,
        }

        impl $name {
            /// Create a TEXT variable reference with the default collation
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    data_type: DataType::Text,
                    collation: Collation::default(),
                }
            }

            /// Set the declared type
            pub fn with_type(mut self, data_type: DataType) -> Self {
                self.data_type = data_type;
                self
            }

            /// Set the collation
            pub fn with_collation(mut self, collation: Collation) -> Self {
                self.collation = collation;
                self
            }

            /// Variable name without prefix
            pub fn name(&self) -> &str {
                &self.name
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.name)
            }
        }

        impl Expr for $name {
            fn eval(&self, ctx: &ExecutionContext, _row: &Row) -> Result<Value> {
                Ok(ctx
                    .$lookup(&self.name)
                    .cloned()
                    .unwrap_or_else(|| Value::null(self.data_type)))
            }

            fn data_type(&self) -> DataType {
                self.data_type
            }

            fn collation(&self) -> Collation {
                self.collation
            }

            fn children(&self) -> &[ExprRef] {
                &[]
            }

            fn with_children(&self, children: Vec<ExprRef>) -> Result<ExprRef> {
                if !children.is_empty() {
                    return Err(Error::invalid_children_count(
                        self.to_string(),
                        0,
                        children.len(),
                    ));
                }
                Ok(Arc::new(self.clone()))
            }

            fn node_kind(&self) -> NodeKind {
                $kind
            }
        }
    };
}

variable_expr!(
    /// User variable (`@name`)
    UserVar,
    NodeKind::UserVariable,
    "@",
    get_user_var
);

variable_expr!(
    /// Session variable (`@@name`)
    SystemVar,
    NodeKind::SystemVariable,
    "@@",
    get_session_var
);

variable_expr!(
    /// Parameter of the executing stored procedure
    ProcedureParam,
    NodeKind::ProcedureParam,
    "",
    get_procedure_param
);
