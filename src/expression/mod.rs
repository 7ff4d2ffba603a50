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

//! Expression nodes
//!
//! Every node of an analyzed expression tree implements [`Expr`]. Nodes are
//! immutable and shared through [`ExprRef`]; rewriting a tree goes through
//! [`Expr::with_children`], which always returns a fresh node.
//!
//! Besides evaluation, the tree supports two structural queries used by the
//! function library:
//!
//! - [`is_row_independent`] - whether a subtree reads row, session or
//!   procedure state (constant folding of cached results)
//! - [`collation_coercibility`] - the collation a text expression carries and
//!   how strongly it was chosen

pub mod collated;
pub mod column;
pub mod literal;
pub mod variable;

use std::fmt;
use std::sync::Arc;

use crate::core::{Coercibility, Collation, DataType, Result, Row, Value};
use crate::executor::ExecutionContext;

pub use collated::CollatedExpr;
pub use column::ColumnRef;
pub use literal::Literal;
pub use variable::{ProcedureParam, SystemVar, UserVar};

/// Shared reference to an expression node
pub type ExprRef = Arc<dyn Expr>;

/// Structural category of an expression node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Constant value
    Literal,
    /// Column of the current row
    Column,
    /// User variable (`@name`)
    UserVariable,
    /// Session variable (`@@name`)
    SystemVariable,
    /// Stored procedure parameter
    ProcedureParam,
    /// Explicit `expr COLLATE name`
    Collated,
    /// Builtin function call
    Function,
    /// Anything else
    Other,
}

impl NodeKind {
    /// Returns true if a node of this kind reads state that may change
    /// between evaluations of the same tree
    #[inline]
    pub fn is_row_dependent(&self) -> bool {
        matches!(
            self,
            NodeKind::Column
                | NodeKind::UserVariable
                | NodeKind::SystemVariable
                | NodeKind::ProcedureParam
        )
    }
}

/// An evaluable expression node
pub trait Expr: Send + Sync + fmt::Debug + fmt::Display {
    /// Evaluate the expression against a row
    fn eval(&self, ctx: &ExecutionContext, row: &Row) -> Result<Value>;

    /// Result type of the expression
    fn data_type(&self) -> DataType;

    /// Collation of the result, meaningful for text expressions only
    fn collation(&self) -> Collation {
        Collation::default()
    }

    /// Whether the expression may evaluate to NULL
    fn nullable(&self) -> bool {
        true
    }

    /// Whether the node and all of its children are fully resolved
    fn resolved(&self) -> bool {
        self.children().iter().all(|child| child.resolved())
    }

    /// Direct children of this node
    fn children(&self) -> &[ExprRef];

    /// Build a copy of this node over new children
    ///
    /// The copy never shares per-instance state (caches, compiled
    /// resources) with the original.
    fn with_children(&self, children: Vec<ExprRef>) -> Result<ExprRef>;

    /// Structural category, used by tree visitors
    fn node_kind(&self) -> NodeKind {
        NodeKind::Other
    }

    /// Release resources held by this node
    ///
    /// Called by the enclosing engine once the tree will not be evaluated
    /// again. Must be idempotent.
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Visit every node of a tree in pre-order
pub fn inspect<F>(expr: &dyn Expr, f: &mut F)
where
    F: FnMut(&dyn Expr),
{
    f(expr);
    for child in expr.children() {
        inspect(child.as_ref(), f);
    }
}

/// Returns true if any node of the tree satisfies the predicate
pub fn any_node<F>(expr: &dyn Expr, pred: &F) -> bool
where
    F: Fn(&dyn Expr) -> bool,
{
    pred(expr) || expr.children().iter().any(|child| any_node(child.as_ref(), pred))
}

/// Returns true if the subtree never reads row, variable or procedure state
pub fn is_row_independent(expr: &dyn Expr) -> bool {
    !any_node(expr, &|node| node.node_kind().is_row_dependent())
}

/// Returns true if none of the expressions reads row, variable or procedure state
pub fn all_row_independent(exprs: &[ExprRef]) -> bool {
    exprs.iter().all(|expr| is_row_independent(expr.as_ref()))
}

/// Close every node of a tree, children first
///
/// All nodes are closed even if one fails; the first error is returned.
pub fn close_tree(expr: &dyn Expr) -> Result<()> {
    let mut first_err = None;
    for child in expr.children() {
        if let Err(err) = close_tree(child.as_ref()) {
            first_err.get_or_insert(err);
        }
    }
    if let Err(err) = expr.close() {
        first_err.get_or_insert(err);
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Collation of an expression together with its coercibility
///
/// Non-text expressions report the default collation with
/// [`Coercibility::Numeric`]. Function calls default to
/// [`Coercibility::Coercible`] and are lowered when their arguments contain an
/// explicit `COLLATE` or a column or variable reference.
pub fn collation_coercibility(expr: &dyn Expr) -> (Collation, Coercibility) {
    if expr.data_type() != DataType::Text {
        return (Collation::default(), Coercibility::Numeric);
    }
    let collation = expr.collation();

    match expr.node_kind() {
        NodeKind::Collated => (collation, Coercibility::Explicit),
        NodeKind::Column
        | NodeKind::UserVariable
        | NodeKind::SystemVariable
        | NodeKind::ProcedureParam => (collation, Coercibility::Implicit),
        NodeKind::Literal => (collation, Coercibility::Coercible),
        NodeKind::Function => {
            let mut coercibility = Coercibility::Coercible;
            inspect(expr, &mut |node| match node.node_kind() {
                NodeKind::Collated => coercibility = Coercibility::Explicit,
                kind if kind.is_row_dependent() && coercibility > Coercibility::Implicit => {
                    coercibility = Coercibility::Implicit
                }
                _ => {}
            });
            (collation, coercibility)
        }
        NodeKind::Other => (collation, Coercibility::Numeric),
    }
}
