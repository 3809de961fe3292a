//! Arbor - mutable, ancestor-aware traversal of arena-allocated syntax trees
//!
//! # Overview
//!
//! A [`Traverse`] implementation gets `&mut` access to every node of a tree
//! and, through [`TraverseCtx`], to the node's ancestors and their other
//! fields. Walkers keep a stack of [`Ancestor`] entries, one per struct
//! being walked, and retag the top entry in place when moving from one
//! field to the next.
//!
//! The shape of the tree is also available as data: [`model()`] returns the
//! traversal model built from the node catalogue, with its ancestor tags,
//! field offsets and walk plans.
//!
//! # Quick Start
//!
//! ```
//! use arbor::ast::{AstBuilder, BinaryOperator, IdentifierReference, Span};
//! use arbor::{Ancestor, Traverse, TraverseCtx, TraverseResult};
//! use bumpalo::Bump;
//!
//! /// Collects identifiers used as the left operand of a binary expression.
//! #[derive(Default)]
//! struct LeftOperands(Vec<String>);
//!
//! impl<'a> Traverse<'a> for LeftOperands {
//!     fn enter_identifier_reference(
//!         &mut self,
//!         node: &mut IdentifierReference<'a>,
//!         ctx: &mut TraverseCtx<'a>,
//!     ) -> TraverseResult {
//!         if let Ancestor::BinaryExpressionLeft(_) = ctx.parent() {
//!             self.0.push(node.name.to_string());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let arena = Bump::new();
//! let ast = AstBuilder::new(&arena);
//! let span = Span::default();
//! let sum = ast.binary(
//!     span,
//!     ast.identifier(span, "a"),
//!     BinaryOperator::Addition,
//!     ast.identifier(span, "b"),
//! );
//! let mut program = ast.program(span, ast.vec_from_iter([ast.expression_statement(span, sum)]));
//!
//! let mut visitor = LeftOperands::default();
//! let stats = arbor::traverse(&mut visitor, &mut program, &arena).unwrap();
//! assert_eq!(visitor.0, ["a"]);
//! assert_eq!(stats.pushes, stats.pops);
//! ```

use bumpalo::Bump;
use thiserror::Error;

pub use arbor_core::{ast, catalogue, traverse};
pub use arbor_core::{
    Ancestor, AncestorType, FinderRet, Traverse, TraverseCtx, TraverseError, TraverseResult,
    TraverseStats, model, traverse_mut, traverse_node,
};
pub use arbor_model::{self as schema, DispatchError, Model, ModelError};

/// Any failure [`traverse`] can return.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid node catalogue: {0}")]
    Model(#[from] ModelError),

    #[error("traversal aborted: {0}")]
    Traverse(#[from] TraverseError),
}

/// Traverse `program`, checking first that the traversal model of the AST
/// is consistent.
pub fn traverse<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    program: &mut ast::Program<'a>,
    allocator: &'a Bump,
) -> Result<TraverseStats, Error> {
    model()?;
    Ok(traverse_mut(traverser, program, allocator)?)
}
