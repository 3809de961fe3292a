//! Arena-allocated AST with a mutable, ancestor-aware traversal.
//!
//! - [`ast`]: node types, laid out by `#[visited_node]`, and [`ast::AstBuilder`].
//! - [`traverse`]: the [`Traverse`](traverse::Traverse) visitor trait, its
//!   context and the ancestor stack.
//! - [`catalogue`]: the same node types described for `arbor_model`, and the
//!   traversal model built from them.

pub mod ast;
pub mod catalogue;
pub mod traverse;

pub use catalogue::{AstLayout, model};
pub use traverse::{
    Ancestor, AncestorType, FinderRet, Traverse, TraverseCtx, TraverseError, TraverseResult,
    TraverseStats, traverse_mut, traverse_node,
};
