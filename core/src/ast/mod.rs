//! Arena-allocated syntax tree.
//!
//! Every node lives in a [`bumpalo::Bump`] and is laid out by
//! `#[visited_node]`, so walkers and ancestor accessors can address fields
//! by byte offset.

mod builder;
mod js;
mod operator;
mod span;

pub use builder::AstBuilder;
pub use js::*;
pub use operator::{
    AssignmentOperator, BinaryOperator, MethodDefinitionKind, UnaryOperator,
    VariableDeclarationKind,
};
pub use span::Span;

/// Arena box.
pub type Box<'a, T> = bumpalo::boxed::Box<'a, T>;

/// Arena vector.
pub type Vec<'a, T> = bumpalo::collections::Vec<'a, T>;
