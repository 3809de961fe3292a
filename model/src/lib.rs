//! Traversal model for arena-allocated syntax trees.
//!
//! This crate turns a [`Catalogue`] of node type shapes into everything a
//! mutable tree walker needs to know ahead of time:
//!
//! - **Ancestor tags**: one tag per (struct, descendable field) pair, plus the
//!   root tag [`TagId::NONE`]. See [`AncestorModel`].
//! - **Field offsets**: the byte offset of every field of every tagged struct,
//!   used to reach sibling fields from an ancestor. See [`FieldOffsetTable`].
//! - **Walk plans**: the push/retag/pop sequence for each struct and the
//!   variant routing (including inherited variant sets) for each enum. See
//!   [`DispatchTable`].
//!
//! # Example
//!
//! ```
//! use arbor_model::{Catalogue, Model, NodeType};
//!
//! let mut catalogue = Catalogue::new();
//! catalogue.terminal("Span");
//! catalogue
//!     .insert(
//!         NodeType::structure("Binary")
//!             .lifetime()
//!             .field("span", "Span")
//!             .field("left", "Expr<'a>")
//!             .field("right", "Expr<'a>"),
//!     )
//!     .unwrap();
//! catalogue
//!     .insert(
//!         NodeType::enumeration("Expr")
//!             .lifetime()
//!             .variant("Binary", "Box<'a, Binary<'a>>"),
//!     )
//!     .unwrap();
//!
//! let layout = |ty: &str, field: &str| match (ty, field) {
//!     ("Binary", "span") => Some(0),
//!     ("Binary", "left") => Some(8),
//!     ("Binary", "right") => Some(24),
//!     _ => None,
//! };
//! let model = Model::build(catalogue, &layout).unwrap();
//!
//! assert_eq!(model.ancestors().tag_count(), 3); // None, BinaryLeft, BinaryRight
//! assert_eq!(model.dispatch().plan("Binary").unwrap().pushes(), 1);
//! ```

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{
    borrow::ToOwned, boxed::Box, format, string::String, string::ToString, vec, vec::Vec,
};

pub mod ancestor;
pub mod catalogue;
pub mod dispatch;
pub mod error;
pub mod inherit;
#[allow(clippy::module_inception)]
mod model;
pub mod offsets;
pub mod type_expr;

#[cfg(test)]
mod model_test;

pub use ancestor::{AncestorModel, AncestorTag, DiscriminantRepr, TagId};
pub use catalogue::{
    Catalogue, EnumDecl, EnumDef, Field, NodeDecl, NodeKind, NodeType, StructDecl, StructDef, TypeId,
    Variant,
};
pub use dispatch::{
    DispatchTable, EnumDispatch, FieldStep, Route, StackAction, StepFlags, WalkPlan,
};
pub use error::{DispatchError, ModelError, TypeExprError};
pub use inherit::Inheritance;
pub use model::Model;
pub use offsets::{FieldOffsetTable, LayoutProvider};
pub use type_expr::{FieldShape, TypeExpr, Wrapper, WrapperChain};
