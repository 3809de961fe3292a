//! Procedural macros for arbor syntax tree nodes
//!
//! This crate provides the `#[visited_node]` attribute, which fixes the
//! memory layout of every node type the traversal engine walks.

extern crate proc_macro;

use proc_macro::TokenStream;

mod visited_node;

/// Fix the layout of a syntax tree node.
///
/// Ancestor accessors reach sibling fields by byte offset and retag stack
/// entries by writing their discriminant byte, so node layout must be
/// stable:
///
/// - structs get `#[repr(C)]`
/// - enums get `#[repr(C, u8)]` and an explicit discriminant on every
///   variant, numbered from 0 in declaration order
///
/// An explicit integer discriminant is kept as written, and the variants
/// after it continue from it.
///
/// # Example
///
/// ```ignore
/// #[visited_node]
/// pub struct BinaryExpression<'a> {
///     pub span: Span,
///     pub left: Expression<'a>,
///     pub operator: BinaryOperator,
///     pub right: Expression<'a>,
/// }
///
/// #[visited_node]
/// pub enum Argument<'a> {
///     SpreadElement(Box<'a, SpreadElement<'a>>), // = 0
///     Expression(Expression<'a>),                // = 1
/// }
/// ```
///
/// # Errors
///
/// Compile errors are reported for unions, items that already carry a
/// `#[repr]`, attribute arguments, non-integer discriminants and enums that
/// do not fit a `u8` discriminant.
#[proc_macro_attribute]
pub fn visited_node(attr: TokenStream, item: TokenStream) -> TokenStream {
    visited_node::visited_node_impl(attr, item)
}
