//! Mutable traversal of an AST with an ancestor stack.
//!
//! Implement [`Traverse`] and call [`traverse_mut`]. Each hook receives the
//! node and a [`TraverseCtx`] through which the node's ancestors and their
//! other fields can be read and mutated.

use bumpalo::Bump;

use crate::ast::*;

pub mod ancestor;
mod context;
mod error;
#[allow(clippy::module_inception)]
mod traverse;
mod walk;

#[cfg(test)]
mod traverse_test;

pub use ancestor::*;
pub use context::{FinderRet, TraverseCtx, TraverseStats};
#[cfg(test)]
pub(crate) use context::StackOp;
pub use error::{TraverseError, TraverseResult};
pub use traverse::Traverse;

mod sealed {
    pub trait Sealed {}
}

/// A node type traversal can start at.
pub trait Traversable<'a>: sealed::Sealed {
    /// Type name, as registered in the traversal model.
    const NAME: &'static str;

    #[doc(hidden)]
    /// # Safety
    ///
    /// `node` must be valid for reads and writes for the whole call and not
    /// be aliased elsewhere.
    unsafe fn walk<Tr: Traverse<'a>>(
        node: *mut Self,
        traverser: &mut Tr,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult;
}

macro_rules! traversable {
    ($lt:lifetime; $( $ty:ident $(<$l:lifetime>)? => $walk:ident ),* $(,)?) => {
        $(
            impl<$lt> sealed::Sealed for $ty $(<$l>)? {}

            impl<$lt> Traversable<$lt> for $ty $(<$l>)? {
                const NAME: &'static str = stringify!($ty);

                unsafe fn walk<Tr: Traverse<$lt>>(
                    node: *mut Self,
                    traverser: &mut Tr,
                    ctx: &mut TraverseCtx<$lt>,
                ) -> TraverseResult {
                    // SAFETY: forwarded from the caller.
                    unsafe { walk::$walk(traverser, node, ctx) }
                }
            }
        )*
    };
}

traversable! {
    'a;
    Program<'a> => walk_program,
    Directive<'a> => walk_directive,
    StringLiteral<'a> => walk_string_literal,
    NumericLiteral => walk_numeric_literal,
    BooleanLiteral => walk_boolean_literal,
    IdentifierReference<'a> => walk_identifier_reference,
    IdentifierName<'a> => walk_identifier_name,
    BindingIdentifier<'a> => walk_binding_identifier,
    Statement<'a> => walk_statement,
    BlockStatement<'a> => walk_block_statement,
    ExpressionStatement<'a> => walk_expression_statement,
    IfStatement<'a> => walk_if_statement,
    ReturnStatement<'a> => walk_return_statement,
    Declaration<'a> => walk_declaration,
    VariableDeclaration<'a> => walk_variable_declaration,
    VariableDeclarator<'a> => walk_variable_declarator,
    Function<'a> => walk_function,
    FormalParameters<'a> => walk_formal_parameters,
    FormalParameter<'a> => walk_formal_parameter,
    Class<'a> => walk_class,
    ClassBody<'a> => walk_class_body,
    ClassElement<'a> => walk_class_element,
    MethodDefinition<'a> => walk_method_definition,
    PropertyDefinition<'a> => walk_property_definition,
    StaticBlock<'a> => walk_static_block,
    PropertyKey<'a> => walk_property_key,
    Expression<'a> => walk_expression,
    MemberExpression<'a> => walk_member_expression,
    ArrayExpression<'a> => walk_array_expression,
    ArrayExpressionElement<'a> => walk_array_expression_element,
    SpreadElement<'a> => walk_spread_element,
    BinaryExpression<'a> => walk_binary_expression,
    UnaryExpression<'a> => walk_unary_expression,
    CallExpression<'a> => walk_call_expression,
    Argument<'a> => walk_argument,
    AssignmentExpression<'a> => walk_assignment_expression,
    AssignmentTarget<'a> => walk_assignment_target,
    StaticMemberExpression<'a> => walk_static_member_expression,
    ComputedMemberExpression<'a> => walk_computed_member_expression,
}

/// Traverse the tree rooted at `program`.
///
/// Returns the stack counters of the walk, or the first error a hook
/// returned. On error the ancestor stack is unwound and no further hooks
/// run.
pub fn traverse_mut<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    program: &mut Program<'a>,
    allocator: &'a Bump,
) -> Result<TraverseStats, TraverseError> {
    let mut ctx = TraverseCtx::new(allocator);
    traverse_node(traverser, program, &mut ctx)
}

/// Traverse the subtree rooted at any node, with a caller-provided context.
///
/// With a fresh context the node's parent is [`Ancestor::None`]. The
/// returned counters cover this call only, with `max_depth` counted from the
/// depth the call started at; the context keeps accumulating.
pub fn traverse_node<'a, T, Tr>(
    traverser: &mut Tr,
    node: &mut T,
    ctx: &mut TraverseCtx<'a>,
) -> Result<TraverseStats, TraverseError>
where
    T: Traversable<'a>,
    Tr: Traverse<'a>,
{
    let span = tracing::debug_span!("traverse", root = T::NAME);
    let _guard = span.enter();

    let depth = ctx.depth();
    let start = ctx.begin_walk();
    // SAFETY: `node` is a unique borrow for the whole walk.
    let result = unsafe { T::walk(node as *mut T, traverser, ctx) };
    match result {
        Ok(()) => {
            debug_assert_eq!(ctx.depth(), depth, "unbalanced ancestor stack");
            let stats = ctx.end_walk(start);
            tracing::trace!(
                pushes = stats.pushes,
                retags = stats.retags,
                max_depth = stats.max_depth,
                "traversal finished"
            );
            Ok(stats)
        }
        Err(error) => {
            tracing::debug!(%error, "traversal aborted");
            ctx.unwind_to(depth);
            ctx.end_walk(start);
            Err(error)
        }
    }
}
