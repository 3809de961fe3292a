use super::{TraverseCtx, TraverseResult};
use crate::ast::*;

/// Generates an `enter_*`/`exit_*` hook pair per node type, each a no-op
/// by default.
macro_rules! traverse_methods {
    (
        $lt:lifetime;
        $( $name:ident : $node_type:ty ),* $(,)?
    ) => {
        paste::paste! {
            $(
                #[doc = concat!("Called before the children of a [`", stringify!($node_type), "`] are walked.")]
                #[inline]
                #[allow(unused_variables)]
                fn [<enter_ $name>](
                    &mut self,
                    node: &mut $node_type,
                    ctx: &mut TraverseCtx<$lt>,
                ) -> TraverseResult {
                    Ok(())
                }

                #[doc = concat!("Called after the children of a [`", stringify!($node_type), "`] are walked.")]
                #[inline]
                #[allow(unused_variables)]
                fn [<exit_ $name>](
                    &mut self,
                    node: &mut $node_type,
                    ctx: &mut TraverseCtx<$lt>,
                ) -> TraverseResult {
                    Ok(())
                }
            )*
        }
    };
}

/// Mutable visitor driven by [`traverse_mut`](super::traverse_mut).
///
/// Hooks receive `&mut` to the node being visited and the traversal
/// context. Returning an error stops the traversal immediately.
///
/// ```
/// use arbor_core::ast::{BinaryOperator, Expression, Span};
/// use arbor_core::traverse::{Traverse, TraverseCtx, TraverseResult, traverse_mut};
/// use bumpalo::Bump;
///
/// /// Replaces `x * 1` with `x`.
/// struct DropMultiplyByOne;
///
/// impl<'a> Traverse<'a> for DropMultiplyByOne {
///     fn exit_expression(
///         &mut self,
///         node: &mut Expression<'a>,
///         ctx: &mut TraverseCtx<'a>,
///     ) -> TraverseResult {
///         if let Expression::BinaryExpression(bin) = node {
///             if bin.operator == BinaryOperator::Multiplication && bin.right.as_number() == Some(1.0) {
///                 let left = std::mem::replace(&mut bin.left, ctx.ast.number(Span::default(), 0.0));
///                 *node = left;
///             }
///         }
///         Ok(())
///     }
/// }
///
/// let arena = Bump::new();
/// let ast = arbor_core::ast::AstBuilder::new(&arena);
/// let expr = ast.binary(
///     Span::default(),
///     ast.identifier(Span::default(), "x"),
///     BinaryOperator::Multiplication,
///     ast.number(Span::default(), 1.0),
/// );
/// let mut program = ast.program(
///     Span::default(),
///     ast.vec_from_iter([ast.expression_statement(Span::default(), expr)]),
/// );
///
/// traverse_mut(&mut DropMultiplyByOne, &mut program, &arena).unwrap();
/// assert_eq!(
///     program.body[0],
///     ast.expression_statement(Span::default(), ast.identifier(Span::default(), "x")),
/// );
/// ```
pub trait Traverse<'a> {
    traverse_methods! {
        'a;
        program: Program<'a>,
        directive: Directive<'a>,
        string_literal: StringLiteral<'a>,
        numeric_literal: NumericLiteral,
        boolean_literal: BooleanLiteral,
        identifier_reference: IdentifierReference<'a>,
        identifier_name: IdentifierName<'a>,
        binding_identifier: BindingIdentifier<'a>,
        statement: Statement<'a>,
        block_statement: BlockStatement<'a>,
        expression_statement: ExpressionStatement<'a>,
        if_statement: IfStatement<'a>,
        return_statement: ReturnStatement<'a>,
        declaration: Declaration<'a>,
        variable_declaration: VariableDeclaration<'a>,
        variable_declarator: VariableDeclarator<'a>,
        function: Function<'a>,
        formal_parameters: FormalParameters<'a>,
        formal_parameter: FormalParameter<'a>,
        class: Class<'a>,
        class_body: ClassBody<'a>,
        class_element: ClassElement<'a>,
        method_definition: MethodDefinition<'a>,
        property_definition: PropertyDefinition<'a>,
        static_block: StaticBlock<'a>,
        property_key: PropertyKey<'a>,
        expression: Expression<'a>,
        member_expression: MemberExpression<'a>,
        array_expression: ArrayExpression<'a>,
        array_expression_element: ArrayExpressionElement<'a>,
        spread_element: SpreadElement<'a>,
        binary_expression: BinaryExpression<'a>,
        unary_expression: UnaryExpression<'a>,
        call_expression: CallExpression<'a>,
        argument: Argument<'a>,
        assignment_expression: AssignmentExpression<'a>,
        assignment_target: AssignmentTarget<'a>,
        static_member_expression: StaticMemberExpression<'a>,
        computed_member_expression: ComputedMemberExpression<'a>,
    }

    /// Called before the statements of a statement list are walked. The list
    /// itself may be edited: statements inserted here are walked too.
    #[inline]
    #[allow(unused_variables)]
    fn enter_statements(
        &mut self,
        stmts: &mut Vec<'a, Statement<'a>>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        Ok(())
    }

    /// Called after every statement of a statement list has been walked.
    #[inline]
    #[allow(unused_variables)]
    fn exit_statements(
        &mut self,
        stmts: &mut Vec<'a, Statement<'a>>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        Ok(())
    }
}
