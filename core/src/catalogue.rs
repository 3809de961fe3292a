//! The node types of [`crate::ast`] as a traversal-model catalogue.
//!
//! The declarations below mirror `ast/js.rs` field for field and in the same
//! order, so the tags the model assigns line up with the discriminants of
//! [`AncestorType`](crate::traverse::AncestorType). Field offsets come from
//! `offset_of!` on the real types.

use core::mem::offset_of;

use arbor_model::{Catalogue, LayoutProvider, Model, ModelError, NodeType};
use once_cell::sync::OnceCell;

use crate::ast::*;

macro_rules! ast_types {
    (
        $(
            $kind:ident $name:ident $(<$lt:lifetime>)? $(: $($base:ident),+)? { $($body:tt)* }
        )*
    ) => {
        fn declare(catalogue: &mut Catalogue) -> Result<(), ModelError> {
            $(
                catalogue.insert(
                    ast_types!(@decl $kind $name $(<$lt>)? $(: $($base),+)? { $($body)* })
                )?;
            )*
            Ok(())
        }

        fn field_offset(ty: &str, field: &str) -> Option<usize> {
            $(
                if let Some(offset) = ast_types!(@offset $kind $name { $($body)* } ty, field) {
                    return Some(offset);
                }
            )*
            None
        }
    };

    (@decl struct $name:ident $(<$lt:lifetime>)? { $( $field:ident : $fty:ty ),* $(,)? }) => {{
        let decl = NodeType::structure(stringify!($name));
        $( let decl = { let _ = stringify!($lt); decl.lifetime() }; )?
        decl $( .field(stringify!($field), stringify!($fty)) )*
    }};

    (@decl enum $name:ident $(<$lt:lifetime>)? $(: $($base:ident),+)? {
        $( $variant:ident ( $pty:ty ) ),* $(,)?
    }) => {{
        let decl = NodeType::enumeration(stringify!($name));
        $( let decl = { let _ = stringify!($lt); decl.lifetime() }; )?
        decl
            $( .variant(stringify!($variant), stringify!($pty)) )*
            $( $( .inherits(stringify!($base)) )+ )?
    }};

    (@offset struct $name:ident { $( $field:ident : $fty:ty ),* $(,)? } $ty:ident, $f:ident) => {
        match ($ty, $f) {
            $( (stringify!($name), stringify!($field)) => Some(offset_of!($name, $field)), )*
            _ => None,
        }
    };

    (@offset enum $name:ident { $($body:tt)* } $ty:ident, $f:ident) => {
        None::<usize>
    };
}

ast_types! {
    struct Program<'a> {
        span: Span,
        directives: Vec<'a, Directive<'a>>,
        body: Vec<'a, Statement<'a>>,
    }
    struct Directive<'a> {
        span: Span,
        expression: StringLiteral<'a>,
        directive: &'a str,
    }
    struct StringLiteral<'a> { span: Span, value: &'a str }
    struct NumericLiteral { span: Span, value: f64 }
    struct BooleanLiteral { span: Span, value: bool }
    struct IdentifierReference<'a> { span: Span, name: &'a str }
    struct IdentifierName<'a> { span: Span, name: &'a str }
    struct BindingIdentifier<'a> { span: Span, name: &'a str }

    enum Statement<'a>: Declaration {
        BlockStatement(Box<'a, BlockStatement<'a>>),
        ExpressionStatement(Box<'a, ExpressionStatement<'a>>),
        IfStatement(Box<'a, IfStatement<'a>>),
        ReturnStatement(Box<'a, ReturnStatement<'a>>),
        Declaration(Declaration<'a>),
    }
    struct BlockStatement<'a> { span: Span, body: Vec<'a, Statement<'a>> }
    struct ExpressionStatement<'a> { span: Span, expression: Expression<'a> }
    struct IfStatement<'a> {
        span: Span,
        test: Expression<'a>,
        consequent: Statement<'a>,
        alternate: Option<Statement<'a>>,
    }
    struct ReturnStatement<'a> { span: Span, argument: Option<Expression<'a>> }

    enum Declaration<'a> {
        VariableDeclaration(Box<'a, VariableDeclaration<'a>>),
        FunctionDeclaration(Box<'a, Function<'a>>),
        ClassDeclaration(Box<'a, Class<'a>>),
    }
    struct VariableDeclaration<'a> {
        span: Span,
        kind: VariableDeclarationKind,
        declarations: Vec<'a, VariableDeclarator<'a>>,
    }
    struct VariableDeclarator<'a> {
        span: Span,
        kind: VariableDeclarationKind,
        id: BindingIdentifier<'a>,
        init: Option<Expression<'a>>,
    }
    struct Function<'a> {
        span: Span,
        id: Option<BindingIdentifier<'a>>,
        is_async: bool,
        params: Box<'a, FormalParameters<'a>>,
        body: Option<Vec<'a, Statement<'a>>>,
    }
    struct FormalParameters<'a> {
        span: Span,
        items: Vec<'a, Box<'a, FormalParameter<'a>>>,
    }
    struct FormalParameter<'a> {
        span: Span,
        binding: BindingIdentifier<'a>,
        initializer: Option<Box<'a, Expression<'a>>>,
    }

    struct Class<'a> {
        span: Span,
        id: Option<BindingIdentifier<'a>>,
        super_class: Option<Expression<'a>>,
        body: Box<'a, ClassBody<'a>>,
    }
    struct ClassBody<'a> { span: Span, body: Vec<'a, ClassElement<'a>> }
    enum ClassElement<'a> {
        MethodDefinition(Box<'a, MethodDefinition<'a>>),
        PropertyDefinition(Box<'a, PropertyDefinition<'a>>),
        StaticBlock(Box<'a, StaticBlock<'a>>),
    }
    struct MethodDefinition<'a> {
        span: Span,
        key: PropertyKey<'a>,
        value: Box<'a, Function<'a>>,
        kind: MethodDefinitionKind,
        is_static: bool,
    }
    struct PropertyDefinition<'a> {
        span: Span,
        key: PropertyKey<'a>,
        value: Option<Expression<'a>>,
        is_static: bool,
    }
    struct StaticBlock<'a> { span: Span, body: Vec<'a, Statement<'a>> }
    enum PropertyKey<'a>: Expression {
        StaticIdentifier(Box<'a, IdentifierName<'a>>),
        Expression(Expression<'a>),
    }

    enum Expression<'a>: MemberExpression {
        BooleanLiteral(Box<'a, BooleanLiteral>),
        NumericLiteral(Box<'a, NumericLiteral>),
        StringLiteral(Box<'a, StringLiteral<'a>>),
        Identifier(Box<'a, IdentifierReference<'a>>),
        ArrayExpression(Box<'a, ArrayExpression<'a>>),
        BinaryExpression(Box<'a, BinaryExpression<'a>>),
        UnaryExpression(Box<'a, UnaryExpression<'a>>),
        CallExpression(Box<'a, CallExpression<'a>>),
        AssignmentExpression(Box<'a, AssignmentExpression<'a>>),
        FunctionExpression(Box<'a, Function<'a>>),
        ClassExpression(Box<'a, Class<'a>>),
        MemberExpression(MemberExpression<'a>),
    }
    enum MemberExpression<'a> {
        StaticMemberExpression(Box<'a, StaticMemberExpression<'a>>),
        ComputedMemberExpression(Box<'a, ComputedMemberExpression<'a>>),
    }
    struct ArrayExpression<'a> {
        span: Span,
        elements: Vec<'a, Option<ArrayExpressionElement<'a>>>,
    }
    enum ArrayExpressionElement<'a>: Expression {
        SpreadElement(Box<'a, SpreadElement<'a>>),
        Expression(Expression<'a>),
    }
    struct SpreadElement<'a> { span: Span, argument: Expression<'a> }
    struct BinaryExpression<'a> {
        span: Span,
        left: Expression<'a>,
        operator: BinaryOperator,
        right: Expression<'a>,
    }
    struct UnaryExpression<'a> {
        span: Span,
        operator: UnaryOperator,
        argument: Expression<'a>,
    }
    struct CallExpression<'a> {
        span: Span,
        callee: Expression<'a>,
        arguments: Vec<'a, Argument<'a>>,
        optional: bool,
    }
    enum Argument<'a>: Expression {
        SpreadElement(Box<'a, SpreadElement<'a>>),
        Expression(Expression<'a>),
    }
    struct AssignmentExpression<'a> {
        span: Span,
        operator: AssignmentOperator,
        left: AssignmentTarget<'a>,
        right: Expression<'a>,
    }
    enum AssignmentTarget<'a>: MemberExpression {
        AssignmentTargetIdentifier(Box<'a, IdentifierReference<'a>>),
        MemberExpression(MemberExpression<'a>),
    }
    struct StaticMemberExpression<'a> {
        span: Span,
        object: Expression<'a>,
        property: IdentifierName<'a>,
        optional: bool,
    }
    struct ComputedMemberExpression<'a> {
        span: Span,
        object: Expression<'a>,
        expression: Expression<'a>,
        optional: bool,
    }
}

/// Types the walkers never descend into.
const TERMINALS: &[&str] = &[
    "Span",
    "BinaryOperator",
    "UnaryOperator",
    "AssignmentOperator",
    "VariableDeclarationKind",
    "MethodDefinitionKind",
];

/// Field offsets of the AST node types, from `offset_of!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstLayout;

impl LayoutProvider for AstLayout {
    fn offset_of(&self, ty: &str, field: &str) -> Option<usize> {
        field_offset(ty, field)
    }
}

/// Catalogue of every node type in [`crate::ast`].
pub fn catalogue() -> Result<Catalogue, ModelError> {
    let mut catalogue = Catalogue::new();
    for name in TERMINALS {
        catalogue.terminal(name);
    }
    catalogue.statements("Statement");
    declare(&mut catalogue)?;
    Ok(catalogue)
}

static MODEL: OnceCell<Model> = OnceCell::new();

/// The traversal model of [`crate::ast`], built on first use.
pub fn model() -> Result<&'static Model, ModelError> {
    MODEL.get_or_try_init(|| Model::build(catalogue()?, &AstLayout))
}
