//! Node types.
//!
//! An enum that re-exports another enum's variant set does so by
//! composition: it carries a variant named after the base enum whose
//! payload is the base enum itself. `Expression::MemberExpression` is how a
//! `StaticMemberExpression` becomes an `Expression`.

use arbor_macros::visited_node;

use super::{
    AssignmentOperator, BinaryOperator, Box, MethodDefinitionKind, Span, UnaryOperator, Vec,
    VariableDeclarationKind,
};

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct Program<'a> {
    pub span: Span,
    pub directives: Vec<'a, Directive<'a>>,
    pub body: Vec<'a, Statement<'a>>,
}

/// A prologue directive such as `"use strict"`.
#[visited_node]
#[derive(Debug, PartialEq)]
pub struct Directive<'a> {
    pub span: Span,
    pub expression: StringLiteral<'a>,
    /// Raw text between the quotes.
    pub directive: &'a str,
}

// Literals and names

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct StringLiteral<'a> {
    pub span: Span,
    pub value: &'a str,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct NumericLiteral {
    pub span: Span,
    pub value: f64,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct BooleanLiteral {
    pub span: Span,
    pub value: bool,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct IdentifierReference<'a> {
    pub span: Span,
    pub name: &'a str,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct IdentifierName<'a> {
    pub span: Span,
    pub name: &'a str,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct BindingIdentifier<'a> {
    pub span: Span,
    pub name: &'a str,
}

// Statements

#[visited_node]
#[derive(Debug, PartialEq)]
pub enum Statement<'a> {
    BlockStatement(Box<'a, BlockStatement<'a>>),
    ExpressionStatement(Box<'a, ExpressionStatement<'a>>),
    IfStatement(Box<'a, IfStatement<'a>>),
    ReturnStatement(Box<'a, ReturnStatement<'a>>),
    Declaration(Declaration<'a>),
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct BlockStatement<'a> {
    pub span: Span,
    pub body: Vec<'a, Statement<'a>>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct ExpressionStatement<'a> {
    pub span: Span,
    pub expression: Expression<'a>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct IfStatement<'a> {
    pub span: Span,
    pub test: Expression<'a>,
    pub consequent: Statement<'a>,
    pub alternate: Option<Statement<'a>>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct ReturnStatement<'a> {
    pub span: Span,
    pub argument: Option<Expression<'a>>,
}

// Declarations

#[visited_node]
#[derive(Debug, PartialEq)]
pub enum Declaration<'a> {
    VariableDeclaration(Box<'a, VariableDeclaration<'a>>),
    FunctionDeclaration(Box<'a, Function<'a>>),
    ClassDeclaration(Box<'a, Class<'a>>),
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct VariableDeclaration<'a> {
    pub span: Span,
    pub kind: VariableDeclarationKind,
    pub declarations: Vec<'a, VariableDeclarator<'a>>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct VariableDeclarator<'a> {
    pub span: Span,
    pub kind: VariableDeclarationKind,
    pub id: BindingIdentifier<'a>,
    pub init: Option<Expression<'a>>,
}

/// Function declaration or expression. `body` is `None` for overload
/// signatures and ambient declarations.
#[visited_node]
#[derive(Debug, PartialEq)]
pub struct Function<'a> {
    pub span: Span,
    pub id: Option<BindingIdentifier<'a>>,
    pub is_async: bool,
    pub params: Box<'a, FormalParameters<'a>>,
    pub body: Option<Vec<'a, Statement<'a>>>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct FormalParameters<'a> {
    pub span: Span,
    pub items: Vec<'a, Box<'a, FormalParameter<'a>>>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct FormalParameter<'a> {
    pub span: Span,
    pub binding: BindingIdentifier<'a>,
    pub initializer: Option<Box<'a, Expression<'a>>>,
}

// Classes

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct Class<'a> {
    pub span: Span,
    pub id: Option<BindingIdentifier<'a>>,
    pub super_class: Option<Expression<'a>>,
    pub body: Box<'a, ClassBody<'a>>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct ClassBody<'a> {
    pub span: Span,
    pub body: Vec<'a, ClassElement<'a>>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub enum ClassElement<'a> {
    MethodDefinition(Box<'a, MethodDefinition<'a>>),
    PropertyDefinition(Box<'a, PropertyDefinition<'a>>),
    StaticBlock(Box<'a, StaticBlock<'a>>),
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct MethodDefinition<'a> {
    pub span: Span,
    pub key: PropertyKey<'a>,
    pub value: Box<'a, Function<'a>>,
    pub kind: MethodDefinitionKind,
    pub is_static: bool,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct PropertyDefinition<'a> {
    pub span: Span,
    pub key: PropertyKey<'a>,
    pub value: Option<Expression<'a>>,
    pub is_static: bool,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct StaticBlock<'a> {
    pub span: Span,
    pub body: Vec<'a, Statement<'a>>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub enum PropertyKey<'a> {
    StaticIdentifier(Box<'a, IdentifierName<'a>>),
    Expression(Expression<'a>),
}

// Expressions

#[visited_node]
#[derive(Debug, PartialEq)]
pub enum Expression<'a> {
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

#[visited_node]
#[derive(Debug, PartialEq)]
pub enum MemberExpression<'a> {
    StaticMemberExpression(Box<'a, StaticMemberExpression<'a>>),
    ComputedMemberExpression(Box<'a, ComputedMemberExpression<'a>>),
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct ArrayExpression<'a> {
    pub span: Span,
    /// `None` is a hole, as in `[1, , 3]`.
    pub elements: Vec<'a, Option<ArrayExpressionElement<'a>>>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub enum ArrayExpressionElement<'a> {
    SpreadElement(Box<'a, SpreadElement<'a>>),
    Expression(Expression<'a>),
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct SpreadElement<'a> {
    pub span: Span,
    pub argument: Expression<'a>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct BinaryExpression<'a> {
    pub span: Span,
    pub left: Expression<'a>,
    pub operator: BinaryOperator,
    pub right: Expression<'a>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct UnaryExpression<'a> {
    pub span: Span,
    pub operator: UnaryOperator,
    pub argument: Expression<'a>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct CallExpression<'a> {
    pub span: Span,
    pub callee: Expression<'a>,
    pub arguments: Vec<'a, Argument<'a>>,
    pub optional: bool,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub enum Argument<'a> {
    SpreadElement(Box<'a, SpreadElement<'a>>),
    Expression(Expression<'a>),
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct AssignmentExpression<'a> {
    pub span: Span,
    pub operator: AssignmentOperator,
    pub left: AssignmentTarget<'a>,
    pub right: Expression<'a>,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub enum AssignmentTarget<'a> {
    AssignmentTargetIdentifier(Box<'a, IdentifierReference<'a>>),
    MemberExpression(MemberExpression<'a>),
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct StaticMemberExpression<'a> {
    pub span: Span,
    pub object: Expression<'a>,
    pub property: IdentifierName<'a>,
    pub optional: bool,
}

#[visited_node]
#[derive(Debug, PartialEq)]
pub struct ComputedMemberExpression<'a> {
    pub span: Span,
    pub object: Expression<'a>,
    pub expression: Expression<'a>,
    pub optional: bool,
}

impl<'a> Expression<'a> {
    /// The numeric value, if this is a number literal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expression::NumericLiteral(lit) => Some(lit.value),
            _ => None,
        }
    }

    /// The identifier name, if this is an identifier reference.
    pub fn as_identifier(&self) -> Option<&'a str> {
        match self {
            Expression::Identifier(ident) => Some(ident.name),
            _ => None,
        }
    }
}
