use bumpalo::Bump;

use super::*;

/// Node factory bound to one arena.
#[derive(Debug, Clone, Copy)]
pub struct AstBuilder<'a> {
    pub allocator: &'a Bump,
}

impl<'a> AstBuilder<'a> {
    pub fn new(allocator: &'a Bump) -> Self {
        Self { allocator }
    }

    #[inline]
    pub fn alloc<T>(self, value: T) -> Box<'a, T> {
        Box::new_in(value, self.allocator)
    }

    #[inline]
    pub fn vec<T>(self) -> Vec<'a, T> {
        Vec::new_in(self.allocator)
    }

    pub fn vec_from_iter<T, I: IntoIterator<Item = T>>(self, iter: I) -> Vec<'a, T> {
        Vec::from_iter_in(iter, self.allocator)
    }

    /// Copy `value` into the arena.
    pub fn str(self, value: &str) -> &'a str {
        self.allocator.alloc_str(value)
    }

    pub fn program(self, span: Span, body: Vec<'a, Statement<'a>>) -> Program<'a> {
        Program {
            span,
            directives: self.vec(),
            body,
        }
    }

    pub fn directive(self, span: Span, value: &str) -> Directive<'a> {
        let value = self.str(value);
        Directive {
            span,
            expression: StringLiteral { span, value },
            directive: value,
        }
    }

    // Expressions

    pub fn number(self, span: Span, value: f64) -> Expression<'a> {
        Expression::NumericLiteral(self.alloc(NumericLiteral { span, value }))
    }

    pub fn boolean(self, span: Span, value: bool) -> Expression<'a> {
        Expression::BooleanLiteral(self.alloc(BooleanLiteral { span, value }))
    }

    pub fn string(self, span: Span, value: &str) -> Expression<'a> {
        let value = self.str(value);
        Expression::StringLiteral(self.alloc(StringLiteral { span, value }))
    }

    pub fn identifier(self, span: Span, name: &str) -> Expression<'a> {
        Expression::Identifier(self.alloc(self.identifier_reference(span, name)))
    }

    pub fn identifier_reference(self, span: Span, name: &str) -> IdentifierReference<'a> {
        IdentifierReference {
            span,
            name: self.str(name),
        }
    }

    pub fn identifier_name(self, span: Span, name: &str) -> IdentifierName<'a> {
        IdentifierName {
            span,
            name: self.str(name),
        }
    }

    pub fn binding_identifier(self, span: Span, name: &str) -> BindingIdentifier<'a> {
        BindingIdentifier {
            span,
            name: self.str(name),
        }
    }

    pub fn binary(
        self,
        span: Span,
        left: Expression<'a>,
        operator: BinaryOperator,
        right: Expression<'a>,
    ) -> Expression<'a> {
        Expression::BinaryExpression(self.alloc(BinaryExpression {
            span,
            left,
            operator,
            right,
        }))
    }

    pub fn unary(self, span: Span, operator: UnaryOperator, argument: Expression<'a>) -> Expression<'a> {
        Expression::UnaryExpression(self.alloc(UnaryExpression {
            span,
            operator,
            argument,
        }))
    }

    pub fn call(
        self,
        span: Span,
        callee: Expression<'a>,
        arguments: Vec<'a, Argument<'a>>,
    ) -> Expression<'a> {
        Expression::CallExpression(self.alloc(CallExpression {
            span,
            callee,
            arguments,
            optional: false,
        }))
    }

    pub fn array(
        self,
        span: Span,
        elements: Vec<'a, Option<ArrayExpressionElement<'a>>>,
    ) -> Expression<'a> {
        Expression::ArrayExpression(self.alloc(ArrayExpression { span, elements }))
    }

    pub fn spread(self, span: Span, argument: Expression<'a>) -> Box<'a, SpreadElement<'a>> {
        self.alloc(SpreadElement { span, argument })
    }

    pub fn assignment(
        self,
        span: Span,
        operator: AssignmentOperator,
        left: AssignmentTarget<'a>,
        right: Expression<'a>,
    ) -> Expression<'a> {
        Expression::AssignmentExpression(self.alloc(AssignmentExpression {
            span,
            operator,
            left,
            right,
        }))
    }

    pub fn static_member(
        self,
        span: Span,
        object: Expression<'a>,
        property: &str,
    ) -> MemberExpression<'a> {
        MemberExpression::StaticMemberExpression(self.alloc(StaticMemberExpression {
            span,
            object,
            property: self.identifier_name(span, property),
            optional: false,
        }))
    }

    pub fn computed_member(
        self,
        span: Span,
        object: Expression<'a>,
        expression: Expression<'a>,
    ) -> MemberExpression<'a> {
        MemberExpression::ComputedMemberExpression(self.alloc(ComputedMemberExpression {
            span,
            object,
            expression,
            optional: false,
        }))
    }

    pub fn function(
        self,
        span: Span,
        id: Option<BindingIdentifier<'a>>,
        params: Vec<'a, Box<'a, FormalParameter<'a>>>,
        body: Option<Vec<'a, Statement<'a>>>,
    ) -> Box<'a, Function<'a>> {
        self.alloc(Function {
            span,
            id,
            is_async: false,
            params: self.alloc(FormalParameters {
                span,
                items: params,
            }),
            body,
        })
    }

    pub fn formal_parameter(
        self,
        span: Span,
        name: &str,
        initializer: Option<Expression<'a>>,
    ) -> Box<'a, FormalParameter<'a>> {
        self.alloc(FormalParameter {
            span,
            binding: self.binding_identifier(span, name),
            initializer: initializer.map(|init| self.alloc(init)),
        })
    }

    pub fn class(
        self,
        span: Span,
        id: Option<BindingIdentifier<'a>>,
        super_class: Option<Expression<'a>>,
        body: Vec<'a, ClassElement<'a>>,
    ) -> Box<'a, Class<'a>> {
        self.alloc(Class {
            span,
            id,
            super_class,
            body: self.alloc(ClassBody { span, body }),
        })
    }

    // Statements

    pub fn expression_statement(self, span: Span, expression: Expression<'a>) -> Statement<'a> {
        Statement::ExpressionStatement(self.alloc(ExpressionStatement { span, expression }))
    }

    pub fn block(self, span: Span, body: Vec<'a, Statement<'a>>) -> Statement<'a> {
        Statement::BlockStatement(self.alloc(BlockStatement { span, body }))
    }

    pub fn if_statement(
        self,
        span: Span,
        test: Expression<'a>,
        consequent: Statement<'a>,
        alternate: Option<Statement<'a>>,
    ) -> Statement<'a> {
        Statement::IfStatement(self.alloc(IfStatement {
            span,
            test,
            consequent,
            alternate,
        }))
    }

    pub fn return_statement(self, span: Span, argument: Option<Expression<'a>>) -> Statement<'a> {
        Statement::ReturnStatement(self.alloc(ReturnStatement { span, argument }))
    }

    pub fn variable_declaration(
        self,
        span: Span,
        kind: VariableDeclarationKind,
        name: &str,
        init: Option<Expression<'a>>,
    ) -> Statement<'a> {
        let declarator = VariableDeclarator {
            span,
            kind,
            id: self.binding_identifier(span, name),
            init,
        };
        let declarations = self.vec_from_iter([declarator]);
        Statement::Declaration(Declaration::VariableDeclaration(self.alloc(
            VariableDeclaration {
                span,
                kind,
                declarations,
            },
        )))
    }
}
