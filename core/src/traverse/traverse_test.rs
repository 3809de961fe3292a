use core::mem::offset_of;
use std::collections::{BTreeMap, BTreeSet};

use arbor_model::{StackAction, TagId, TypeExpr};
use bumpalo::Bump;
use pretty_assertions::assert_eq;

use super::{
    Ancestor, AncestorType, FinderRet, StackOp, Traverse, TraverseCtx, TraverseError,
    TraverseResult, traverse_mut, traverse_node,
};
use crate::ast::{
    Argument, ArrayExpressionElement, AssignmentOperator, AssignmentTarget, AstBuilder,
    BinaryExpression, BinaryOperator, BindingIdentifier, BooleanLiteral, ClassElement, Declaration,
    Expression, ExpressionStatement, FormalParameters, Function, IdentifierName,
    IdentifierReference, MemberExpression, MethodDefinition, MethodDefinitionKind, NumericLiteral,
    Program, PropertyDefinition, PropertyKey, Span, Statement, StaticBlock, StaticMemberExpression,
    StringLiteral, UnaryOperator, VariableDeclarationKind,
};
use crate::test_utils::init_test_logging;

const SPAN: Span = Span::new(0, 0);

struct Noop;

impl<'a> Traverse<'a> for Noop {}

/// Logs hook calls as `"<hook> @ <parent tag>"`.
#[derive(Default)]
struct Tracer {
    events: Vec<String>,
    fail_on: Option<&'static str>,
}

impl Tracer {
    fn log(&mut self, hook: impl Into<String>, ctx: &TraverseCtx<'_>) {
        self.events
            .push(format!("{} @ {}", hook.into(), ctx.parent().ty().name()));
    }
}

impl<'a> Traverse<'a> for Tracer {
    fn enter_statement(&mut self, _: &mut Statement<'a>, ctx: &mut TraverseCtx<'a>) -> TraverseResult {
        self.log("statement", ctx);
        Ok(())
    }

    fn enter_declaration(
        &mut self,
        _: &mut Declaration<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.log("declaration", ctx);
        Ok(())
    }

    fn enter_function(&mut self, _: &mut Function<'a>, ctx: &mut TraverseCtx<'a>) -> TraverseResult {
        self.log("function", ctx);
        Ok(())
    }

    fn enter_formal_parameters(
        &mut self,
        _: &mut FormalParameters<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.log("formal_parameters", ctx);
        Ok(())
    }

    fn enter_binding_identifier(
        &mut self,
        node: &mut BindingIdentifier<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.log(format!("binding_identifier {}", node.name), ctx);
        Ok(())
    }

    fn enter_expression(&mut self, _: &mut Expression<'a>, ctx: &mut TraverseCtx<'a>) -> TraverseResult {
        self.log("expression", ctx);
        Ok(())
    }

    fn enter_binary_expression(
        &mut self,
        _: &mut BinaryExpression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.log("binary_expression", ctx);
        Ok(())
    }

    fn exit_binary_expression(
        &mut self,
        _: &mut BinaryExpression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.log("exit binary_expression", ctx);
        Ok(())
    }

    fn enter_argument(&mut self, _: &mut Argument<'a>, ctx: &mut TraverseCtx<'a>) -> TraverseResult {
        self.log("argument", ctx);
        Ok(())
    }

    fn enter_member_expression(
        &mut self,
        _: &mut MemberExpression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.log("member_expression", ctx);
        Ok(())
    }

    fn enter_static_member_expression(
        &mut self,
        _: &mut StaticMemberExpression<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.log("static_member_expression", ctx);
        Ok(())
    }

    fn enter_identifier_reference(
        &mut self,
        node: &mut IdentifierReference<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        if self.fail_on == Some(node.name) {
            return Err(TraverseError::msg(format!("found {}", node.name)));
        }
        self.log(format!("identifier_reference {}", node.name), ctx);
        Ok(())
    }

    fn enter_identifier_name(
        &mut self,
        node: &mut IdentifierName<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.log(format!("identifier_name {}", node.name), ctx);
        Ok(())
    }
}

/// `a + b;`
fn binary_program<'a>(ast: AstBuilder<'a>) -> Program<'a> {
    let expr = ast.binary(
        SPAN,
        ast.identifier(SPAN, "a"),
        BinaryOperator::Addition,
        ast.identifier(SPAN, "b"),
    );
    ast.program(SPAN, ast.vec_from_iter([ast.expression_statement(SPAN, expr)]))
}

/// ```js
/// "use strict";
/// function f(x = 1) {
///   if (x) { return [x, , ...y]; } else g(x);
/// }
/// class C extends B { m() {} static { o.p = -z; } }
/// o[k] += typeof x;
/// ```
fn rich_program<'a>(ast: AstBuilder<'a>) -> Program<'a> {
    let array = ast.array(
        SPAN,
        ast.vec_from_iter([
            Some(ArrayExpressionElement::Expression(ast.identifier(SPAN, "x"))),
            None,
            Some(ArrayExpressionElement::SpreadElement(
                ast.spread(SPAN, ast.identifier(SPAN, "y")),
            )),
        ]),
    );
    let call = ast.call(
        SPAN,
        ast.identifier(SPAN, "g"),
        ast.vec_from_iter([Argument::Expression(ast.identifier(SPAN, "x"))]),
    );
    let if_statement = ast.if_statement(
        SPAN,
        ast.identifier(SPAN, "x"),
        ast.block(SPAN, ast.vec_from_iter([ast.return_statement(SPAN, Some(array))])),
        Some(ast.expression_statement(SPAN, call)),
    );
    let function = ast.function(
        SPAN,
        Some(ast.binding_identifier(SPAN, "f")),
        ast.vec_from_iter([ast.formal_parameter(SPAN, "x", Some(ast.number(SPAN, 1.0)))]),
        Some(ast.vec_from_iter([if_statement])),
    );

    let method = ClassElement::MethodDefinition(ast.alloc(MethodDefinition {
        span: SPAN,
        key: PropertyKey::StaticIdentifier(ast.alloc(ast.identifier_name(SPAN, "m"))),
        value: ast.function(SPAN, None, ast.vec(), Some(ast.vec())),
        kind: MethodDefinitionKind::Method,
        is_static: false,
    }));
    let assign = ast.assignment(
        SPAN,
        AssignmentOperator::Assign,
        AssignmentTarget::MemberExpression(ast.static_member(SPAN, ast.identifier(SPAN, "o"), "p")),
        ast.unary(SPAN, UnaryOperator::Negation, ast.identifier(SPAN, "z")),
    );
    let static_block = ClassElement::StaticBlock(ast.alloc(StaticBlock {
        span: SPAN,
        body: ast.vec_from_iter([ast.expression_statement(SPAN, assign)]),
    }));
    let class = ast.class(
        SPAN,
        Some(ast.binding_identifier(SPAN, "C")),
        Some(ast.identifier(SPAN, "B")),
        ast.vec_from_iter([method, static_block]),
    );

    let computed = ast.assignment(
        SPAN,
        AssignmentOperator::Addition,
        AssignmentTarget::MemberExpression(ast.computed_member(
            SPAN,
            ast.identifier(SPAN, "o"),
            ast.identifier(SPAN, "k"),
        )),
        ast.unary(SPAN, UnaryOperator::Typeof, ast.identifier(SPAN, "x")),
    );

    let mut program = ast.program(
        SPAN,
        ast.vec_from_iter([
            Statement::Declaration(Declaration::FunctionDeclaration(function)),
            Statement::Declaration(Declaration::ClassDeclaration(class)),
            ast.expression_statement(SPAN, computed),
        ]),
    );
    program.directives.push(ast.directive(SPAN, "use strict"));
    program
}

#[test]
fn test_noop_traversal_leaves_tree_unchanged() {
    init_test_logging();
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let mut program = rich_program(ast);
    let expected = rich_program(ast);

    let mut ctx = TraverseCtx::new(&arena);
    let stats = traverse_node(&mut Noop, &mut program, &mut ctx).unwrap();

    assert_eq!(program, expected);
    assert_eq!(ctx.depth(), 0);
    assert_eq!(stats.pushes, stats.pops);
    assert!(stats.pushes > 0);
}

#[test]
fn test_binary_expression_pushes_left_then_retags_right() {
    let arena = Bump::new();
    let mut program = binary_program(AstBuilder::new(&arena));

    let mut tracer = Tracer::default();
    let stats = traverse_mut(&mut tracer, &mut program, &arena).unwrap();

    assert_eq!(
        tracer.events,
        vec![
            "statement @ ProgramBody",
            "expression @ ExpressionStatementExpression",
            "binary_expression @ ExpressionStatementExpression",
            "expression @ BinaryExpressionLeft",
            "identifier_reference a @ BinaryExpressionLeft",
            "expression @ BinaryExpressionRight",
            "identifier_reference b @ BinaryExpressionRight",
            "exit binary_expression @ ExpressionStatementExpression",
        ]
    );
    // Program, ExpressionStatement and BinaryExpression each push once.
    assert_eq!(stats.pushes, 3);
    assert_eq!(stats.pops, 3);
    // Program retags to `body`, BinaryExpression to `right`.
    assert_eq!(stats.retags, 2);
    assert_eq!(stats.max_depth, 3);
}

#[test]
fn test_absent_function_body_is_not_retagged() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);

    let declare = |body| {
        let function = ast.function(SPAN, Some(ast.binding_identifier(SPAN, "f")), ast.vec(), body);
        ast.program(
            SPAN,
            ast.vec_from_iter([Statement::Declaration(Declaration::FunctionDeclaration(
                function,
            ))]),
        )
    };

    let mut signature = declare(None);
    let stats = traverse_mut(&mut Noop, &mut signature, &arena).unwrap();
    // Program, Function and FormalParameters.
    assert_eq!(stats.pushes, 3);
    // ProgramBody and FunctionParams.
    assert_eq!(stats.retags, 2);

    let mut empty_body = declare(Some(ast.vec()));
    let stats = traverse_mut(&mut Noop, &mut empty_body, &arena).unwrap();
    assert_eq!(stats.pushes, 3);
    assert_eq!(stats.retags, 3);
}

#[test]
fn test_statement_routes_through_declaration_to_function() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let function = ast.function(SPAN, Some(ast.binding_identifier(SPAN, "f")), ast.vec(), None);
    let mut program = ast.program(
        SPAN,
        ast.vec_from_iter([Statement::Declaration(Declaration::FunctionDeclaration(
            function,
        ))]),
    );

    let mut tracer = Tracer::default();
    traverse_mut(&mut tracer, &mut program, &arena).unwrap();

    assert_eq!(
        tracer.events,
        vec![
            "statement @ ProgramBody",
            "declaration @ ProgramBody",
            "function @ ProgramBody",
            "binding_identifier f @ FunctionId",
            "formal_parameters @ FunctionParams",
        ]
    );
}

#[test]
fn test_argument_routes_through_expression_to_member_expression() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let member = ast.static_member(SPAN, ast.identifier(SPAN, "o"), "p");
    let call = ast.call(
        SPAN,
        ast.identifier(SPAN, "g"),
        ast.vec_from_iter([Argument::Expression(Expression::MemberExpression(member))]),
    );
    let mut program = ast.program(SPAN, ast.vec_from_iter([ast.expression_statement(SPAN, call)]));

    let mut tracer = Tracer::default();
    traverse_mut(&mut tracer, &mut program, &arena).unwrap();

    assert_eq!(
        tracer.events,
        vec![
            "statement @ ProgramBody",
            "expression @ ExpressionStatementExpression",
            "expression @ CallExpressionCallee",
            "identifier_reference g @ CallExpressionCallee",
            "argument @ CallExpressionArguments",
            "expression @ CallExpressionArguments",
            "member_expression @ CallExpressionArguments",
            "static_member_expression @ CallExpressionArguments",
            "expression @ StaticMemberExpressionObject",
            "identifier_reference o @ StaticMemberExpressionObject",
            "identifier_name p @ StaticMemberExpressionProperty",
        ]
    );
}

#[test]
fn test_hook_error_stops_traversal_and_unwinds() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let mut program = binary_program(ast);
    program
        .body
        .push(ast.expression_statement(SPAN, ast.identifier(SPAN, "c")));

    let mut tracer = Tracer {
        fail_on: Some("b"),
        ..Tracer::default()
    };
    let mut ctx = TraverseCtx::new(&arena);
    let error = traverse_node(&mut tracer, &mut program, &mut ctx).unwrap_err();

    assert_eq!(error.to_string(), "found b");
    assert_eq!(
        tracer.events.last().map(String::as_str),
        Some("expression @ BinaryExpressionRight")
    );
    assert!(!tracer.events.iter().any(|e| e.starts_with("exit")));
    assert!(!tracer.events.iter().any(|e| e.contains("reference c")));
    assert_eq!(ctx.depth(), 0);
    assert_eq!(ctx.stats().pushes, ctx.stats().pops);
}

/// Rewrites `left` and `operator` of a binary expression while its right
/// operand, a number, is being visited.
struct SiblingRewriter {
    seen_right: Option<f64>,
}

impl<'a> Traverse<'a> for SiblingRewriter {
    fn enter_identifier_reference(
        &mut self,
        _: &mut IdentifierReference<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        if let Ancestor::BinaryExpressionLeft(parent) = ctx.parent() {
            self.seen_right = parent.right().as_number();
        }
        Ok(())
    }

    fn enter_numeric_literal(
        &mut self,
        node: &mut NumericLiteral,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        let replacement = ctx.ast.identifier(SPAN, "rewritten");
        if let Ancestor::BinaryExpressionRight(parent) = ctx.parent_mut() {
            *parent.left_mut() = replacement;
            *parent.operator_mut() = BinaryOperator::Subtraction;
            node.value += 1.0;
        }
        Ok(())
    }
}

#[test]
fn test_parent_accessor_mutates_siblings() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let expr = ast.binary(
        SPAN,
        ast.identifier(SPAN, "a"),
        BinaryOperator::Addition,
        ast.number(SPAN, 1.0),
    );
    let mut program = ast.program(SPAN, ast.vec_from_iter([ast.expression_statement(SPAN, expr)]));

    let mut rewriter = SiblingRewriter { seen_right: None };
    traverse_mut(&mut rewriter, &mut program, &arena).unwrap();

    assert_eq!(rewriter.seen_right, Some(1.0));
    let expected = ast.binary(
        SPAN,
        ast.identifier(SPAN, "rewritten"),
        BinaryOperator::Subtraction,
        ast.number(SPAN, 2.0),
    );
    assert_eq!(program.body[0], ast.expression_statement(SPAN, expected));
}

/// Records where the `left` accessor of a `BinaryExpressionRight` entry
/// points, relative to the node.
#[derive(Default)]
struct LeftOffsetRecorder {
    left_offset: Option<usize>,
    span: Option<Span>,
}

impl<'a> Traverse<'a> for LeftOffsetRecorder {
    fn enter_expression(&mut self, _: &mut Expression<'a>, ctx: &mut TraverseCtx<'a>) -> TraverseResult {
        if let Ancestor::BinaryExpressionRight(parent) = ctx.parent() {
            let base = parent.0 as usize;
            let left = parent.left() as *const Expression<'a> as usize;
            self.left_offset = Some(left - base);
            self.span = Some(*parent.span());
        }
        Ok(())
    }
}

#[test]
fn test_accessor_address_is_node_address_plus_field_offset() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let mut expr = ast.binary(
        Span::new(3, 8),
        ast.identifier(SPAN, "a"),
        BinaryOperator::Addition,
        ast.identifier(SPAN, "b"),
    );
    let Expression::BinaryExpression(binary) = &mut expr else {
        unreachable!()
    };

    let mut recorder = LeftOffsetRecorder::default();
    let mut ctx = TraverseCtx::new(&arena);
    let stats = traverse_node(&mut recorder, &mut **binary, &mut ctx).unwrap();

    let offset = offset_of!(BinaryExpression, left);
    assert_eq!(recorder.left_offset, Some(offset));
    assert_eq!(recorder.span, Some(Span::new(3, 8)));
    assert_eq!((stats.pushes, stats.retags), (1, 1));

    let model = crate::model().unwrap();
    assert_eq!(
        model.sibling_offset(AncestorType::BinaryExpressionRight.tag_id(), "left"),
        Some(offset)
    );
}

/// Appends `inserted;` to the top-level statement list.
#[derive(Default)]
struct Inserter {
    names: Vec<String>,
    lists: usize,
}

impl<'a> Traverse<'a> for Inserter {
    fn enter_statements(
        &mut self,
        stmts: &mut crate::ast::Vec<'a, Statement<'a>>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.lists += 1;
        if ctx.parent().ty() == AncestorType::ProgramBody {
            stmts.push(ctx.ast.expression_statement(SPAN, ctx.ast.identifier(SPAN, "inserted")));
        }
        Ok(())
    }

    fn enter_identifier_reference(
        &mut self,
        node: &mut IdentifierReference<'a>,
        _: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.names.push(node.name.to_string());
        Ok(())
    }
}

#[test]
fn test_statements_inserted_on_enter_are_walked() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let mut program = ast.program(
        SPAN,
        ast.vec_from_iter([
            ast.expression_statement(SPAN, ast.identifier(SPAN, "a")),
            ast.block(SPAN, ast.vec()),
        ]),
    );

    let mut inserter = Inserter::default();
    traverse_mut(&mut inserter, &mut program, &arena).unwrap();

    assert_eq!(inserter.names, vec!["a", "inserted"]);
    // Program body and the block.
    assert_eq!(inserter.lists, 2);
    assert_eq!(program.body.len(), 3);
}

/// Queries the ancestor chain from inside `function f() { { x; } }`.
#[derive(Default)]
struct AncestorQuery {
    function: Option<Option<String>>,
    stopped: Option<()>,
    chain: Vec<&'static str>,
    beyond_root: bool,
}

impl<'a> Traverse<'a> for AncestorQuery {
    fn enter_identifier_reference(
        &mut self,
        _: &mut IdentifierReference<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.function = ctx.find_ancestor(|ancestor| match ancestor {
            Ancestor::FunctionBody(function) => {
                FinderRet::Found(function.id().as_ref().map(|id| id.name.to_string()))
            }
            _ => FinderRet::Continue,
        });
        self.stopped = ctx.find_ancestor(|ancestor| {
            if ancestor.is_block_statement() {
                FinderRet::Stop
            } else if ancestor.is_function() {
                FinderRet::Found(())
            } else {
                FinderRet::Continue
            }
        });
        self.chain = ctx.ancestors().map(|ancestor| ancestor.ty().name()).collect();
        self.beyond_root = ctx.ancestor(0).is_none() && ctx.ancestor(ctx.depth() + 1).is_none();
        assert_eq!(
            ctx.ancestor(ctx.depth()).map(Ancestor::ty),
            Some(AncestorType::ProgramBody)
        );
        assert_eq!(ctx.ancestor(1).map(Ancestor::ty), Some(ctx.parent().ty()));
        Ok(())
    }
}

#[test]
fn test_find_ancestor_walks_up_nearest_first() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let block = ast.block(
        SPAN,
        ast.vec_from_iter([ast.expression_statement(SPAN, ast.identifier(SPAN, "x"))]),
    );
    let function = ast.function(
        SPAN,
        Some(ast.binding_identifier(SPAN, "f")),
        ast.vec(),
        Some(ast.vec_from_iter([block])),
    );
    let mut program = ast.program(
        SPAN,
        ast.vec_from_iter([Statement::Declaration(Declaration::FunctionDeclaration(
            function,
        ))]),
    );

    let mut query = AncestorQuery::default();
    traverse_mut(&mut query, &mut program, &arena).unwrap();

    assert_eq!(query.function, Some(Some("f".to_string())));
    assert_eq!(query.stopped, None);
    assert_eq!(
        query.chain,
        vec![
            "ExpressionStatementExpression",
            "BlockStatementBody",
            "FunctionBody",
            "ProgramBody",
        ]
    );
    assert!(query.beyond_root);
}

#[test]
fn test_root_parent_is_none() {
    struct RootCheck(Option<bool>);

    impl<'a> Traverse<'a> for RootCheck {
        fn enter_program(&mut self, _: &mut Program<'a>, ctx: &mut TraverseCtx<'a>) -> TraverseResult {
            self.0 = Some(ctx.parent().is_none() && ctx.depth() == 0);
            Ok(())
        }
    }

    let arena = Bump::new();
    let mut program = binary_program(AstBuilder::new(&arena));
    let mut check = RootCheck(None);
    traverse_mut(&mut check, &mut program, &arena).unwrap();
    assert_eq!(check.0, Some(true));
}

#[test]
fn test_exit_hook_replaces_node() {
    struct FoldNegation;

    impl<'a> Traverse<'a> for FoldNegation {
        fn exit_expression(
            &mut self,
            node: &mut Expression<'a>,
            ctx: &mut TraverseCtx<'a>,
        ) -> TraverseResult {
            if let Expression::UnaryExpression(unary) = node {
                if unary.operator == UnaryOperator::Negation {
                    if let Some(value) = unary.argument.as_number() {
                        *node = ctx.ast.number(unary.span, -value);
                    }
                }
            }
            Ok(())
        }
    }

    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let expr = ast.binary(
        SPAN,
        ast.unary(SPAN, UnaryOperator::Negation, ast.number(SPAN, 2.0)),
        BinaryOperator::Multiplication,
        ast.unary(SPAN, UnaryOperator::Negation, ast.identifier(SPAN, "x")),
    );
    let mut program = ast.program(SPAN, ast.vec_from_iter([ast.expression_statement(SPAN, expr)]));
    traverse_mut(&mut FoldNegation, &mut program, &arena).unwrap();

    let expected = ast.binary(
        SPAN,
        ast.number(SPAN, -2.0),
        BinaryOperator::Multiplication,
        ast.unary(SPAN, UnaryOperator::Negation, ast.identifier(SPAN, "x")),
    );
    assert_eq!(program.body[0], ast.expression_statement(SPAN, expected));
}

/// `rich_program` plus the node types it lacks, with every optional field
/// present and a leaf below every field:
///
/// ```js
/// let v = a + b;
/// class D { n() { w; } q = true; }
/// ```
fn every_node_program<'a>(ast: AstBuilder<'a>) -> Program<'a> {
    let mut program = rich_program(ast);

    let sum = ast.binary(
        SPAN,
        ast.identifier(SPAN, "a"),
        BinaryOperator::Addition,
        ast.identifier(SPAN, "b"),
    );
    program
        .body
        .push(ast.variable_declaration(SPAN, VariableDeclarationKind::Let, "v", Some(sum)));

    let method = ClassElement::MethodDefinition(ast.alloc(MethodDefinition {
        span: SPAN,
        key: PropertyKey::StaticIdentifier(ast.alloc(ast.identifier_name(SPAN, "n"))),
        value: ast.function(
            SPAN,
            None,
            ast.vec(),
            Some(ast.vec_from_iter([ast.expression_statement(SPAN, ast.identifier(SPAN, "w"))])),
        ),
        kind: MethodDefinitionKind::Method,
        is_static: false,
    }));
    let property = ClassElement::PropertyDefinition(ast.alloc(PropertyDefinition {
        span: SPAN,
        key: PropertyKey::StaticIdentifier(ast.alloc(ast.identifier_name(SPAN, "q"))),
        value: Some(ast.boolean(SPAN, true)),
        is_static: false,
    }));
    let class = ast.class(
        SPAN,
        Some(ast.binding_identifier(SPAN, "D")),
        None,
        ast.vec_from_iter([method, property]),
    );
    program
        .body
        .push(Statement::Declaration(Declaration::ClassDeclaration(class)));
    program
}

/// Records the layout of every ancestor accessor on the stack whenever a
/// leaf node is entered.
#[derive(Default)]
struct LayoutRecorder {
    layouts: BTreeMap<AncestorType, Vec<(&'static str, usize, &'static str)>>,
}

impl LayoutRecorder {
    fn record(&mut self, ctx: &TraverseCtx<'_>) -> TraverseResult {
        for ancestor in ctx.stack() {
            self.layouts
                .entry(ancestor.ty())
                .or_insert_with(|| ancestor.sibling_layout());
        }
        Ok(())
    }
}

impl<'a> Traverse<'a> for LayoutRecorder {
    fn enter_string_literal(
        &mut self,
        _: &mut StringLiteral<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.record(ctx)
    }

    fn enter_numeric_literal(
        &mut self,
        _: &mut NumericLiteral,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.record(ctx)
    }

    fn enter_boolean_literal(
        &mut self,
        _: &mut BooleanLiteral,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.record(ctx)
    }

    fn enter_identifier_reference(
        &mut self,
        _: &mut IdentifierReference<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.record(ctx)
    }

    fn enter_identifier_name(
        &mut self,
        _: &mut IdentifierName<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.record(ctx)
    }

    fn enter_binding_identifier(
        &mut self,
        _: &mut BindingIdentifier<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        self.record(ctx)
    }
}

#[test]
fn test_every_accessor_matches_model_layout() {
    let model = crate::model().unwrap();
    let catalogue = model.catalogue();
    let arena = Bump::new();
    let mut program = every_node_program(AstBuilder::new(&arena));

    let mut recorder = LayoutRecorder::default();
    traverse_mut(&mut recorder, &mut program, &arena).unwrap();

    for tag in model.ancestors().tags() {
        let ty = AncestorType::ALL[tag.id().index()];
        let layout = recorder
            .layouts
            .get(&ty)
            .unwrap_or_else(|| panic!("{} never on the stack", tag.name()));
        let parent = catalogue.get(tag.parent()).as_struct().unwrap();

        let expected: Vec<&str> = parent
            .fields()
            .iter()
            .map(|field| field.name())
            .filter(|&name| name != tag.field())
            .collect();
        let actual: Vec<&str> = layout.iter().map(|&(name, _, _)| name).collect();
        assert_eq!(actual, expected, "accessors of {}", tag.name());

        for &(name, offset, declared) in layout {
            assert_eq!(
                Some(offset),
                model.sibling_offset(tag.id(), name),
                "{}.{name}",
                tag.name()
            );
            let field = parent.field(name).unwrap();
            assert_eq!(
                TypeExpr::parse(declared).unwrap(),
                TypeExpr::parse(field.declared_type()).unwrap(),
                "{}.{name}",
                tag.name()
            );
        }
    }
}

/// Splits a stack log into one `(action, tag)` sequence per walker frame,
/// in the order frames were popped.
fn walker_frames(ops: &[StackOp]) -> Vec<Vec<(StackAction, TagId)>> {
    let mut open: Vec<Vec<(StackAction, TagId)>> = Vec::new();
    let mut closed = Vec::new();
    for op in ops {
        match *op {
            StackOp::Push(ty) => open.push(vec![(StackAction::Push, ty.tag_id())]),
            StackOp::Retag(ty) => open
                .last_mut()
                .expect("retag without a frame")
                .push((StackAction::Retag, ty.tag_id())),
            StackOp::Pop => closed.push(open.pop().expect("pop without a frame")),
        }
    }
    assert!(open.is_empty(), "unbalanced stack log");
    closed
}

#[test]
fn test_every_walker_follows_its_plan() {
    init_test_logging();
    let model = crate::model().unwrap();
    let dispatch = model.dispatch();
    let arena = Bump::new();
    let mut program = every_node_program(AstBuilder::new(&arena));

    let mut ctx = TraverseCtx::new(&arena);
    traverse_node(&mut Noop, &mut program, &mut ctx).unwrap();

    let mut complete = BTreeSet::new();
    for frame in walker_frames(&ctx.ops) {
        let owner = model.ancestors().tag(frame[0].1).unwrap().parent();
        let name = model.catalogue().get(owner).name();
        let plan = dispatch.plan(name).unwrap();
        let expected: Vec<(StackAction, TagId)> = plan
            .steps()
            .iter()
            .map(|step| (step.action(), step.tag()))
            .collect();
        assert_eq!(frame[0], expected[0], "{name} starts with its push");

        // Steps may only be skipped for absent optional fields.
        let mut walked = frame.iter().peekable();
        for (step, &(action, tag)) in plan.steps().iter().zip(&expected) {
            if walked.peek() == Some(&&(action, tag)) {
                walked.next();
            } else {
                assert!(step.shape().is_optional(), "{name} skipped {}", step.field());
            }
        }
        assert_eq!(walked.next(), None, "{name} walked fields out of plan order");

        if frame == expected {
            complete.insert(name);
        }
    }

    let tagged: BTreeSet<&str> = dispatch
        .plans()
        .iter()
        .filter(|plan| plan.pushes() > 0)
        .map(|plan| model.catalogue().get(plan.ty()).name())
        .collect();
    assert_eq!(complete, tagged);
}

/// Walks each expression statement's expression again, from inside the
/// statement's hook.
#[derive(Default)]
struct NestedWalk {
    inner: Vec<(usize, usize)>,
}

impl<'a> Traverse<'a> for NestedWalk {
    fn enter_expression_statement(
        &mut self,
        node: &mut ExpressionStatement<'a>,
        ctx: &mut TraverseCtx<'a>,
    ) -> TraverseResult {
        let stats = traverse_node(&mut Noop, &mut node.expression, ctx)?;
        self.inner.push((ctx.depth(), stats.max_depth));
        Ok(())
    }
}

#[test]
fn test_max_depth_is_counted_per_call() {
    let arena = Bump::new();
    let ast = AstBuilder::new(&arena);
    let mut ctx = TraverseCtx::new(&arena);

    let mut program = binary_program(ast);
    let mut nested = NestedWalk::default();
    let stats = traverse_node(&mut nested, &mut program, &mut ctx).unwrap();
    // Program, ExpressionStatement, BinaryExpression.
    assert_eq!(stats.max_depth, 3);
    // The inner walk starts below ProgramBody and adds the binary's frame.
    assert_eq!(nested.inner, vec![(1, 1)]);
    assert_eq!(ctx.stats().max_depth, 3);

    let mut lone = ast.identifier(SPAN, "x");
    let stats = traverse_node(&mut Noop, &mut lone, &mut ctx).unwrap();
    assert_eq!(stats.max_depth, 0);
    assert_eq!(ctx.stats().max_depth, 3);
}
