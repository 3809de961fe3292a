//! Walk routines, one per node type.
//!
//! Struct walkers call `enter`, push an ancestor entry for their first
//! descendable field, retag it in place for each later field, pop it, then
//! call `exit`. A field wrapped in `Option` is only retagged when present.
//! Enum walkers call `enter`, hand the payload to the walker of the
//! variant's type, then call `exit`.
//!
//! Walkers take raw pointers so that the node and its ancestors are never
//! borrowed as a whole while a child is being walked.

#![allow(unsafe_op_in_unsafe_fn, clippy::missing_safety_doc)]

use super::ancestor::{self, Ancestor, AncestorType};
use super::{Traverse, TraverseCtx, TraverseResult};
use crate::ast::*;

pub(crate) unsafe fn walk_program<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut Program<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_program(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::ProgramDirectives(
        ancestor::ProgramWithoutDirectives(node),
    ));
    for item in (*node).directives.iter_mut() {
        walk_directive(traverser, item as *mut _, ctx)?;
    }
    ctx.retag_stack(AncestorType::ProgramBody);
    walk_statements(traverser, &raw mut (*node).body, ctx)?;
    ctx.pop_stack();
    traverser.exit_program(&mut *node, ctx)
}

pub(crate) unsafe fn walk_directive<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut Directive<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_directive(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::DirectiveExpression(
        ancestor::DirectiveWithoutExpression(node),
    ));
    walk_string_literal(traverser, &raw mut (*node).expression, ctx)?;
    ctx.pop_stack();
    traverser.exit_directive(&mut *node, ctx)
}

pub(crate) unsafe fn walk_string_literal<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut StringLiteral<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_string_literal(&mut *node, ctx)?;
    traverser.exit_string_literal(&mut *node, ctx)
}

pub(crate) unsafe fn walk_numeric_literal<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut NumericLiteral,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_numeric_literal(&mut *node, ctx)?;
    traverser.exit_numeric_literal(&mut *node, ctx)
}

pub(crate) unsafe fn walk_boolean_literal<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut BooleanLiteral,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_boolean_literal(&mut *node, ctx)?;
    traverser.exit_boolean_literal(&mut *node, ctx)
}

pub(crate) unsafe fn walk_identifier_reference<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut IdentifierReference<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_identifier_reference(&mut *node, ctx)?;
    traverser.exit_identifier_reference(&mut *node, ctx)
}

pub(crate) unsafe fn walk_identifier_name<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut IdentifierName<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_identifier_name(&mut *node, ctx)?;
    traverser.exit_identifier_name(&mut *node, ctx)
}

pub(crate) unsafe fn walk_binding_identifier<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut BindingIdentifier<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_binding_identifier(&mut *node, ctx)?;
    traverser.exit_binding_identifier(&mut *node, ctx)
}

/// A statement list, bracketed by `enter_statements`/`exit_statements`.
pub(crate) unsafe fn walk_statements<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    stmts: *mut Vec<'a, Statement<'a>>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_statements(&mut *stmts, ctx)?;
    for stmt in (*stmts).iter_mut() {
        walk_statement(traverser, stmt as *mut _, ctx)?;
    }
    traverser.exit_statements(&mut *stmts, ctx)
}

pub(crate) unsafe fn walk_statement<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut Statement<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_statement(&mut *node, ctx)?;
    match &mut *node {
        Statement::BlockStatement(inner) => {
            walk_block_statement(traverser, &mut **inner as *mut _, ctx)?
        }
        Statement::ExpressionStatement(inner) => {
            walk_expression_statement(traverser, &mut **inner as *mut _, ctx)?
        }
        Statement::IfStatement(inner) => {
            walk_if_statement(traverser, &mut **inner as *mut _, ctx)?
        }
        Statement::ReturnStatement(inner) => {
            walk_return_statement(traverser, &mut **inner as *mut _, ctx)?
        }
        Statement::Declaration(inner) => walk_declaration(traverser, inner as *mut _, ctx)?,
    }
    traverser.exit_statement(&mut *node, ctx)
}

pub(crate) unsafe fn walk_block_statement<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut BlockStatement<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_block_statement(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::BlockStatementBody(
        ancestor::BlockStatementWithoutBody(node),
    ));
    walk_statements(traverser, &raw mut (*node).body, ctx)?;
    ctx.pop_stack();
    traverser.exit_block_statement(&mut *node, ctx)
}

pub(crate) unsafe fn walk_expression_statement<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut ExpressionStatement<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_expression_statement(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::ExpressionStatementExpression(
        ancestor::ExpressionStatementWithoutExpression(node),
    ));
    walk_expression(traverser, &raw mut (*node).expression, ctx)?;
    ctx.pop_stack();
    traverser.exit_expression_statement(&mut *node, ctx)
}

pub(crate) unsafe fn walk_if_statement<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut IfStatement<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_if_statement(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::IfStatementTest(ancestor::IfStatementWithoutTest(
        node,
    )));
    walk_expression(traverser, &raw mut (*node).test, ctx)?;
    ctx.retag_stack(AncestorType::IfStatementConsequent);
    walk_statement(traverser, &raw mut (*node).consequent, ctx)?;
    if let Some(field) = &mut (*node).alternate {
        ctx.retag_stack(AncestorType::IfStatementAlternate);
        walk_statement(traverser, field as *mut _, ctx)?;
    }
    ctx.pop_stack();
    traverser.exit_if_statement(&mut *node, ctx)
}

pub(crate) unsafe fn walk_return_statement<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut ReturnStatement<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_return_statement(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::ReturnStatementArgument(
        ancestor::ReturnStatementWithoutArgument(node),
    ));
    if let Some(field) = &mut (*node).argument {
        walk_expression(traverser, field as *mut _, ctx)?;
    }
    ctx.pop_stack();
    traverser.exit_return_statement(&mut *node, ctx)
}

pub(crate) unsafe fn walk_declaration<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut Declaration<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_declaration(&mut *node, ctx)?;
    match &mut *node {
        Declaration::VariableDeclaration(inner) => {
            walk_variable_declaration(traverser, &mut **inner as *mut _, ctx)?
        }
        Declaration::FunctionDeclaration(inner) => {
            walk_function(traverser, &mut **inner as *mut _, ctx)?
        }
        Declaration::ClassDeclaration(inner) => {
            walk_class(traverser, &mut **inner as *mut _, ctx)?
        }
    }
    traverser.exit_declaration(&mut *node, ctx)
}

pub(crate) unsafe fn walk_variable_declaration<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut VariableDeclaration<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_variable_declaration(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::VariableDeclarationDeclarations(
        ancestor::VariableDeclarationWithoutDeclarations(node),
    ));
    for item in (*node).declarations.iter_mut() {
        walk_variable_declarator(traverser, item as *mut _, ctx)?;
    }
    ctx.pop_stack();
    traverser.exit_variable_declaration(&mut *node, ctx)
}

pub(crate) unsafe fn walk_variable_declarator<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut VariableDeclarator<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_variable_declarator(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::VariableDeclaratorId(
        ancestor::VariableDeclaratorWithoutId(node),
    ));
    walk_binding_identifier(traverser, &raw mut (*node).id, ctx)?;
    if let Some(field) = &mut (*node).init {
        ctx.retag_stack(AncestorType::VariableDeclaratorInit);
        walk_expression(traverser, field as *mut _, ctx)?;
    }
    ctx.pop_stack();
    traverser.exit_variable_declarator(&mut *node, ctx)
}

pub(crate) unsafe fn walk_function<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut Function<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_function(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::FunctionId(ancestor::FunctionWithoutId(node)));
    if let Some(field) = &mut (*node).id {
        walk_binding_identifier(traverser, field as *mut _, ctx)?;
    }
    ctx.retag_stack(AncestorType::FunctionParams);
    walk_formal_parameters(traverser, &mut *(*node).params as *mut _, ctx)?;
    if let Some(field) = &mut (*node).body {
        ctx.retag_stack(AncestorType::FunctionBody);
        walk_statements(traverser, field as *mut _, ctx)?;
    }
    ctx.pop_stack();
    traverser.exit_function(&mut *node, ctx)
}

pub(crate) unsafe fn walk_formal_parameters<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut FormalParameters<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_formal_parameters(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::FormalParametersItems(
        ancestor::FormalParametersWithoutItems(node),
    ));
    for item in (*node).items.iter_mut() {
        walk_formal_parameter(traverser, &mut **item as *mut _, ctx)?;
    }
    ctx.pop_stack();
    traverser.exit_formal_parameters(&mut *node, ctx)
}

pub(crate) unsafe fn walk_formal_parameter<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut FormalParameter<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_formal_parameter(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::FormalParameterBinding(
        ancestor::FormalParameterWithoutBinding(node),
    ));
    walk_binding_identifier(traverser, &raw mut (*node).binding, ctx)?;
    if let Some(field) = &mut (*node).initializer {
        ctx.retag_stack(AncestorType::FormalParameterInitializer);
        walk_expression(traverser, &mut **field as *mut _, ctx)?;
    }
    ctx.pop_stack();
    traverser.exit_formal_parameter(&mut *node, ctx)
}

pub(crate) unsafe fn walk_class<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut Class<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_class(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::ClassId(ancestor::ClassWithoutId(node)));
    if let Some(field) = &mut (*node).id {
        walk_binding_identifier(traverser, field as *mut _, ctx)?;
    }
    if let Some(field) = &mut (*node).super_class {
        ctx.retag_stack(AncestorType::ClassSuperClass);
        walk_expression(traverser, field as *mut _, ctx)?;
    }
    ctx.retag_stack(AncestorType::ClassBody);
    walk_class_body(traverser, &mut *(*node).body as *mut _, ctx)?;
    ctx.pop_stack();
    traverser.exit_class(&mut *node, ctx)
}

pub(crate) unsafe fn walk_class_body<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut ClassBody<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_class_body(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::ClassBodyBody(ancestor::ClassBodyWithoutBody(
        node,
    )));
    for item in (*node).body.iter_mut() {
        walk_class_element(traverser, item as *mut _, ctx)?;
    }
    ctx.pop_stack();
    traverser.exit_class_body(&mut *node, ctx)
}

pub(crate) unsafe fn walk_class_element<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut ClassElement<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_class_element(&mut *node, ctx)?;
    match &mut *node {
        ClassElement::MethodDefinition(inner) => {
            walk_method_definition(traverser, &mut **inner as *mut _, ctx)?
        }
        ClassElement::PropertyDefinition(inner) => {
            walk_property_definition(traverser, &mut **inner as *mut _, ctx)?
        }
        ClassElement::StaticBlock(inner) => {
            walk_static_block(traverser, &mut **inner as *mut _, ctx)?
        }
    }
    traverser.exit_class_element(&mut *node, ctx)
}

pub(crate) unsafe fn walk_method_definition<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut MethodDefinition<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_method_definition(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::MethodDefinitionKey(
        ancestor::MethodDefinitionWithoutKey(node),
    ));
    walk_property_key(traverser, &raw mut (*node).key, ctx)?;
    ctx.retag_stack(AncestorType::MethodDefinitionValue);
    walk_function(traverser, &mut *(*node).value as *mut _, ctx)?;
    ctx.pop_stack();
    traverser.exit_method_definition(&mut *node, ctx)
}

pub(crate) unsafe fn walk_property_definition<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut PropertyDefinition<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_property_definition(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::PropertyDefinitionKey(
        ancestor::PropertyDefinitionWithoutKey(node),
    ));
    walk_property_key(traverser, &raw mut (*node).key, ctx)?;
    if let Some(field) = &mut (*node).value {
        ctx.retag_stack(AncestorType::PropertyDefinitionValue);
        walk_expression(traverser, field as *mut _, ctx)?;
    }
    ctx.pop_stack();
    traverser.exit_property_definition(&mut *node, ctx)
}

pub(crate) unsafe fn walk_static_block<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut StaticBlock<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_static_block(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::StaticBlockBody(ancestor::StaticBlockWithoutBody(
        node,
    )));
    walk_statements(traverser, &raw mut (*node).body, ctx)?;
    ctx.pop_stack();
    traverser.exit_static_block(&mut *node, ctx)
}

pub(crate) unsafe fn walk_property_key<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut PropertyKey<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_property_key(&mut *node, ctx)?;
    match &mut *node {
        PropertyKey::StaticIdentifier(inner) => {
            walk_identifier_name(traverser, &mut **inner as *mut _, ctx)?
        }
        PropertyKey::Expression(inner) => walk_expression(traverser, inner as *mut _, ctx)?,
    }
    traverser.exit_property_key(&mut *node, ctx)
}

pub(crate) unsafe fn walk_expression<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut Expression<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_expression(&mut *node, ctx)?;
    match &mut *node {
        Expression::BooleanLiteral(inner) => {
            walk_boolean_literal(traverser, &mut **inner as *mut _, ctx)?
        }
        Expression::NumericLiteral(inner) => {
            walk_numeric_literal(traverser, &mut **inner as *mut _, ctx)?
        }
        Expression::StringLiteral(inner) => {
            walk_string_literal(traverser, &mut **inner as *mut _, ctx)?
        }
        Expression::Identifier(inner) => {
            walk_identifier_reference(traverser, &mut **inner as *mut _, ctx)?
        }
        Expression::ArrayExpression(inner) => {
            walk_array_expression(traverser, &mut **inner as *mut _, ctx)?
        }
        Expression::BinaryExpression(inner) => {
            walk_binary_expression(traverser, &mut **inner as *mut _, ctx)?
        }
        Expression::UnaryExpression(inner) => {
            walk_unary_expression(traverser, &mut **inner as *mut _, ctx)?
        }
        Expression::CallExpression(inner) => {
            walk_call_expression(traverser, &mut **inner as *mut _, ctx)?
        }
        Expression::AssignmentExpression(inner) => {
            walk_assignment_expression(traverser, &mut **inner as *mut _, ctx)?
        }
        Expression::FunctionExpression(inner) => {
            walk_function(traverser, &mut **inner as *mut _, ctx)?
        }
        Expression::ClassExpression(inner) => {
            walk_class(traverser, &mut **inner as *mut _, ctx)?
        }
        Expression::MemberExpression(inner) => {
            walk_member_expression(traverser, inner as *mut _, ctx)?
        }
    }
    traverser.exit_expression(&mut *node, ctx)
}

pub(crate) unsafe fn walk_member_expression<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut MemberExpression<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_member_expression(&mut *node, ctx)?;
    match &mut *node {
        MemberExpression::StaticMemberExpression(inner) => {
            walk_static_member_expression(traverser, &mut **inner as *mut _, ctx)?
        }
        MemberExpression::ComputedMemberExpression(inner) => {
            walk_computed_member_expression(traverser, &mut **inner as *mut _, ctx)?
        }
    }
    traverser.exit_member_expression(&mut *node, ctx)
}

pub(crate) unsafe fn walk_array_expression<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut ArrayExpression<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_array_expression(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::ArrayExpressionElements(
        ancestor::ArrayExpressionWithoutElements(node),
    ));
    for item in (*node).elements.iter_mut().flatten() {
        walk_array_expression_element(traverser, item as *mut _, ctx)?;
    }
    ctx.pop_stack();
    traverser.exit_array_expression(&mut *node, ctx)
}

pub(crate) unsafe fn walk_array_expression_element<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut ArrayExpressionElement<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_array_expression_element(&mut *node, ctx)?;
    match &mut *node {
        ArrayExpressionElement::SpreadElement(inner) => {
            walk_spread_element(traverser, &mut **inner as *mut _, ctx)?
        }
        ArrayExpressionElement::Expression(inner) => {
            walk_expression(traverser, inner as *mut _, ctx)?
        }
    }
    traverser.exit_array_expression_element(&mut *node, ctx)
}

pub(crate) unsafe fn walk_spread_element<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut SpreadElement<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_spread_element(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::SpreadElementArgument(
        ancestor::SpreadElementWithoutArgument(node),
    ));
    walk_expression(traverser, &raw mut (*node).argument, ctx)?;
    ctx.pop_stack();
    traverser.exit_spread_element(&mut *node, ctx)
}

pub(crate) unsafe fn walk_binary_expression<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut BinaryExpression<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_binary_expression(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::BinaryExpressionLeft(
        ancestor::BinaryExpressionWithoutLeft(node),
    ));
    walk_expression(traverser, &raw mut (*node).left, ctx)?;
    ctx.retag_stack(AncestorType::BinaryExpressionRight);
    walk_expression(traverser, &raw mut (*node).right, ctx)?;
    ctx.pop_stack();
    traverser.exit_binary_expression(&mut *node, ctx)
}

pub(crate) unsafe fn walk_unary_expression<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut UnaryExpression<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_unary_expression(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::UnaryExpressionArgument(
        ancestor::UnaryExpressionWithoutArgument(node),
    ));
    walk_expression(traverser, &raw mut (*node).argument, ctx)?;
    ctx.pop_stack();
    traverser.exit_unary_expression(&mut *node, ctx)
}

pub(crate) unsafe fn walk_call_expression<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut CallExpression<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_call_expression(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::CallExpressionCallee(
        ancestor::CallExpressionWithoutCallee(node),
    ));
    walk_expression(traverser, &raw mut (*node).callee, ctx)?;
    ctx.retag_stack(AncestorType::CallExpressionArguments);
    for item in (*node).arguments.iter_mut() {
        walk_argument(traverser, item as *mut _, ctx)?;
    }
    ctx.pop_stack();
    traverser.exit_call_expression(&mut *node, ctx)
}

pub(crate) unsafe fn walk_argument<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut Argument<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_argument(&mut *node, ctx)?;
    match &mut *node {
        Argument::SpreadElement(inner) => {
            walk_spread_element(traverser, &mut **inner as *mut _, ctx)?
        }
        Argument::Expression(inner) => walk_expression(traverser, inner as *mut _, ctx)?,
    }
    traverser.exit_argument(&mut *node, ctx)
}

pub(crate) unsafe fn walk_assignment_expression<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut AssignmentExpression<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_assignment_expression(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::AssignmentExpressionLeft(
        ancestor::AssignmentExpressionWithoutLeft(node),
    ));
    walk_assignment_target(traverser, &raw mut (*node).left, ctx)?;
    ctx.retag_stack(AncestorType::AssignmentExpressionRight);
    walk_expression(traverser, &raw mut (*node).right, ctx)?;
    ctx.pop_stack();
    traverser.exit_assignment_expression(&mut *node, ctx)
}

pub(crate) unsafe fn walk_assignment_target<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut AssignmentTarget<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_assignment_target(&mut *node, ctx)?;
    match &mut *node {
        AssignmentTarget::AssignmentTargetIdentifier(inner) => {
            walk_identifier_reference(traverser, &mut **inner as *mut _, ctx)?
        }
        AssignmentTarget::MemberExpression(inner) => {
            walk_member_expression(traverser, inner as *mut _, ctx)?
        }
    }
    traverser.exit_assignment_target(&mut *node, ctx)
}

pub(crate) unsafe fn walk_static_member_expression<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut StaticMemberExpression<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_static_member_expression(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::StaticMemberExpressionObject(
        ancestor::StaticMemberExpressionWithoutObject(node),
    ));
    walk_expression(traverser, &raw mut (*node).object, ctx)?;
    ctx.retag_stack(AncestorType::StaticMemberExpressionProperty);
    walk_identifier_name(traverser, &raw mut (*node).property, ctx)?;
    ctx.pop_stack();
    traverser.exit_static_member_expression(&mut *node, ctx)
}

pub(crate) unsafe fn walk_computed_member_expression<'a, Tr: Traverse<'a>>(
    traverser: &mut Tr,
    node: *mut ComputedMemberExpression<'a>,
    ctx: &mut TraverseCtx<'a>,
) -> TraverseResult {
    traverser.enter_computed_member_expression(&mut *node, ctx)?;
    ctx.push_stack(Ancestor::ComputedMemberExpressionObject(
        ancestor::ComputedMemberExpressionWithoutObject(node),
    ));
    walk_expression(traverser, &raw mut (*node).object, ctx)?;
    ctx.retag_stack(AncestorType::ComputedMemberExpressionExpression);
    walk_expression(traverser, &raw mut (*node).expression, ctx)?;
    ctx.pop_stack();
    traverser.exit_computed_member_expression(&mut *node, ctx)
}
