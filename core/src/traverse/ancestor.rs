//! Ancestor stack entries.
//!
//! An [`Ancestor`] records that traversal is currently inside field `F` of a
//! live node of type `T`. It holds a raw pointer to that node and exposes
//! every field of `T` *except* `F` through its `TWithoutF` accessor type.
//! `F` is excluded because the walk below the entry holds `&mut` to it.
//!
//! Accessors compute field addresses as `node address + offset_of!(T, G)`
//! and never materialize a reference to `T` itself, so reading or mutating
//! a sibling does not conflict with the borrow of the field being walked.
//!
//! Accessor references borrow the [`TraverseCtx`](super::TraverseCtx) they
//! came from and so cannot outlive the hook that obtained them.

use core::mem::offset_of;

use arbor_model::TagId;
use static_assertions::assert_eq_size;

use crate::ast::*;

macro_rules! ancestors {
    (
        $lt:lifetime;
        $(
            $parent:ident {
                $( $field:ident { $( $other:ident : $ty:ty ),* $(,)? } )*
            }
        )*
    ) => {
        paste::paste! {
            /// Discriminant of an [`Ancestor`].
            ///
            /// Values are assigned sequentially: `None` is 0, then one value per
            /// (struct, descendable field) in declaration order.
            #[repr(u8)]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub enum AncestorType {
                None = 0,
                $( $( [<$parent $field:camel>], )* )*
            }

            impl AncestorType {
                /// Every tag, in discriminant order.
                pub const ALL: &'static [AncestorType] = &[
                    Self::None,
                    $( $( Self::[<$parent $field:camel>], )* )*
                ];

                pub fn name(self) -> &'static str {
                    match self {
                        Self::None => "None",
                        $( $( Self::[<$parent $field:camel>] => stringify!([<$parent $field:camel>]), )* )*
                    }
                }

                $(
                    #[doc = concat!("Entry points into a field of [`", stringify!($parent), "`].")]
                    pub fn [<is_ $parent:snake>](self) -> bool {
                        matches!(self, $( Self::[<$parent $field:camel>] )|*)
                    }
                )*
            }

            /// One entry of the ancestor stack.
            #[repr(C, u8)]
            #[derive(Debug)]
            pub enum Ancestor<$lt> {
                /// Above the root. Returned by [`TraverseCtx::parent`](super::TraverseCtx::parent)
                /// while visiting the node traversal started at.
                #[non_exhaustive]
                None = AncestorType::None as u8,
                $( $(
                    [<$parent $field:camel>]([<$parent Without $field:camel>]<$lt>)
                        = AncestorType::[<$parent $field:camel>] as u8,
                )* )*
            }

            impl<$lt> Ancestor<$lt> {
                $(
                    #[inline]
                    pub fn [<is_ $parent:snake>](&self) -> bool {
                        self.ty().[<is_ $parent:snake>]()
                    }
                )*
            }

            #[cfg(test)]
            impl<$lt> Ancestor<$lt> {
                /// Each accessor as `(field, byte offset from the node, declared type)`,
                /// with the offset measured on the reference the accessor returns.
                pub(crate) fn sibling_layout(&self) -> std::vec::Vec<(&'static str, usize, &'static str)> {
                    match self {
                        Self::None => std::vec::Vec::new(),
                        $( $(
                            Self::[<$parent $field:camel>](entry) => {
                                let base = entry.0 as usize;
                                std::vec![$(
                                    (
                                        stringify!($other),
                                        entry.$other() as *const $ty as usize - base,
                                        stringify!($ty),
                                    ),
                                )*]
                            }
                        )* )*
                    }
                }
            }

            $( $(
                #[doc = concat!(
                    "[`", stringify!($parent), "`] entered through its `",
                    stringify!($field), "` field. Every other field is accessible."
                )]
                #[repr(transparent)]
                #[derive(Debug)]
                pub struct [<$parent Without $field:camel>]<$lt>(pub(crate) *mut $parent<$lt>);

                impl<$lt> [<$parent Without $field:camel>]<$lt> {
                    $(
                        #[inline]
                        pub fn $other(&self) -> &$ty {
                            // SAFETY: the node outlives its stack entry and the walk
                            // below the entry only borrows the excluded field.
                            unsafe { &*self.field::<$ty>(offset_of!($parent<$lt>, $other)) }
                        }

                        #[inline]
                        pub fn [<$other _mut>](&mut self) -> &mut $ty {
                            // SAFETY: as above; `&mut self` makes the access exclusive.
                            unsafe { &mut *self.field::<$ty>(offset_of!($parent<$lt>, $other)) }
                        }
                    )*

                    #[inline]
                    fn field<T>(&self, offset: usize) -> *mut T {
                        // SAFETY: `offset` comes from `offset_of!` on the pointee type.
                        unsafe { self.0.cast::<u8>().add(offset).cast::<T>() }
                    }
                }
            )* )*
        }
    };
}

ancestors! {
    'a;
    Program {
        directives { span: Span, body: Vec<'a, Statement<'a>> }
        body { span: Span, directives: Vec<'a, Directive<'a>> }
    }
    Directive {
        expression { span: Span, directive: &'a str }
    }
    BlockStatement {
        body { span: Span }
    }
    ExpressionStatement {
        expression { span: Span }
    }
    IfStatement {
        test { span: Span, consequent: Statement<'a>, alternate: Option<Statement<'a>> }
        consequent { span: Span, test: Expression<'a>, alternate: Option<Statement<'a>> }
        alternate { span: Span, test: Expression<'a>, consequent: Statement<'a> }
    }
    ReturnStatement {
        argument { span: Span }
    }
    VariableDeclaration {
        declarations { span: Span, kind: VariableDeclarationKind }
    }
    VariableDeclarator {
        id { span: Span, kind: VariableDeclarationKind, init: Option<Expression<'a>> }
        init { span: Span, kind: VariableDeclarationKind, id: BindingIdentifier<'a> }
    }
    Function {
        id {
            span: Span,
            is_async: bool,
            params: Box<'a, FormalParameters<'a>>,
            body: Option<Vec<'a, Statement<'a>>>,
        }
        params {
            span: Span,
            id: Option<BindingIdentifier<'a>>,
            is_async: bool,
            body: Option<Vec<'a, Statement<'a>>>,
        }
        body {
            span: Span,
            id: Option<BindingIdentifier<'a>>,
            is_async: bool,
            params: Box<'a, FormalParameters<'a>>,
        }
    }
    FormalParameters {
        items { span: Span }
    }
    FormalParameter {
        binding { span: Span, initializer: Option<Box<'a, Expression<'a>>> }
        initializer { span: Span, binding: BindingIdentifier<'a> }
    }
    Class {
        id {
            span: Span,
            super_class: Option<Expression<'a>>,
            body: Box<'a, ClassBody<'a>>,
        }
        super_class {
            span: Span,
            id: Option<BindingIdentifier<'a>>,
            body: Box<'a, ClassBody<'a>>,
        }
        body {
            span: Span,
            id: Option<BindingIdentifier<'a>>,
            super_class: Option<Expression<'a>>,
        }
    }
    ClassBody {
        body { span: Span }
    }
    MethodDefinition {
        key {
            span: Span,
            value: Box<'a, Function<'a>>,
            kind: MethodDefinitionKind,
            is_static: bool,
        }
        value {
            span: Span,
            key: PropertyKey<'a>,
            kind: MethodDefinitionKind,
            is_static: bool,
        }
    }
    PropertyDefinition {
        key { span: Span, value: Option<Expression<'a>>, is_static: bool }
        value { span: Span, key: PropertyKey<'a>, is_static: bool }
    }
    StaticBlock {
        body { span: Span }
    }
    ArrayExpression {
        elements { span: Span }
    }
    SpreadElement {
        argument { span: Span }
    }
    BinaryExpression {
        left { span: Span, operator: BinaryOperator, right: Expression<'a> }
        right { span: Span, left: Expression<'a>, operator: BinaryOperator }
    }
    UnaryExpression {
        argument { span: Span, operator: UnaryOperator }
    }
    CallExpression {
        callee { span: Span, arguments: Vec<'a, Argument<'a>>, optional: bool }
        arguments { span: Span, callee: Expression<'a>, optional: bool }
    }
    AssignmentExpression {
        left { span: Span, operator: AssignmentOperator, right: Expression<'a> }
        right { span: Span, operator: AssignmentOperator, left: AssignmentTarget<'a> }
    }
    StaticMemberExpression {
        object { span: Span, property: IdentifierName<'a>, optional: bool }
        property { span: Span, object: Expression<'a>, optional: bool }
    }
    ComputedMemberExpression {
        object { span: Span, expression: Expression<'a>, optional: bool }
        expression { span: Span, object: Expression<'a>, optional: bool }
    }
}

assert_eq_size!(AncestorType, u8);
assert_eq_size!(Ancestor<'static>, [usize; 2]);

impl AncestorType {
    /// Numeric tag, as assigned by the traversal model.
    pub fn tag_id(self) -> TagId {
        TagId::new(self as u32)
    }

    pub fn is_via_statement(self) -> bool {
        matches!(
            self,
            Self::ProgramBody
                | Self::BlockStatementBody
                | Self::IfStatementConsequent
                | Self::IfStatementAlternate
                | Self::FunctionBody
                | Self::StaticBlockBody
        )
    }

    /// `Statement` inherits `Declaration`, so every statement position can
    /// hold a declaration.
    pub fn is_via_declaration(self) -> bool {
        self.is_via_statement()
    }

    pub fn is_via_class_element(self) -> bool {
        matches!(self, Self::ClassBodyBody)
    }

    pub fn is_via_property_key(self) -> bool {
        matches!(self, Self::MethodDefinitionKey | Self::PropertyDefinitionKey)
    }

    pub fn is_via_argument(self) -> bool {
        matches!(self, Self::CallExpressionArguments)
    }

    pub fn is_via_array_expression_element(self) -> bool {
        matches!(self, Self::ArrayExpressionElements)
    }

    pub fn is_via_assignment_target(self) -> bool {
        matches!(self, Self::AssignmentExpressionLeft)
    }

    /// Fields typed `Expression`, or typed as an enum inheriting it.
    pub fn is_via_expression(self) -> bool {
        self.is_via_property_key()
            || self.is_via_argument()
            || self.is_via_array_expression_element()
            || matches!(
                self,
                Self::ExpressionStatementExpression
                    | Self::IfStatementTest
                    | Self::ReturnStatementArgument
                    | Self::VariableDeclaratorInit
                    | Self::FormalParameterInitializer
                    | Self::ClassSuperClass
                    | Self::PropertyDefinitionValue
                    | Self::SpreadElementArgument
                    | Self::BinaryExpressionLeft
                    | Self::BinaryExpressionRight
                    | Self::UnaryExpressionArgument
                    | Self::CallExpressionCallee
                    | Self::AssignmentExpressionRight
                    | Self::StaticMemberExpressionObject
                    | Self::ComputedMemberExpressionObject
                    | Self::ComputedMemberExpressionExpression
            )
    }

    pub fn is_via_member_expression(self) -> bool {
        self.is_via_expression() || self.is_via_assignment_target()
    }
}

impl<'a> Ancestor<'a> {
    /// The entry's tag.
    #[inline]
    pub fn ty(&self) -> AncestorType {
        // SAFETY: `repr(C, u8)` puts the discriminant in the first byte, and
        // every discriminant is the `AncestorType` of the same name.
        unsafe { *(self as *const Self as *const AncestorType) }
    }

    pub fn tag_id(&self) -> TagId {
        self.ty().tag_id()
    }

    pub fn is_none(&self) -> bool {
        self.ty() == AncestorType::None
    }

    pub fn is_via_statement(&self) -> bool {
        self.ty().is_via_statement()
    }

    pub fn is_via_declaration(&self) -> bool {
        self.ty().is_via_declaration()
    }

    pub fn is_via_class_element(&self) -> bool {
        self.ty().is_via_class_element()
    }

    pub fn is_via_property_key(&self) -> bool {
        self.ty().is_via_property_key()
    }

    pub fn is_via_argument(&self) -> bool {
        self.ty().is_via_argument()
    }

    pub fn is_via_array_expression_element(&self) -> bool {
        self.ty().is_via_array_expression_element()
    }

    pub fn is_via_assignment_target(&self) -> bool {
        self.ty().is_via_assignment_target()
    }

    pub fn is_via_expression(&self) -> bool {
        self.ty().is_via_expression()
    }

    pub fn is_via_member_expression(&self) -> bool {
        self.ty().is_via_member_expression()
    }
}
