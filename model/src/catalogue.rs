//! The type catalogue: shapes of every node type a walker visits.
//!
//! Types, fields and variants keep their declaration order. A field or
//! variant payload must name either a catalogued type or a terminal; the
//! reference check runs when a [`Model`](crate::Model) is built, so types
//! may be inserted in any order and may refer to each other cyclically.

use core::fmt;

use hashbrown::{HashMap, HashSet};

use crate::error::ModelError;
use crate::type_expr::{FieldShape, TypeExpr, Wrapper, WrapperChain};
use crate::{String, ToOwned, ToString, Vec};

/// Element names that are always terminal.
const PRIMITIVES: &[&str] = &[
    "bool", "char", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128",
    "isize", "f32", "f64", "&str",
];

/// Index of a type in its [`Catalogue`], in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A struct member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    declared_type: String,
    element: String,
    wrappers: WrapperChain,
    shape: FieldShape,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type text as declared, e.g. `Option<Vec<'a, Statement<'a>>>`.
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// The type left after removing every wrapper, e.g. `Statement`.
    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn wrappers(&self) -> &[Wrapper] {
        &self.wrappers
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }
}

/// An enum member carrying exactly one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    name: String,
    declared_type: String,
    payload: String,
    wrappers: WrapperChain,
    discriminant: Option<u32>,
}

impl Variant {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// The payload type with any `Box` removed.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn wrappers(&self) -> &[Wrapper] {
        &self.wrappers
    }

    pub fn is_boxed(&self) -> bool {
        self.wrappers.first() == Some(&Wrapper::BoxedRef)
    }

    /// The explicitly declared discriminant, if any.
    pub fn discriminant(&self) -> Option<u32> {
        self.discriminant
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructDef {
    fields: Vec<Field>,
}

impl StructDef {
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumDef {
    variants: Vec<Variant>,
    inherits: Vec<String>,
}

impl EnumDef {
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    /// Names of the enums whose variant sets this enum re-exports.
    pub fn inherits(&self) -> &[String] {
        &self.inherits
    }

    /// Effective discriminant of every variant: explicit values are used as
    /// given, the others continue from the previous variant (starting at 0).
    pub fn discriminants(&self) -> impl Iterator<Item = (&Variant, u32)> + '_ {
        let mut next = 0u32;
        self.variants.iter().map(move |variant| {
            let value = variant.discriminant.unwrap_or(next);
            next = value.wrapping_add(1);
            (variant, value)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Struct(StructDef),
    Enum(EnumDef),
}

/// A catalogued node type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeType {
    name: String,
    has_lifetime: bool,
    kind: NodeKind,
}

impl NodeType {
    /// Start declaring a struct.
    pub fn structure(name: &str) -> StructDecl {
        StructDecl {
            name: name.to_owned(),
            has_lifetime: false,
            fields: Vec::new(),
        }
    }

    /// Start declaring an enum.
    pub fn enumeration(name: &str) -> EnumDecl {
        EnumDecl {
            name: name.to_owned(),
            has_lifetime: false,
            variants: Vec::new(),
            inherits: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_lifetime(&self) -> bool {
        self.has_lifetime
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_struct(&self) -> Option<&StructDef> {
        match &self.kind {
            NodeKind::Struct(def) => Some(def),
            NodeKind::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDef> {
        match &self.kind {
            NodeKind::Enum(def) => Some(def),
            NodeKind::Struct(_) => None,
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, NodeKind::Struct(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, NodeKind::Enum(_))
    }
}

/// Builder for a struct [`NodeType`].
#[derive(Debug, Clone)]
pub struct StructDecl {
    name: String,
    has_lifetime: bool,
    fields: Vec<(String, String)>,
}

impl StructDecl {
    /// The struct takes the arena lifetime `'a`.
    pub fn lifetime(mut self) -> Self {
        self.has_lifetime = true;
        self
    }

    pub fn field(mut self, name: &str, declared_type: &str) -> Self {
        self.fields.push((name.to_owned(), declared_type.to_owned()));
        self
    }
}

/// Builder for an enum [`NodeType`].
#[derive(Debug, Clone)]
pub struct EnumDecl {
    name: String,
    has_lifetime: bool,
    variants: Vec<(String, String, Option<u32>)>,
    inherits: Vec<String>,
}

impl EnumDecl {
    /// The enum takes the arena lifetime `'a`.
    pub fn lifetime(mut self) -> Self {
        self.has_lifetime = true;
        self
    }

    pub fn variant(mut self, name: &str, payload: &str) -> Self {
        self.variants
            .push((name.to_owned(), payload.to_owned(), None));
        self
    }

    /// A variant with an explicit discriminant.
    pub fn variant_with(mut self, name: &str, payload: &str, discriminant: u32) -> Self {
        self.variants
            .push((name.to_owned(), payload.to_owned(), Some(discriminant)));
        self
    }

    /// Re-export the variant set of enum `base`.
    pub fn inherits(mut self, base: &str) -> Self {
        self.inherits.push(base.to_owned());
        self
    }
}

/// A pending declaration, accepted by [`Catalogue::insert`].
#[derive(Debug, Clone)]
pub enum NodeDecl {
    Struct(StructDecl),
    Enum(EnumDecl),
}

impl From<StructDecl> for NodeDecl {
    fn from(decl: StructDecl) -> Self {
        NodeDecl::Struct(decl)
    }
}

impl From<EnumDecl> for NodeDecl {
    fn from(decl: EnumDecl) -> Self {
        NodeDecl::Enum(decl)
    }
}

/// Node types in declaration order, plus the terminal registry.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    types: Vec<NodeType>,
    index: HashMap<String, TypeId>,
    terminals: HashSet<String>,
    statement: Option<String>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a declaration and append it.
    pub fn insert(&mut self, decl: impl Into<NodeDecl>) -> Result<TypeId, ModelError> {
        let ty = match decl.into() {
            NodeDecl::Struct(decl) => Self::declare_struct(decl)?,
            NodeDecl::Enum(decl) => Self::declare_enum(decl)?,
        };

        if self.index.contains_key(&ty.name) || self.terminals.contains(&ty.name) {
            return Err(ModelError::DuplicateType { name: ty.name });
        }

        let id = TypeId(self.types.len() as u32);
        tracing::trace!(name = %ty.name, %id, "catalogued type");
        self.index.insert(ty.name.clone(), id);
        self.types.push(ty);
        Ok(id)
    }

    fn declare_struct(decl: StructDecl) -> Result<NodeType, ModelError> {
        let mut fields: Vec<Field> = Vec::with_capacity(decl.fields.len());
        for (name, declared_type) in decl.fields {
            if fields.iter().any(|field| field.name == name) {
                return Err(ModelError::DuplicateMember {
                    owner: decl.name,
                    member: name,
                });
            }

            let invalid = |source| ModelError::InvalidMemberType {
                owner: decl.name.clone(),
                member: name.clone(),
                source,
            };
            let expr = TypeExpr::parse(&declared_type).map_err(invalid)?;
            let shape = expr.shape().map_err(invalid)?;
            let (wrappers, element) = expr.into_parts();
            fields.push(Field {
                name,
                declared_type,
                element,
                wrappers,
                shape,
            });
        }

        Ok(NodeType {
            name: decl.name,
            has_lifetime: decl.has_lifetime,
            kind: NodeKind::Struct(StructDef { fields }),
        })
    }

    fn declare_enum(decl: EnumDecl) -> Result<NodeType, ModelError> {
        let mut variants: Vec<Variant> = Vec::with_capacity(decl.variants.len());
        for (name, declared_type, discriminant) in decl.variants {
            if variants.iter().any(|variant| variant.name == name) {
                return Err(ModelError::DuplicateMember {
                    owner: decl.name,
                    member: name,
                });
            }

            let invalid = |source| ModelError::InvalidMemberType {
                owner: decl.name.clone(),
                member: name.clone(),
                source,
            };
            let expr = TypeExpr::parse(&declared_type).map_err(invalid)?;
            // A payload is either inline or boxed once.
            if !matches!(expr.wrappers(), [] | [Wrapper::BoxedRef]) {
                return Err(invalid(crate::TypeExprError::UnsupportedChain {
                    chain: expr.to_string(),
                }));
            }
            let (wrappers, payload) = expr.into_parts();
            variants.push(Variant {
                name,
                declared_type,
                payload,
                wrappers,
                discriminant,
            });
        }

        let def = EnumDef {
            variants,
            inherits: decl.inherits,
        };

        {
            let mut seen: HashMap<u32, &str> = HashMap::new();
            for (variant, value) in def.discriminants() {
                if let Some(first) = seen.insert(value, variant.name()) {
                    return Err(ModelError::DuplicateDiscriminant {
                        owner: decl.name,
                        value,
                        first: first.to_owned(),
                        second: variant.name.clone(),
                    });
                }
            }
        }

        Ok(NodeType {
            name: decl.name,
            has_lifetime: decl.has_lifetime,
            kind: NodeKind::Enum(def),
        })
    }

    /// Register a type name that walkers never descend into.
    pub fn terminal(&mut self, name: &str) -> &mut Self {
        self.terminals.insert(name.to_owned());
        self
    }

    /// Designate the statement type. Sequences of it are bracketed by
    /// `enter_statements`/`exit_statements`.
    pub fn statements(&mut self, name: &str) -> &mut Self {
        self.statement = Some(name.to_owned());
        self
    }

    pub fn statement_type(&self) -> Option<&str> {
        self.statement.as_deref()
    }

    pub fn is_terminal(&self, name: &str) -> bool {
        PRIMITIVES.contains(&name) || self.terminals.contains(name)
    }

    pub fn id(&self, name: &str) -> Option<TypeId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, id: TypeId) -> &NodeType {
        &self.types[id.index()]
    }

    pub fn node(&self, name: &str) -> Option<&NodeType> {
        self.id(name).map(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &NodeType)> + '_ {
        self.types
            .iter()
            .enumerate()
            .map(|(i, ty)| (TypeId(i as u32), ty))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Every field element and variant payload names a catalogued type or
    /// a terminal.
    pub fn check_references(&self) -> Result<(), ModelError> {
        let known = |name: &str| self.index.contains_key(name) || self.is_terminal(name);

        for ty in &self.types {
            let members: Vec<(&str, &str)> = match &ty.kind {
                NodeKind::Struct(def) => def
                    .fields
                    .iter()
                    .map(|field| (field.name(), field.element()))
                    .collect(),
                NodeKind::Enum(def) => def
                    .variants
                    .iter()
                    .map(|variant| (variant.name(), variant.payload()))
                    .collect(),
            };
            for (member, name) in members {
                if !known(name) {
                    return Err(ModelError::UnknownType {
                        owner: ty.name.clone(),
                        member: member.to_owned(),
                        name: name.to_owned(),
                    });
                }
            }
        }

        if let Some(name) = &self.statement {
            if !self.index.contains_key(name) {
                return Err(ModelError::UnknownStatementType { name: name.clone() });
            }
        }
        Ok(())
    }
}
