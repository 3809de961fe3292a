//! Errors raised while building or querying a traversal model.

use thiserror::Error;

use crate::String;

/// Failure to decode a declared field or variant type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeExprError {
    #[error("empty type expression")]
    Empty,

    #[error("unexpected `{found}` at byte {position} in `{text}`")]
    Unexpected {
        text: String,
        found: String,
        position: usize,
    },

    #[error("unexpected end of `{text}`")]
    UnexpectedEnd { text: String },

    /// A generic type that is not one of `Option`, `Vec` or `Box`.
    #[error("unsupported wrapper `{wrapper}`")]
    UnsupportedWrapper { wrapper: String },

    /// A nesting of known wrappers that walkers cannot unwrap.
    #[error("unsupported wrapper chain `{chain}`")]
    UnsupportedChain { chain: String },

    /// References are only accepted for `&str`.
    #[error("unsupported reference to `{target}`")]
    UnsupportedReference { target: String },
}

/// Catalogue or model construction failure.
///
/// All of these are fatal: a model is either built completely or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("type `{name}` is declared twice")]
    DuplicateType { name: String },

    #[error("`{owner}` declares member `{member}` twice")]
    DuplicateMember { owner: String, member: String },

    #[error("`{owner}` uses discriminant {value} for both `{first}` and `{second}`")]
    DuplicateDiscriminant {
        owner: String,
        value: u32,
        first: String,
        second: String,
    },

    #[error("invalid type for `{owner}.{member}`: {source}")]
    InvalidMemberType {
        owner: String,
        member: String,
        #[source]
        source: TypeExprError,
    },

    /// A field or variant refers to a type that is neither catalogued nor terminal.
    #[error("`{owner}.{member}` refers to unknown type `{name}`")]
    UnknownType {
        owner: String,
        member: String,
        name: String,
    },

    #[error("`{ty}` inherits from `{base}`, which is not catalogued")]
    MissingBase { ty: String, base: String },

    #[error("`{ty}` inherits from `{base}`, which is not an enum")]
    BaseNotEnum { ty: String, base: String },

    #[error("inheritance cycle: {}", path.join(" -> "))]
    InheritanceCycle { path: crate::Vec<String> },

    /// Two variants with the same name end up in one flattened variant set.
    #[error("`{ty}` reaches variant `{variant}` through both `{first}` and `{second}`")]
    DuplicateVariant {
        ty: String,
        variant: String,
        first: String,
        second: String,
    },

    #[error("no layout offset for `{ty}.{field}`")]
    MissingOffset { ty: String, field: String },

    #[error("statement type `{name}` is not catalogued")]
    UnknownStatementType { name: String },
}

/// Runtime variant that matches neither the enum's own variants nor any
/// inherited variant set.
///
/// This signals that the catalogue and the tree being walked disagree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("`{name}` is not a catalogued enum")]
    UnknownEnum { name: String },

    #[error("`{ty}` has no own or inherited variant `{variant}`")]
    UnknownVariant { ty: String, variant: String },

    #[error("`{name}` is not a catalogued struct")]
    UnknownStruct { name: String },
}
