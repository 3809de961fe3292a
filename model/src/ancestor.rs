//! Ancestor tags.
//!
//! A tag means "positioned at field `F` of a live `T`". There is one tag per
//! (struct, field) pair whose element is a catalogued type, numbered
//! sequentially in catalogue order after the root tag [`TagId::NONE`].
//! Fields of terminal type never get a tag: walkers don't descend into them.

use core::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalogue::{Catalogue, TypeId};
use crate::error::ModelError;
use crate::inherit::Inheritance;
use crate::{String, ToOwned, Vec, format};

/// Numeric ancestor tag. `0` is the empty/root tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct TagId(u32);

impl TagId {
    pub const NONE: TagId = TagId(0);

    pub fn new(value: u32) -> Self {
        TagId(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Smallest integer able to hold every tag discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiscriminantRepr {
    U8,
    U16,
    U32,
}

impl DiscriminantRepr {
    /// Pick the representation for `count` distinct tags (root included).
    pub fn for_count(count: usize) -> Self {
        if count <= 1 << 8 {
            Self::U8
        } else if count <= 1 << 16 {
            Self::U16
        } else {
            Self::U32
        }
    }

    pub fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

impl fmt::Display for DiscriminantRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
        })
    }
}

/// A (struct, field) position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorTag {
    id: TagId,
    name: String,
    accessor: String,
    parent: TypeId,
    field: String,
    element: TypeId,
    /// `element` followed by every enum it inherits from.
    via: SmallVec<[TypeId; 4]>,
}

impl AncestorTag {
    pub fn id(&self) -> TagId {
        self.id
    }

    /// Tag name, e.g. `BinaryExpressionLeft`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accessor type name, e.g. `BinaryExpressionWithoutLeft`.
    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    /// The struct owning the field.
    pub fn parent(&self) -> TypeId {
        self.parent
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// The field's element type.
    pub fn element(&self) -> TypeId {
        self.element
    }
}

#[derive(Debug, Clone)]
pub struct AncestorModel {
    /// Index `i` holds tag `i + 1`.
    tags: Vec<AncestorTag>,
    by_field: HashMap<(TypeId, String), TagId>,
    repr: DiscriminantRepr,
}

impl AncestorModel {
    pub fn build(catalogue: &Catalogue, inheritance: &Inheritance) -> Result<Self, ModelError> {
        let mut tags = Vec::new();
        let mut by_field = HashMap::new();

        for (parent, ty) in catalogue.iter() {
            let Some(def) = ty.as_struct() else {
                continue;
            };
            for field in def.fields() {
                let Some(element) = catalogue.id(field.element()) else {
                    if catalogue.is_terminal(field.element()) {
                        continue;
                    }
                    return Err(ModelError::UnknownType {
                        owner: ty.name().to_owned(),
                        member: field.name().to_owned(),
                        name: field.element().to_owned(),
                    });
                };

                let id = TagId(tags.len() as u32 + 1);
                let camel = camel_case(field.name());
                let mut via = SmallVec::new();
                via.push(element);
                via.extend(inheritance.bases(element).iter().copied());

                by_field.insert((parent, field.name().to_owned()), id);
                tags.push(AncestorTag {
                    id,
                    name: format!("{}{}", ty.name(), camel),
                    accessor: format!("{}Without{}", ty.name(), camel),
                    parent,
                    field: field.name().to_owned(),
                    element,
                    via,
                });
            }
        }

        let repr = DiscriminantRepr::for_count(tags.len() + 1);
        tracing::debug!(tags = tags.len() + 1, %repr, "built ancestor tags");
        Ok(Self {
            tags,
            by_field,
            repr,
        })
    }

    /// Number of tags, the root tag included.
    pub fn tag_count(&self) -> usize {
        self.tags.len() + 1
    }

    pub fn repr(&self) -> DiscriminantRepr {
        self.repr
    }

    /// The tag with this id, or `None` for the root tag and unknown ids.
    pub fn tag(&self, id: TagId) -> Option<&AncestorTag> {
        id.index().checked_sub(1).and_then(|i| self.tags.get(i))
    }

    /// Every tag except the root, in id order.
    pub fn tags(&self) -> &[AncestorTag] {
        &self.tags
    }

    pub fn name(&self, id: TagId) -> Option<&str> {
        if id.is_none() {
            return Some("None");
        }
        self.tag(id).map(AncestorTag::name)
    }

    pub fn by_field(&self, parent: TypeId, field: &str) -> Option<TagId> {
        self.by_field.get(&(parent, field.to_owned())).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<TagId> {
        if name == "None" {
            return Some(TagId::NONE);
        }
        self.tags.iter().find(|tag| tag.name == name).map(|tag| tag.id)
    }

    /// Tags owned by `parent`, in field order.
    pub fn tags_of(&self, parent: TypeId) -> impl Iterator<Item = &AncestorTag> + '_ {
        self.tags.iter().filter(move |tag| tag.parent == parent)
    }

    /// The tag belongs to a field of struct `ty`.
    pub fn is_struct(&self, id: TagId, ty: TypeId) -> bool {
        self.tag(id).is_some_and(|tag| tag.parent == ty)
    }

    /// The tag's field holds enum `ty`, or an enum that transitively
    /// inherits `ty`.
    pub fn is_via(&self, id: TagId, ty: TypeId) -> bool {
        self.tag(id).is_some_and(|tag| tag.via.contains(&ty))
    }
}

/// `super_class` -> `SuperClass`.
pub fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = true;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
