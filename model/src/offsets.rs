//! Byte offsets of struct fields.
//!
//! Sibling access from an ancestor tag is `base address + offset`, so every
//! field of every struct that owns a tag needs an entry, terminal fields
//! included.

use alloc::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ancestor::AncestorModel;
use crate::catalogue::Catalogue;
use crate::error::ModelError;
use crate::{String, ToOwned, Vec};

/// Answers "at which byte offset does `field` live inside `ty`?".
///
/// Implemented for any `Fn(&str, &str) -> Option<usize>`.
pub trait LayoutProvider {
    fn offset_of(&self, ty: &str, field: &str) -> Option<usize>;
}

impl<F> LayoutProvider for F
where
    F: Fn(&str, &str) -> Option<usize>,
{
    fn offset_of(&self, ty: &str, field: &str) -> Option<usize> {
        self(ty, field)
    }
}

/// (struct, field) to byte offset. Computed once, immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOffsetTable {
    offsets: BTreeMap<String, BTreeMap<String, usize>>,
}

impl FieldOffsetTable {
    pub fn build<L>(
        catalogue: &Catalogue,
        ancestors: &AncestorModel,
        layout: &L,
    ) -> Result<Self, ModelError>
    where
        L: LayoutProvider + ?Sized,
    {
        let mut offsets = BTreeMap::new();
        for (id, ty) in catalogue.iter() {
            if ancestors.tags_of(id).next().is_none() {
                continue;
            }
            let Some(def) = ty.as_struct() else {
                continue;
            };

            let mut fields = BTreeMap::new();
            for field in def.fields() {
                let offset = layout.offset_of(ty.name(), field.name()).ok_or_else(|| {
                    ModelError::MissingOffset {
                        ty: ty.name().to_owned(),
                        field: field.name().to_owned(),
                    }
                })?;
                fields.insert(field.name().to_owned(), offset);
            }
            offsets.insert(ty.name().to_owned(), fields);
        }

        tracing::debug!(structs = offsets.len(), "built field offset table");
        Ok(Self { offsets })
    }

    pub fn get(&self, ty: &str, field: &str) -> Option<usize> {
        self.offsets.get(ty)?.get(field).copied()
    }

    /// Offsets of one struct's fields, by field name.
    pub fn fields(&self, ty: &str) -> Option<&BTreeMap<String, usize>> {
        self.offsets.get(ty)
    }

    /// Number of structs in the table.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, usize)> + '_ {
        self.offsets.iter().flat_map(|(ty, fields)| {
            fields
                .iter()
                .map(move |(field, &offset)| (ty.as_str(), field.as_str(), offset))
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

impl LayoutProvider for FieldOffsetTable {
    fn offset_of(&self, ty: &str, field: &str) -> Option<usize> {
        self.get(ty, field)
    }
}
