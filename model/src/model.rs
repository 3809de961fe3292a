use crate::ancestor::{AncestorModel, TagId};
use crate::catalogue::Catalogue;
use crate::dispatch::DispatchTable;
use crate::error::ModelError;
use crate::inherit::Inheritance;
use crate::offsets::{FieldOffsetTable, LayoutProvider};

/// Everything derived from a [`Catalogue`], built once and immutable.
#[derive(Debug, Clone)]
pub struct Model {
    catalogue: Catalogue,
    inheritance: Inheritance,
    ancestors: AncestorModel,
    offsets: FieldOffsetTable,
    dispatch: DispatchTable,
}

impl Model {
    /// Validate the catalogue and derive tags, offsets and walk plans.
    ///
    /// Fails on the first inconsistency; there is no partial model.
    pub fn build<L>(catalogue: Catalogue, layout: &L) -> Result<Self, ModelError>
    where
        L: LayoutProvider + ?Sized,
    {
        catalogue.check_references()?;
        let inheritance = Inheritance::resolve(&catalogue)?;
        let ancestors = AncestorModel::build(&catalogue, &inheritance)?;
        let offsets = FieldOffsetTable::build(&catalogue, &ancestors, layout)?;
        let dispatch = DispatchTable::build(&catalogue, &inheritance, &ancestors);

        tracing::debug!(
            types = catalogue.len(),
            tags = ancestors.tag_count(),
            "built traversal model"
        );
        Ok(Self {
            catalogue,
            inheritance,
            ancestors,
            offsets,
            dispatch,
        })
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn inheritance(&self) -> &Inheritance {
        &self.inheritance
    }

    pub fn ancestors(&self) -> &AncestorModel {
        &self.ancestors
    }

    pub fn offsets(&self) -> &FieldOffsetTable {
        &self.offsets
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    /// Tag of `ty.field`, if that field is descendable.
    pub fn tag(&self, ty: &str, field: &str) -> Option<TagId> {
        self.ancestors.by_field(self.catalogue.id(ty)?, field)
    }

    /// Byte offset of sibling `field` relative to the struct that owns `tag`.
    pub fn sibling_offset(&self, tag: TagId, field: &str) -> Option<usize> {
        let tag = self.ancestors.tag(tag)?;
        if tag.field() == field {
            return None;
        }
        let parent = self.catalogue.get(tag.parent()).name();
        self.offsets.get(parent, field)
    }

    /// [`AncestorModel::is_struct`] by type name.
    pub fn is_struct(&self, tag: TagId, ty: &str) -> bool {
        self.catalogue
            .id(ty)
            .is_some_and(|ty| self.ancestors.is_struct(tag, ty))
    }

    /// [`AncestorModel::is_via`] by type name.
    pub fn is_via(&self, tag: TagId, ty: &str) -> bool {
        self.catalogue
            .id(ty)
            .is_some_and(|ty| self.ancestors.is_via(tag, ty))
    }
}
