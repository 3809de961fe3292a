//! Resolution of enum variant inheritance.
//!
//! An enum that inherits `B` accepts every variant of `B` (and, transitively,
//! of everything `B` inherits). Resolution computes, for each enum, the
//! transitive set of bases and the flattened variant set: own variants
//! first, then each direct base's flattened set in declaration order.
//! A base variant with the same name as an own variant is not inherited.

use crate::catalogue::{Catalogue, TypeId};
use crate::error::ModelError;
use crate::{String, ToOwned, Vec, vec};

/// One entry of a flattened variant set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatVariant {
    name: String,
    owner: TypeId,
    via: Option<TypeId>,
}

impl FlatVariant {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enum that declares this variant.
    pub fn owner(&self) -> TypeId {
        self.owner
    }

    /// The direct base this variant was inherited through, or `None` for an
    /// own variant.
    pub fn via(&self) -> Option<TypeId> {
        self.via
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

#[derive(Debug, Clone)]
pub struct Inheritance {
    direct: Vec<Vec<TypeId>>,
    closure: Vec<Vec<TypeId>>,
    flattened: Vec<Vec<FlatVariant>>,
}

impl Inheritance {
    pub fn resolve(catalogue: &Catalogue) -> Result<Self, ModelError> {
        let mut direct = vec![Vec::new(); catalogue.len()];
        for (id, ty) in catalogue.iter() {
            let Some(def) = ty.as_enum() else {
                continue;
            };
            for base in def.inherits() {
                let base_id = catalogue.id(base).ok_or_else(|| ModelError::MissingBase {
                    ty: ty.name().to_owned(),
                    base: base.clone(),
                })?;
                if !catalogue.get(base_id).is_enum() {
                    return Err(ModelError::BaseNotEnum {
                        ty: ty.name().to_owned(),
                        base: base.clone(),
                    });
                }
                direct[id.index()].push(base_id);
            }
        }

        let mut marks = vec![Mark::Unvisited; catalogue.len()];
        let mut path = Vec::new();
        for (id, _) in catalogue.iter() {
            check_cycles(catalogue, &direct, id, &mut marks, &mut path)?;
        }

        let closure = catalogue
            .iter()
            .map(|(id, _)| {
                let mut bases = Vec::new();
                collect_bases(&direct, id, &mut bases);
                bases
            })
            .collect();

        let mut memo = vec![None; catalogue.len()];
        for (id, _) in catalogue.iter() {
            flatten(catalogue, &direct, id, &mut memo)?;
        }
        let flattened: Vec<Vec<FlatVariant>> =
            memo.into_iter().map(Option::unwrap_or_default).collect();

        tracing::debug!(
            inheriting = direct.iter().filter(|bases| !bases.is_empty()).count(),
            "resolved enum inheritance"
        );
        Ok(Self {
            direct,
            closure,
            flattened,
        })
    }

    /// Bases listed by `ty` itself.
    pub fn direct_bases(&self, ty: TypeId) -> &[TypeId] {
        &self.direct[ty.index()]
    }

    /// Every enum `ty` inherits from, directly or transitively.
    pub fn bases(&self, ty: TypeId) -> &[TypeId] {
        &self.closure[ty.index()]
    }

    pub fn inherits(&self, ty: TypeId, base: TypeId) -> bool {
        self.bases(ty).contains(&base)
    }

    /// The flattened variant set of an enum. Empty for structs.
    pub fn flattened(&self, ty: TypeId) -> &[FlatVariant] {
        &self.flattened[ty.index()]
    }
}

fn check_cycles(
    catalogue: &Catalogue,
    direct: &[Vec<TypeId>],
    id: TypeId,
    marks: &mut [Mark],
    path: &mut Vec<TypeId>,
) -> Result<(), ModelError> {
    match marks[id.index()] {
        Mark::Done => return Ok(()),
        Mark::Active => {
            let start = path.iter().position(|&p| p == id).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..]
                .iter()
                .map(|&p| catalogue.get(p).name().to_owned())
                .collect();
            cycle.push(catalogue.get(id).name().to_owned());
            return Err(ModelError::InheritanceCycle { path: cycle });
        }
        Mark::Unvisited => {}
    }

    marks[id.index()] = Mark::Active;
    path.push(id);
    for &base in &direct[id.index()] {
        check_cycles(catalogue, direct, base, marks, path)?;
    }
    path.pop();
    marks[id.index()] = Mark::Done;
    Ok(())
}

fn collect_bases(direct: &[Vec<TypeId>], id: TypeId, out: &mut Vec<TypeId>) {
    for &base in &direct[id.index()] {
        if !out.contains(&base) {
            out.push(base);
            collect_bases(direct, base, out);
        }
    }
}

fn flatten(
    catalogue: &Catalogue,
    direct: &[Vec<TypeId>],
    id: TypeId,
    memo: &mut [Option<Vec<FlatVariant>>],
) -> Result<(), ModelError> {
    if memo[id.index()].is_some() {
        return Ok(());
    }
    let ty = catalogue.get(id);
    let Some(def) = ty.as_enum() else {
        memo[id.index()] = Some(Vec::new());
        return Ok(());
    };

    let mut set: Vec<FlatVariant> = def
        .variants()
        .iter()
        .map(|variant| FlatVariant {
            name: variant.name().to_owned(),
            owner: id,
            via: None,
        })
        .collect();

    for &base in &direct[id.index()] {
        flatten(catalogue, direct, base, memo)?;
        let inherited = memo[base.index()].as_deref().unwrap_or_default();
        for entry in inherited {
            match set.iter().find(|existing| existing.name == entry.name) {
                // Listed explicitly, so the own variant wins.
                Some(existing) if existing.via.is_none() => {}
                // Reached again through another path.
                Some(existing) if existing.owner == entry.owner => {}
                Some(existing) => {
                    return Err(ModelError::DuplicateVariant {
                        ty: ty.name().to_owned(),
                        variant: entry.name.clone(),
                        first: catalogue.get(existing.owner).name().to_owned(),
                        second: catalogue.get(entry.owner).name().to_owned(),
                    });
                }
                None => set.push(FlatVariant {
                    name: entry.name.clone(),
                    owner: entry.owner,
                    via: Some(base),
                }),
            }
        }
    }

    memo[id.index()] = Some(set);
    Ok(())
}
