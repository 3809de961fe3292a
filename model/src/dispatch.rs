//! Walk plans for structs and variant routing for enums.
//!
//! A [`WalkPlan`] is the exact push/retag/pop sequence a struct walker
//! performs; an [`EnumDispatch`] maps every variant name an enum accepts
//! (own or inherited) to the routine that walks it.

use core::fmt;

use bitflags::bitflags;
use hashbrown::HashMap;

use crate::ancestor::{AncestorModel, TagId};
use crate::catalogue::{Catalogue, TypeId};
use crate::error::DispatchError;
use crate::inherit::Inheritance;
use crate::type_expr::FieldShape;
use crate::{String, ToOwned, Vec};

bitflags! {
    /// How a walker unwraps a field before descending.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StepFlags: u8 {
        /// The whole field may be absent.
        const OPTIONAL = 1 << 0;
        /// Descend into every element.
        const SEQUENCE = 1 << 1;
        /// Elements may be absent; skip those.
        const SKIP_ABSENT = 1 << 2;
        /// Dereference once before descending.
        const BOXED = 1 << 3;
        /// Bracket with `enter_statements`/`exit_statements`.
        const STATEMENTS = 1 << 4;
    }
}

impl StepFlags {
    fn for_shape(shape: FieldShape) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::OPTIONAL, shape.is_optional());
        flags.set(Self::SEQUENCE, shape.is_sequence());
        flags.set(
            Self::SKIP_ABSENT,
            shape == FieldShape::SequenceOfOptional,
        );
        flags.set(Self::BOXED, shape.is_boxed());
        flags
    }
}

/// What happens to the top of the ancestor stack before a field is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackAction {
    /// First descendable field: push the tag.
    Push,
    /// Later fields: overwrite the top tag in place.
    Retag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStep {
    field: String,
    tag: TagId,
    tag_name: String,
    element: TypeId,
    shape: FieldShape,
    action: StackAction,
    flags: StepFlags,
}

impl FieldStep {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn tag(&self) -> TagId {
        self.tag
    }

    pub fn element(&self) -> TypeId {
        self.element
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    pub fn action(&self) -> StackAction {
        self.action
    }

    pub fn flags(&self) -> StepFlags {
        self.flags
    }
}

/// The stack discipline of one struct walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkPlan {
    ty: TypeId,
    name: String,
    steps: Vec<FieldStep>,
}

impl WalkPlan {
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn steps(&self) -> &[FieldStep] {
        &self.steps
    }

    /// 1 if the struct has a descendable field, else 0.
    pub fn pushes(&self) -> usize {
        usize::from(!self.steps.is_empty())
    }

    pub fn pops(&self) -> usize {
        self.pushes()
    }

    pub fn retags(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

impl fmt::Display for WalkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "enter {}", self.name)?;
        for step in &self.steps {
            let action = match step.action {
                StackAction::Push => "push",
                StackAction::Retag => "retag",
            };
            // The first push happens regardless; only descent is conditional.
            let prefix = if step.action == StackAction::Retag
                && step.flags.contains(StepFlags::OPTIONAL)
            {
                "if present "
            } else {
                ""
            };
            writeln!(
                f,
                "  {prefix}{action} {} -> {}{}",
                step.tag_name,
                step.field,
                if step.flags.contains(StepFlags::STATEMENTS) {
                    " [statements]"
                } else {
                    ""
                }
            )?;
        }
        if self.pushes() > 0 {
            writeln!(f, "  pop")?;
        }
        write!(f, "exit {}", self.name)
    }
}

/// Where a walker sends one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Declared by this enum: walk the payload (after unboxing).
    Own { payload: TypeId, boxed: bool },
    /// Payload is terminal; nothing to descend into.
    Terminal,
    /// Inherited: hand the value to the walker of direct base `via`.
    /// `owner` is the enum that declares the variant.
    Inherited { via: TypeId, owner: TypeId },
}

/// Variant routing of one enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDispatch {
    ty: TypeId,
    name: String,
    routes: Vec<(String, Route)>,
}

impl EnumDispatch {
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn route(&self, variant: &str) -> Result<Route, DispatchError> {
        self.routes
            .iter()
            .find(|(name, _)| name == variant)
            .map(|&(_, route)| route)
            .ok_or_else(|| DispatchError::UnknownVariant {
                ty: self.name.clone(),
                variant: variant.to_owned(),
            })
    }

    /// Own variants first, then inherited ones.
    pub fn routes(&self) -> impl Iterator<Item = (&str, Route)> + '_ {
        self.routes.iter().map(|(name, route)| (name.as_str(), *route))
    }
}

/// Plans for every struct and routing for every enum.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    plans: Vec<WalkPlan>,
    enums: Vec<EnumDispatch>,
    by_name: HashMap<String, Entry>,
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Plan(usize),
    Enum(usize),
}

impl DispatchTable {
    pub fn build(
        catalogue: &Catalogue,
        inheritance: &Inheritance,
        ancestors: &AncestorModel,
    ) -> Self {
        let statement = catalogue.statement_type().and_then(|name| catalogue.id(name));
        let mut plans = Vec::new();
        let mut enums = Vec::new();
        let mut by_name = HashMap::new();

        for (id, ty) in catalogue.iter() {
            if let Some(def) = ty.as_struct() {
                let mut steps: Vec<FieldStep> = Vec::new();
                for field in def.fields() {
                    let Some(tag) = ancestors.by_field(id, field.name()) else {
                        continue;
                    };
                    let element = ancestors.tag(tag).map_or(id, |t| t.element());
                    let mut flags = StepFlags::for_shape(field.shape());
                    if statement == Some(element) && field.shape().is_sequence() {
                        flags |= StepFlags::STATEMENTS;
                    }
                    steps.push(FieldStep {
                        field: field.name().to_owned(),
                        tag,
                        tag_name: ancestors.name(tag).unwrap_or_default().to_owned(),
                        element,
                        shape: field.shape(),
                        action: if steps.is_empty() {
                            StackAction::Push
                        } else {
                            StackAction::Retag
                        },
                        flags,
                    });
                }
                by_name.insert(ty.name().to_owned(), Entry::Plan(plans.len()));
                plans.push(WalkPlan {
                    ty: id,
                    name: ty.name().to_owned(),
                    steps,
                });
            } else if let Some(def) = ty.as_enum() {
                let mut routes = Vec::new();
                for variant in def.variants() {
                    let route = match catalogue.id(variant.payload()) {
                        Some(payload) => Route::Own {
                            payload,
                            boxed: variant.is_boxed(),
                        },
                        None => Route::Terminal,
                    };
                    routes.push((variant.name().to_owned(), route));
                }
                for flat in inheritance.flattened(id) {
                    if let Some(via) = flat.via() {
                        routes.push((
                            flat.name().to_owned(),
                            Route::Inherited {
                                via,
                                owner: flat.owner(),
                            },
                        ));
                    }
                }
                by_name.insert(ty.name().to_owned(), Entry::Enum(enums.len()));
                enums.push(EnumDispatch {
                    ty: id,
                    name: ty.name().to_owned(),
                    routes,
                });
            }
        }

        tracing::debug!(
            plans = plans.len(),
            enums = enums.len(),
            "built dispatch table"
        );
        Self {
            plans,
            enums,
            by_name,
        }
    }

    pub fn plan(&self, name: &str) -> Option<&WalkPlan> {
        match self.by_name.get(name)? {
            Entry::Plan(i) => self.plans.get(*i),
            Entry::Enum(_) => None,
        }
    }

    pub fn dispatch(&self, name: &str) -> Option<&EnumDispatch> {
        match self.by_name.get(name)? {
            Entry::Enum(i) => self.enums.get(*i),
            Entry::Plan(_) => None,
        }
    }

    /// Like [`plan`](Self::plan), as an error for unknown names.
    pub fn plan_for(&self, name: &str) -> Result<&WalkPlan, DispatchError> {
        self.plan(name).ok_or_else(|| DispatchError::UnknownStruct {
            name: name.to_owned(),
        })
    }

    /// Route `variant` of enum `ty`.
    pub fn route(&self, ty: &str, variant: &str) -> Result<Route, DispatchError> {
        self.dispatch(ty)
            .ok_or_else(|| DispatchError::UnknownEnum {
                name: ty.to_owned(),
            })?
            .route(variant)
    }

    pub fn plans(&self) -> &[WalkPlan] {
        &self.plans
    }

    pub fn enums(&self) -> &[EnumDispatch] {
        &self.enums
    }
}
