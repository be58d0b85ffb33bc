//! Constraint types and constraints.
//!
//! A [`ConstraintType`] binds a focus hierarchy to a target hierarchy through
//! a source link and a target link whose values are the two hierarchy roots.
//! A [`Constraint`] instantiates a type for one source concept: "this
//! category, or any descendant without a closer rule of its own, may only
//! relate through the target property to categories within these targets".
//!
//! Constraints are only ever built by [`ConstraintType::create_constraint`]
//! and [`ConstraintType::create_root_constraint`], which check every
//! construction invariant up front.

use std::collections::BTreeSet;

use crate::concept::{ConceptId, Concepts};
use crate::error::{LinkSide, ModelError};
use crate::hierarchy::HierarchyId;
use crate::identifier::Identifier;
use crate::link::Link;

/// Handle to a constraint type of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintTypeId(pub(crate) usize);

impl ConstraintTypeId {
    /// Returns the position of the type in registration order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a constraint in a model's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    /// Returns the raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A reusable constraint schema. Immutable once registered.
#[derive(Debug, Clone)]
pub struct ConstraintType {
    pub(crate) id: ConstraintTypeId,
    pub(crate) focus: Identifier,
    pub(crate) hierarchy: HierarchyId,
    pub(crate) target_hierarchy: HierarchyId,
    pub(crate) source_link: Link,
    pub(crate) target_link: Link,
}

impl ConstraintType {
    /// This type's handle.
    #[must_use]
    pub fn id(&self) -> ConstraintTypeId {
        self.id
    }

    /// The schema-level focus concept that definition classes specialise.
    #[must_use]
    pub fn focus(&self) -> &Identifier {
        &self.focus
    }

    /// The hierarchy whose concepts carry constraints of this type.
    #[must_use]
    pub fn hierarchy(&self) -> HierarchyId {
        self.hierarchy
    }

    /// The hierarchy target values are drawn from.
    #[must_use]
    pub fn target_hierarchy(&self) -> HierarchyId {
        self.target_hierarchy
    }

    /// Source-side anchor: source property plus the focus hierarchy root.
    #[must_use]
    pub fn source_link(&self) -> &Link {
        &self.source_link
    }

    /// Target-side anchor: target property plus the target hierarchy root.
    #[must_use]
    pub fn target_link(&self) -> &Link {
        &self.target_link
    }

    /// Builds a constraint of this type after checking scope and
    /// non-redundancy.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownConcept`] if a handle is not live.
    /// - [`ModelError::OutOfScopeValue`] if the source is not beneath the
    ///   source anchor or a target is not beneath the target anchor.
    /// - [`ModelError::EmptyTargetValues`] if `targets` is empty.
    /// - [`ModelError::RedundantTargetValues`] if one target descends from
    ///   another.
    pub fn create_constraint(
        &self,
        concepts: &Concepts,
        source: ConceptId,
        targets: impl IntoIterator<Item = ConceptId>,
    ) -> Result<Constraint, ModelError> {
        self.check_scope(concepts, &self.source_link, source, LinkSide::Source)?;

        let targets: BTreeSet<ConceptId> = targets.into_iter().collect();
        if targets.is_empty() {
            return Err(ModelError::EmptyTargetValues {
                focus: self.focus.label().to_owned(),
            });
        }
        for &target in &targets {
            self.check_scope(concepts, &self.target_link, target, LinkSide::Target)?;
        }
        for &a in &targets {
            for &b in &targets {
                if a != b && concepts.is_descendant_or_equal(b, a) {
                    return Err(ModelError::RedundantTargetValues {
                        ancestor: label_of(concepts, a),
                        descendant: label_of(concepts, b),
                    });
                }
            }
        }

        Ok(Constraint {
            constraint_type: self.id,
            source,
            targets,
        })
    }

    /// Builds the default constraint carried by the focus hierarchy root:
    /// the root may relate to anything in the target hierarchy.
    #[must_use]
    pub fn create_root_constraint(&self) -> Constraint {
        Constraint {
            constraint_type: self.id,
            source: self.source_link.value(),
            targets: BTreeSet::from([self.target_link.value()]),
        }
    }

    fn check_scope(
        &self,
        concepts: &Concepts,
        anchor: &Link,
        value: ConceptId,
        side: LinkSide,
    ) -> Result<(), ModelError> {
        if concepts.get(value).is_none() {
            return Err(ModelError::UnknownConcept(value.index()));
        }
        if anchor.derive(value).is_sub_link_of(anchor, concepts) {
            Ok(())
        } else {
            Err(ModelError::OutOfScopeValue {
                focus: self.focus.label().to_owned(),
                side,
                value: label_of(concepts, value),
                anchor: label_of(concepts, anchor.value()),
            })
        }
    }
}

/// One instantiated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub(crate) constraint_type: ConstraintTypeId,
    pub(crate) source: ConceptId,
    pub(crate) targets: BTreeSet<ConceptId>,
}

impl Constraint {
    /// The type this constraint instantiates.
    #[must_use]
    pub fn constraint_type(&self) -> ConstraintTypeId {
        self.constraint_type
    }

    /// The concept the rule is attached to.
    #[must_use]
    pub fn source(&self) -> ConceptId {
        self.source
    }

    /// The permitted target categories.
    #[must_use]
    pub fn targets(&self) -> &BTreeSet<ConceptId> {
        &self.targets
    }

    /// Returns true if every target of `self` lies beneath some target of
    /// `broader`, i.e. `self` narrows `broader`.
    #[must_use]
    pub fn refines(&self, broader: &Constraint, concepts: &Concepts) -> bool {
        self.targets.iter().all(|&t| {
            broader
                .targets
                .iter()
                .any(|&b| concepts.is_descendant_or_equal(t, b))
        })
    }
}

fn label_of(concepts: &Concepts, id: ConceptId) -> String {
    concepts
        .get(id)
        .map_or_else(|| format!("#{}", id.index()), |c| c.identity().label().to_owned())
}
