//! Conflict-resolution policies.
//!
//! The model consults a [`ConflictResolver`] before committing a move or a
//! constraint addition. Both checks are two-phase: the model builds a
//! proposal describing the change, hands the resolver a read-only view of
//! the model together with the proposal, and only mutates if the resolver
//! accepts. A declined proposal leaves no trace.
//!
//! Which constraints count as invalidated by a change is a policy decision.
//! [`ConfirmEveryMove`] is the conservative default: it asks the operator
//! about every move without computing any invalidation. [`RefinementResolver`]
//! implements a stricter rule based on target-set refinement.

use std::collections::BTreeSet;

use crate::concept::ConceptId;
use crate::constraint::{ConstraintId, ConstraintTypeId};
use crate::model::Model;

/// A tentative re-parenting of `concept` from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveProposal {
    /// The concept being moved.
    pub concept: ConceptId,
    /// Its current parent.
    pub from: ConceptId,
    /// The requested parent.
    pub to: ConceptId,
}

impl MoveProposal {
    /// Returns a view of `model` as it would look after the move.
    #[must_use]
    pub fn view<'m>(&self, model: &'m Model) -> TreeView<'m> {
        TreeView {
            model,
            moved: Some((self.concept, self.to)),
        }
    }
}

/// A tentative constraint addition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintProposal {
    /// The concept the constraint would be attached to.
    pub source: ConceptId,
    /// The constraint's type.
    pub constraint_type: ConstraintTypeId,
    /// The validated target values.
    pub targets: BTreeSet<ConceptId>,
    /// The existing constraint of the same type the addition would replace.
    pub replaces: Option<ConstraintId>,
}

/// A read-only view of a model's tree, optionally with one concept
/// re-parented.
#[derive(Debug, Clone, Copy)]
pub struct TreeView<'m> {
    model: &'m Model,
    moved: Option<(ConceptId, ConceptId)>,
}

impl<'m> TreeView<'m> {
    /// A view of the model as it is.
    #[must_use]
    pub fn current(model: &'m Model) -> Self {
        Self { model, moved: None }
    }

    /// The parent of `id` in this view.
    #[must_use]
    pub fn parent(&self, id: ConceptId) -> Option<ConceptId> {
        match self.moved {
            Some((concept, parent)) if concept == id => Some(parent),
            _ => self.model.concepts().parent(id),
        }
    }

    /// Returns true if `id` is `ancestor` or lies beneath it in this view.
    #[must_use]
    pub fn is_descendant_or_equal(&self, id: ConceptId, ancestor: ConceptId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// The nearest constraint of `ty` at or above `concept`.
    #[must_use]
    pub fn closest_constraint(
        &self,
        concept: ConceptId,
        ty: ConstraintTypeId,
    ) -> Option<ConstraintId> {
        let mut current = Some(concept);
        while let Some(c) = current {
            if let Some(k) = self.model.own_constraint(c, ty) {
                return Some(k);
            }
            current = self.parent(c);
        }
        None
    }

    /// The nearest constraint of `ty` strictly above `concept`.
    #[must_use]
    pub fn inherited_constraint(
        &self,
        concept: ConceptId,
        ty: ConstraintTypeId,
    ) -> Option<ConstraintId> {
        self.parent(concept)
            .and_then(|p| self.closest_constraint(p, ty))
    }

    /// Returns true if every member of `narrow` lies beneath some member of
    /// `broad`.
    #[must_use]
    pub fn refines(&self, narrow: &BTreeSet<ConceptId>, broad: &BTreeSet<ConceptId>) -> bool {
        narrow
            .iter()
            .all(|&n| broad.iter().any(|&b| self.is_descendant_or_equal(n, b)))
    }

    /// Returns true if two members of `targets` are in a descendant
    /// relationship.
    #[must_use]
    pub fn is_redundant(&self, targets: &BTreeSet<ConceptId>) -> bool {
        targets.iter().any(|&a| {
            targets
                .iter()
                .any(|&b| a != b && self.is_descendant_or_equal(b, a))
        })
    }
}

/// Decides whether a proposed move or constraint addition may be committed.
pub trait ConflictResolver {
    /// Called with the move not yet applied. Returning `false` cancels it.
    fn check_moved_concept(&mut self, model: &Model, proposal: &MoveProposal) -> bool;

    /// Called with the constraint not yet attached. Returning `false`
    /// cancels the addition.
    fn check_constraint_addition(&mut self, model: &Model, proposal: &ConstraintProposal)
        -> bool;
}

/// Asks an operator (or an automated rule) to approve a change.
pub trait Confirmations {
    /// Approve a move that invalidates the listed constraints.
    fn confirm_concept_move(&mut self, invalidated: &[ConstraintId]) -> bool;

    /// Approve a constraint addition that conflicts with the listed
    /// constraints.
    fn confirm_constraint_addition(&mut self, conflicts: &[ConstraintId]) -> bool;
}

impl<C: Confirmations + ?Sized> Confirmations for Box<C> {
    fn confirm_concept_move(&mut self, invalidated: &[ConstraintId]) -> bool {
        (**self).confirm_concept_move(invalidated)
    }

    fn confirm_constraint_addition(&mut self, conflicts: &[ConstraintId]) -> bool {
        (**self).confirm_constraint_addition(conflicts)
    }
}

/// Approves everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirmations for AlwaysConfirm {
    fn confirm_concept_move(&mut self, _invalidated: &[ConstraintId]) -> bool {
        true
    }

    fn confirm_constraint_addition(&mut self, _conflicts: &[ConstraintId]) -> bool {
        true
    }
}

/// Declines everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirmations for NeverConfirm {
    fn confirm_concept_move(&mut self, _invalidated: &[ConstraintId]) -> bool {
        false
    }

    fn confirm_constraint_addition(&mut self, _conflicts: &[ConstraintId]) -> bool {
        false
    }
}

/// Accepts every proposal without consulting anyone. Used while loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ConflictResolver for AcceptAll {
    fn check_moved_concept(&mut self, _model: &Model, _proposal: &MoveProposal) -> bool {
        true
    }

    fn check_constraint_addition(
        &mut self,
        _model: &Model,
        _proposal: &ConstraintProposal,
    ) -> bool {
        true
    }
}

/// Default policy: every move requires confirmation, with an empty
/// invalidated list; constraint additions are accepted as they are.
#[derive(Debug, Clone, Default)]
pub struct ConfirmEveryMove<C> {
    confirmations: C,
}

impl<C: Confirmations> ConfirmEveryMove<C> {
    /// Wraps a confirmations collaborator.
    pub fn new(confirmations: C) -> Self {
        Self { confirmations }
    }
}

impl<C: Confirmations> ConflictResolver for ConfirmEveryMove<C> {
    fn check_moved_concept(&mut self, _model: &Model, _proposal: &MoveProposal) -> bool {
        self.confirmations.confirm_concept_move(&[])
    }

    fn check_constraint_addition(
        &mut self,
        _model: &Model,
        _proposal: &ConstraintProposal,
    ) -> bool {
        true
    }
}

/// Refinement-based policy.
///
/// A non-root constraint is consistent when its targets refine the targets
/// of the nearest inherited constraint of the same type and contain no
/// redundant pair. A move invalidates the constraints that are consistent
/// now but would not be afterwards. An addition conflicts with the inherited
/// constraint it fails to refine and with the descendant constraints that
/// fail to refine it. Confirmation is only requested when something is
/// invalidated or in conflict.
#[derive(Debug, Clone, Default)]
pub struct RefinementResolver<C> {
    confirmations: C,
}

impl<C: Confirmations> RefinementResolver<C> {
    /// Wraps a confirmations collaborator.
    pub fn new(confirmations: C) -> Self {
        Self { confirmations }
    }

    /// Constraints the move would invalidate.
    #[must_use]
    pub fn invalidated_by_move(model: &Model, proposal: &MoveProposal) -> Vec<ConstraintId> {
        let before = TreeView::current(model);
        let after = proposal.view(model);
        model
            .constraints()
            .filter(|(_, k)| !model.is_root(k.source()))
            .filter(|(_, k)| {
                is_consistent(model, &before, k.source(), k.constraint_type(), k.targets())
                    && !is_consistent(model, &after, k.source(), k.constraint_type(), k.targets())
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Existing constraints the addition would conflict with.
    #[must_use]
    pub fn conflicts_of_addition(model: &Model, proposal: &ConstraintProposal) -> Vec<ConstraintId> {
        let view = TreeView::current(model);
        let mut conflicts = Vec::new();

        if let Some(inherited) = view.inherited_constraint(proposal.source, proposal.constraint_type)
        {
            if let Ok(k) = model.constraint(inherited) {
                if !view.refines(&proposal.targets, k.targets()) {
                    conflicts.push(inherited);
                }
            }
        }

        for (id, k) in model.constraints() {
            if k.constraint_type() == proposal.constraint_type
                && k.source() != proposal.source
                && view.is_descendant_or_equal(k.source(), proposal.source)
                && !view.refines(k.targets(), &proposal.targets)
            {
                conflicts.push(id);
            }
        }
        conflicts
    }
}

fn is_consistent(
    model: &Model,
    view: &TreeView<'_>,
    source: ConceptId,
    ty: ConstraintTypeId,
    targets: &BTreeSet<ConceptId>,
) -> bool {
    if view.is_redundant(targets) {
        return false;
    }
    match view
        .inherited_constraint(source, ty)
        .and_then(|id| model.constraint(id).ok())
    {
        Some(inherited) => view.refines(targets, inherited.targets()),
        None => true,
    }
}

impl<C: Confirmations> ConflictResolver for RefinementResolver<C> {
    fn check_moved_concept(&mut self, model: &Model, proposal: &MoveProposal) -> bool {
        let invalidated = Self::invalidated_by_move(model, proposal);
        invalidated.is_empty() || self.confirmations.confirm_concept_move(&invalidated)
    }

    fn check_constraint_addition(
        &mut self,
        model: &Model,
        proposal: &ConstraintProposal,
    ) -> bool {
        let conflicts = Self::conflicts_of_addition(model, proposal);
        conflicts.is_empty() || self.confirmations.confirm_constraint_addition(&conflicts)
    }
}
