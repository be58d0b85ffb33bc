//! The model: hierarchies, constraint types, the concept and constraint
//! arenas, the injected conflict policy, and change notification.
//!
//! All edit operations validate first and mutate second. An operation that
//! returns an error, or `Ok(false)`, has not changed anything and has not
//! notified any listener.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::concept::{Concept, ConceptId, Concepts};
use crate::constraint::{Constraint, ConstraintId, ConstraintType, ConstraintTypeId};
use crate::error::ModelError;
use crate::events::{dispatch, ModelEvent, ModelListener};
use crate::hierarchy::{Hierarchy, HierarchyId};
use crate::identifier::{Identifier, Namespaces};
use crate::link::Link;
use crate::policy::{AcceptAll, ConflictResolver, ConstraintProposal, MoveProposal};

/// An editable taxonomy-and-constraint model.
pub struct Model {
    namespaces: Namespaces,
    hierarchies: Vec<Hierarchy>,
    constraint_types: Vec<ConstraintType>,
    concepts: Concepts,
    constraints: Vec<Option<Constraint>>,
    resolver: Box<dyn ConflictResolver>,
    listeners: Vec<Box<dyn ModelListener>>,
    dirty: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("namespaces", &self.namespaces)
            .field("hierarchies", &self.hierarchies.len())
            .field("constraint_types", &self.constraint_types.len())
            .field("concepts", &self.concepts.len())
            .field("listeners", &self.listeners.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Model {
    /// Creates an empty model with no hierarchies.
    pub fn new(namespaces: Namespaces, resolver: Box<dyn ConflictResolver>) -> Self {
        Self {
            namespaces,
            hierarchies: Vec::new(),
            constraint_types: Vec::new(),
            concepts: Concepts::default(),
            constraints: Vec::new(),
            resolver,
            listeners: Vec::new(),
            dirty: false,
        }
    }

    /// Creates a model with the same namespaces, hierarchy roots and
    /// constraint types as `self` but no content, governed by `resolver`.
    ///
    /// # Errors
    ///
    /// Propagates registration errors; these cannot occur for a schema that
    /// was registered successfully on `self`.
    pub fn empty_like(&self, resolver: Box<dyn ConflictResolver>) -> Result<Model, ModelError> {
        let mut fresh = Model::new(self.namespaces.clone(), resolver);
        let mut mapping = Vec::with_capacity(self.hierarchies.len());
        for hierarchy in &self.hierarchies {
            let root = self.concept(hierarchy.root)?.identity().clone();
            mapping.push(fresh.add_hierarchy_with_identity(root)?);
        }
        for ty in &self.constraint_types {
            fresh.add_constraint_type(
                mapping[ty.hierarchy.0],
                ty.focus.clone(),
                ty.source_link.property().clone(),
                ty.target_link.property().clone(),
                mapping[ty.target_hierarchy.0],
            )?;
        }
        Ok(fresh)
    }

    /// Replaces this model's hierarchies and content with `other`'s, keeping
    /// this model's resolver and listeners. The model is clean afterwards.
    pub fn adopt_content(&mut self, other: Model) {
        self.namespaces = other.namespaces;
        self.hierarchies = other.hierarchies;
        self.constraint_types = other.constraint_types;
        self.concepts = other.concepts;
        self.constraints = other.constraints;
        self.dirty = false;
    }

    /// Replaces the conflict-resolution policy.
    pub fn set_conflict_resolver(&mut self, resolver: Box<dyn ConflictResolver>) {
        self.resolver = resolver;
    }

    /// Registers a listener. Listeners are notified in registration order.
    pub fn add_listener(&mut self, listener: Box<dyn ModelListener>) {
        self.listeners.push(listener);
    }

    // ------------------------------------------------------------------
    // Schema registration
    // ------------------------------------------------------------------

    /// Registers a hierarchy whose root is `root_name` in the schema namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] for a blank name and
    /// [`ModelError::DuplicateName`] if the root IRI is already in use.
    pub fn add_hierarchy(&mut self, root_name: &str) -> Result<HierarchyId, ModelError> {
        let identity = self.namespaces.schema_identifier(root_name)?;
        self.add_hierarchy_with_identity(identity)
    }

    /// Registers a hierarchy rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateName`] if the root IRI is already in use.
    pub fn add_hierarchy_with_identity(
        &mut self,
        root: Identifier,
    ) -> Result<HierarchyId, ModelError> {
        self.ensure_unused(&root)?;
        let id = HierarchyId(self.hierarchies.len());
        let root_id = self.concepts.insert(Concept::new(root.clone(), id, None));
        self.hierarchies.push(Hierarchy::new(id, root_id, root));
        Ok(id)
    }

    /// Registers a constraint type on `hierarchy` pointing into
    /// `target_hierarchy`, and gives the hierarchy root its default
    /// constraint of the new type.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownHierarchy`] for an unknown handle and
    /// [`ModelError::DuplicateName`] if the focus IRI is already used by
    /// another constraint type or a concept.
    pub fn add_constraint_type(
        &mut self,
        hierarchy: HierarchyId,
        focus: Identifier,
        source_property: Identifier,
        target_property: Identifier,
        target_hierarchy: HierarchyId,
    ) -> Result<ConstraintTypeId, ModelError> {
        let source_root = self.hierarchy(hierarchy)?.root;
        let target_root = self.hierarchy(target_hierarchy)?.root;
        self.ensure_unused(&focus)?;

        let id = ConstraintTypeId(self.constraint_types.len());
        let ty = ConstraintType {
            id,
            focus,
            hierarchy,
            target_hierarchy,
            source_link: Link::new(source_property, source_root),
            target_link: Link::new(target_property, target_root),
        };
        let root_constraint = ty.create_root_constraint();
        self.constraint_types.push(ty);
        self.hierarchies[hierarchy.0].constraint_types.push(id);
        self.attach(root_constraint);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The model's identifier namespaces.
    #[must_use]
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// All hierarchies in registration order.
    #[must_use]
    pub fn hierarchies(&self) -> &[Hierarchy] {
        &self.hierarchies
    }

    /// Looks up a hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownHierarchy`] for an unknown handle.
    pub fn hierarchy(&self, id: HierarchyId) -> Result<&Hierarchy, ModelError> {
        self.hierarchies
            .get(id.0)
            .ok_or_else(|| ModelError::UnknownHierarchy(format!("#{}", id.0)))
    }

    /// Finds the hierarchy whose root has the given label.
    #[must_use]
    pub fn hierarchy_by_root_label(&self, label: &str) -> Option<HierarchyId> {
        self.hierarchies
            .iter()
            .find(|h| {
                self.concepts
                    .get(h.root)
                    .is_some_and(|c| c.identity().label() == label)
            })
            .map(|h| h.id)
    }

    /// All constraint types in registration order.
    #[must_use]
    pub fn constraint_types(&self) -> &[ConstraintType] {
        &self.constraint_types
    }

    /// Looks up a constraint type.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownConstraintType`] for an unknown handle.
    pub fn constraint_type(&self, id: ConstraintTypeId) -> Result<&ConstraintType, ModelError> {
        self.constraint_types
            .get(id.0)
            .ok_or_else(|| ModelError::UnknownConstraintType(format!("#{}", id.0)))
    }

    /// Finds the constraint type whose focus concept has the given label.
    #[must_use]
    pub fn constraint_type_by_focus_label(&self, label: &str) -> Option<ConstraintTypeId> {
        self.constraint_types
            .iter()
            .find(|t| t.focus.label() == label)
            .map(|t| t.id)
    }

    /// The concept arena.
    #[must_use]
    pub fn concepts(&self) -> &Concepts {
        &self.concepts
    }

    /// Looks up a live concept.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownConcept`] if the handle is not live.
    pub fn concept(&self, id: ConceptId) -> Result<&Concept, ModelError> {
        self.concepts
            .get(id)
            .ok_or(ModelError::UnknownConcept(id.0))
    }

    /// Finds a concept by IRI in any hierarchy.
    #[must_use]
    pub fn find_concept(&self, uri: &str) -> Option<ConceptId> {
        self.hierarchies.iter().find_map(|h| h.lookup(uri))
    }

    /// Finds a concept by label in any hierarchy.
    #[must_use]
    pub fn find_by_label(&self, label: &str) -> Option<ConceptId> {
        self.concepts
            .iter()
            .find(|(_, c)| c.identity().label() == label)
            .map(|(id, _)| id)
    }

    /// Returns true if `id` is a hierarchy root.
    #[must_use]
    pub fn is_root(&self, id: ConceptId) -> bool {
        self.concepts.get(id).is_some_and(Concept::is_root)
    }

    /// Returns true if `id` is `ancestor` or lies beneath it.
    #[must_use]
    pub fn is_descendant_or_equal(&self, id: ConceptId, ancestor: ConceptId) -> bool {
        self.concepts.is_descendant_or_equal(id, ancestor)
    }

    /// Looks up a live constraint.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownConstraint`] if the handle is not live.
    pub fn constraint(&self, id: ConstraintId) -> Result<&Constraint, ModelError> {
        self.constraints
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(ModelError::UnknownConstraint(id.0))
    }

    /// Iterates over all live constraints in allocation order.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.constraints
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|k| (ConstraintId(i), k)))
    }

    /// The constraint of `ty` attached directly to `concept`, if any.
    #[must_use]
    pub fn own_constraint(&self, concept: ConceptId, ty: ConstraintTypeId) -> Option<ConstraintId> {
        self.concepts.get(concept).and_then(|c| {
            c.outward.iter().copied().find(|&k| {
                self.constraint(k)
                    .is_ok_and(|constraint| constraint.constraint_type == ty)
            })
        })
    }

    /// Returns the constraint of `ty` governing `concept`: its own, or the
    /// nearest ancestor's. The root always carries one, so the walk ends
    /// there at the latest.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownConcept`] if the handle is not live.
    /// - [`ModelError::TypeNotInHierarchy`] if `ty` is not defined on the
    ///   concept's hierarchy.
    pub fn closest_constraint(
        &self,
        concept: ConceptId,
        ty: ConstraintTypeId,
    ) -> Result<ConstraintId, ModelError> {
        self.check_type_applies(concept, ty)?;
        let mut current = Some(concept);
        while let Some(c) = current {
            if let Some(k) = self.own_constraint(c, ty) {
                return Ok(k);
            }
            current = self.concepts.parent(c);
        }
        Err(ModelError::UnknownConstraintType(
            self.constraint_type(ty)?.focus.label().to_owned(),
        ))
    }

    /// Returns true if the model has changes not yet saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the unsaved-changes flag.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    // ------------------------------------------------------------------
    // Edit operations
    // ------------------------------------------------------------------

    /// Creates a content concept named `name` under `parent`.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownConcept`] if `parent` is not live.
    /// - [`ModelError::InvalidName`] for a blank name.
    /// - [`ModelError::DuplicateName`] if the name is already used anywhere
    ///   in the model.
    pub fn add_child(&mut self, parent: ConceptId, name: &str) -> Result<ConceptId, ModelError> {
        let identity = self.namespaces.content_identifier(name)?;
        self.add_child_with_identity(parent, identity)
    }

    /// Creates a concept with an explicit identity under `parent`.
    ///
    /// # Errors
    ///
    /// Same as [`Model::add_child`].
    pub fn add_child_with_identity(
        &mut self,
        parent: ConceptId,
        identity: Identifier,
    ) -> Result<ConceptId, ModelError> {
        let hierarchy = self.concept(parent)?.hierarchy;
        self.ensure_unused(&identity)?;

        debug!(parent = parent.0, uri = identity.uri(), "adding child concept");
        let child = self
            .concepts
            .insert(Concept::new(identity.clone(), hierarchy, Some(parent)));
        if let Some(p) = self.concepts.get_mut(parent) {
            p.children.push(child);
        }
        self.hierarchies[hierarchy.0].index.insert(identity, child);

        self.emit(ModelEvent::ChildAdded { parent, child });
        self.touch();
        Ok(child)
    }

    /// Renames a concept. Returns `Ok(false)` without changing anything if
    /// the new name collides with an existing concept.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownConcept`] if `concept` is not live.
    /// - [`ModelError::InvalidRootOperation`] on a hierarchy root.
    /// - [`ModelError::InvalidName`] for a blank name.
    pub fn rename(&mut self, concept: ConceptId, new_name: &str) -> Result<bool, ModelError> {
        self.ensure_not_root(concept, "rename")?;
        let identity = self.namespaces.content_identifier(new_name)?;
        let node = self.concept(concept)?;
        let previous = node.identity.clone();
        let hierarchy = node.hierarchy;
        if previous == identity && previous.label() == identity.label() {
            return Ok(true);
        }

        let taken =
            self.find_concept(identity.uri()).is_some() || self.is_schema_entity(&identity);
        if previous != identity && taken {
            debug!(uri = identity.uri(), "rename rejected: name in use");
            return Ok(false);
        }

        let index = &mut self.hierarchies[hierarchy.0].index;
        index.remove(&previous);
        index.insert(identity.clone(), concept);
        if let Some(node) = self.concepts.get_mut(concept) {
            node.identity = identity;
        }

        self.emit(ModelEvent::ConceptRenamed { concept, previous });
        self.touch();
        Ok(true)
    }

    /// Removes a concept and its whole subtree.
    ///
    /// Constraints attached to removed concepts are deleted. Every other
    /// constraint drops removed concepts from its targets and is deleted if
    /// no target is left; one that keeps some targets is reported as
    /// changed.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownConcept`] if `concept` is not live.
    /// - [`ModelError::InvalidRootOperation`] on a hierarchy root.
    pub fn remove(&mut self, concept: ConceptId) -> Result<(), ModelError> {
        self.ensure_not_root(concept, "remove")?;
        let subtree = self.concepts.subtree(concept);
        debug!(concept = concept.0, count = subtree.len(), "removing subtree");

        if let Some(parent) = self.concepts.parent(concept) {
            if let Some(p) = self.concepts.get_mut(parent) {
                p.children.retain(|&c| c != concept);
            }
        }

        let mut events = Vec::new();
        let mut pruned = BTreeSet::new();
        for &c in &subtree {
            let outward = self
                .concepts
                .get(c)
                .map(|n| n.outward.clone())
                .unwrap_or_default();
            for k in outward {
                if self.detach(k).is_some() {
                    events.push(ModelEvent::ConstraintRemoved {
                        source: c,
                        constraint: k,
                    });
                }
            }
        }

        for &c in &subtree {
            let inward: Vec<ConstraintId> = self
                .concepts
                .get(c)
                .map(|n| n.inward.iter().copied().collect())
                .unwrap_or_default();
            for k in inward {
                let emptied = match self.constraints.get_mut(k.0).and_then(Option::as_mut) {
                    Some(constraint) => {
                        constraint.targets.remove(&c);
                        constraint.targets.is_empty()
                    }
                    None => false,
                };
                if let Some(node) = self.concepts.get_mut(c) {
                    node.inward.remove(&k);
                }
                if emptied {
                    pruned.remove(&k);
                    if let Some(removed) = self.detach(k) {
                        events.push(ModelEvent::ConstraintRemoved {
                            source: removed.source,
                            constraint: k,
                        });
                    }
                } else {
                    pruned.insert(k);
                }
            }
        }
        for k in pruned {
            if let Ok(constraint) = self.constraint(k) {
                events.push(ModelEvent::ConstraintChanged {
                    source: constraint.source,
                    constraint: k,
                });
            }
        }

        for &c in subtree.iter().rev() {
            if let Some(node) = self.concepts.take(c) {
                self.hierarchies[node.hierarchy.0].index.remove(&node.identity);
                events.push(ModelEvent::ConceptRemoved {
                    concept: c,
                    identity: node.identity,
                });
            }
        }

        for event in events {
            self.emit(event);
        }
        self.touch();
        Ok(())
    }

    /// Moves `concept` under `new_parent` if the conflict policy accepts.
    /// Returns `Ok(false)` with no observable change if it declines.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownConcept`] if a handle is not live.
    /// - [`ModelError::InvalidRootOperation`] on a hierarchy root.
    /// - [`ModelError::CrossHierarchyMove`] if `new_parent` is in another
    ///   hierarchy.
    /// - [`ModelError::CyclicMove`] if `new_parent` is `concept` or one of
    ///   its descendants.
    /// - [`ModelError::RedundantTargetValues`] if the move would place one
    ///   target value of a constraint beneath another. This is checked
    ///   before the conflict policy is consulted.
    pub fn move_concept(
        &mut self,
        concept: ConceptId,
        new_parent: ConceptId,
    ) -> Result<bool, ModelError> {
        self.ensure_not_root(concept, "move")?;
        let node = self.concept(concept)?;
        let target = self.concept(new_parent)?;
        if node.hierarchy != target.hierarchy {
            return Err(ModelError::CrossHierarchyMove {
                concept: node.identity.label().to_owned(),
                parent: target.identity.label().to_owned(),
            });
        }
        if self.concepts.is_descendant_or_equal(new_parent, concept) {
            return Err(ModelError::CyclicMove {
                concept: node.identity.label().to_owned(),
                parent: target.identity.label().to_owned(),
            });
        }
        let Some(from) = node.parent else {
            return Err(ModelError::UnknownConcept(concept.0));
        };
        if from == new_parent {
            return Ok(true);
        }

        let proposal = MoveProposal {
            concept,
            from,
            to: new_parent,
        };
        self.ensure_targets_stay_apart(&proposal)?;
        if !self.consult(|resolver, model| resolver.check_moved_concept(model, &proposal)) {
            warn!(concept = concept.0, to = new_parent.0, "move declined by conflict policy");
            return Ok(false);
        }

        if let Some(old) = self.concepts.get_mut(from) {
            old.children.retain(|&c| c != concept);
        }
        if let Some(new) = self.concepts.get_mut(new_parent) {
            new.children.push(concept);
        }
        if let Some(node) = self.concepts.get_mut(concept) {
            node.parent = Some(new_parent);
        }

        debug!(concept = concept.0, from = from.0, to = new_parent.0, "moved concept");
        self.emit(ModelEvent::ConceptMoved {
            concept,
            from,
            to: new_parent,
        });
        self.touch();
        Ok(true)
    }

    /// Attaches a constraint of `ty` to `source` with the given targets.
    ///
    /// Returns `Ok(false)` without changing anything if an equal constraint
    /// is already attached or the conflict policy declines. A concept holds
    /// at most one constraint per type; a differing existing one is
    /// replaced.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownConcept`] if a handle is not live.
    /// - [`ModelError::TypeNotInHierarchy`] if `ty` does not apply to the
    ///   source's hierarchy.
    /// - [`ModelError::OutOfScopeValue`], [`ModelError::EmptyTargetValues`]
    ///   or [`ModelError::RedundantTargetValues`] from construction.
    /// - [`ModelError::InvalidRootOperation`] when a differing constraint
    ///   is requested for a hierarchy root.
    pub fn add_constraint(
        &mut self,
        source: ConceptId,
        ty: ConstraintTypeId,
        targets: impl IntoIterator<Item = ConceptId>,
    ) -> Result<bool, ModelError> {
        self.check_type_applies(source, ty)?;
        let constraint =
            self.constraint_type(ty)?
                .create_constraint(&self.concepts, source, targets)?;

        let existing = self.own_constraint(source, ty);
        if let Some(e) = existing {
            if self.constraint(e)? == &constraint {
                return Ok(false);
            }
        }
        self.ensure_not_root(source, "constrain")?;

        let proposal = ConstraintProposal {
            source,
            constraint_type: ty,
            targets: constraint.targets.clone(),
            replaces: existing,
        };
        if !self.consult(|resolver, model| resolver.check_constraint_addition(model, &proposal)) {
            warn!(source = source.0, "constraint addition declined by conflict policy");
            return Ok(false);
        }

        if let Some(e) = existing {
            if self.detach(e).is_some() {
                self.emit(ModelEvent::ConstraintRemoved {
                    source,
                    constraint: e,
                });
            }
        }
        let id = self.attach(constraint);
        debug!(source = source.0, constraint = id.0, "added constraint");
        self.emit(ModelEvent::ConstraintAdded {
            source,
            constraint: id,
        });
        self.touch();
        Ok(true)
    }

    /// Deletes a constraint.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownConstraint`] if the handle is not live.
    /// - [`ModelError::InvalidRootOperation`] for a root's default
    ///   constraint.
    pub fn remove_constraint(&mut self, id: ConstraintId) -> Result<(), ModelError> {
        let source = self.constraint(id)?.source;
        self.ensure_not_root(source, "remove the constraint of")?;
        self.detach(id);
        self.emit(ModelEvent::ConstraintRemoved {
            source,
            constraint: id,
        });
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn attach(&mut self, constraint: Constraint) -> ConstraintId {
        let id = ConstraintId(self.constraints.len());
        if let Some(source) = self.concepts.get_mut(constraint.source) {
            source.outward.push(id);
        }
        for &target in &constraint.targets {
            if let Some(t) = self.concepts.get_mut(target) {
                t.inward.insert(id);
            }
        }
        self.constraints.push(Some(constraint));
        id
    }

    fn detach(&mut self, id: ConstraintId) -> Option<Constraint> {
        let constraint = self.constraints.get_mut(id.0).and_then(Option::take)?;
        if let Some(source) = self.concepts.get_mut(constraint.source) {
            source.outward.retain(|&k| k != id);
        }
        for &target in &constraint.targets {
            if let Some(t) = self.concepts.get_mut(target) {
                t.inward.remove(&id);
            }
        }
        Some(constraint)
    }

    /// Only constraints targeting the moved subtree can gain an overlap.
    fn ensure_targets_stay_apart(&self, proposal: &MoveProposal) -> Result<(), ModelError> {
        let view = proposal.view(self);
        let affected: BTreeSet<ConstraintId> = self
            .concepts
            .subtree(proposal.concept)
            .into_iter()
            .filter_map(|c| self.concepts.get(c))
            .flat_map(|node| node.inward.iter().copied())
            .collect();
        for k in affected {
            let targets = &self.constraint(k)?.targets;
            for &ancestor in targets {
                for &descendant in targets {
                    if ancestor != descendant && view.is_descendant_or_equal(descendant, ancestor) {
                        return Err(ModelError::RedundantTargetValues {
                            ancestor: self.concept(ancestor)?.identity.label().to_owned(),
                            descendant: self.concept(descendant)?.identity.label().to_owned(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn consult(&mut self, check: impl FnOnce(&mut dyn ConflictResolver, &Model) -> bool) -> bool {
        let mut resolver = std::mem::replace(&mut self.resolver, Box::new(AcceptAll));
        let accepted = check(resolver.as_mut(), &*self);
        self.resolver = resolver;
        accepted
    }

    fn emit(&mut self, event: ModelEvent) {
        for listener in &mut self.listeners {
            dispatch(listener.as_mut(), &event);
        }
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.emit(ModelEvent::ModelUpdated);
    }

    fn ensure_not_root(&self, concept: ConceptId, operation: &'static str) -> Result<(), ModelError> {
        let node = self.concept(concept)?;
        if node.is_root() {
            return Err(ModelError::InvalidRootOperation {
                operation,
                root: node.identity.label().to_owned(),
            });
        }
        Ok(())
    }

    fn ensure_unused(&self, identity: &Identifier) -> Result<(), ModelError> {
        if self.find_concept(identity.uri()).is_some() || self.is_schema_entity(identity) {
            return Err(ModelError::DuplicateName {
                name: identity.label().to_owned(),
                uri: identity.uri().to_owned(),
            });
        }
        Ok(())
    }

    fn is_schema_entity(&self, identity: &Identifier) -> bool {
        self.constraint_types.iter().any(|t| {
            &t.focus == identity
                || t.source_link.property() == identity
                || t.target_link.property() == identity
        })
    }

    fn check_type_applies(&self, concept: ConceptId, ty: ConstraintTypeId) -> Result<(), ModelError> {
        let hierarchy = self.concept(concept)?.hierarchy;
        let constraint_type = self.constraint_type(ty)?;
        if constraint_type.hierarchy != hierarchy {
            let root = self.hierarchy(hierarchy)?.root;
            return Err(ModelError::TypeNotInHierarchy {
                focus: constraint_type.focus.label().to_owned(),
                hierarchy: self.concept(root)?.identity.label().to_owned(),
            });
        }
        Ok(())
    }
}
