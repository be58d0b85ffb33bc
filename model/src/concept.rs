//! Concept nodes and the arena that owns them.
//!
//! Concepts reference each other (parent, children) and are referenced by
//! constraints (source, targets). All of those references are [`ConceptId`]
//! handles into a single [`Concepts`] arena owned by the model, so no
//! concept ever holds another by pointer.

use std::collections::BTreeSet;

use crate::constraint::ConstraintId;
use crate::hierarchy::HierarchyId;
use crate::identifier::Identifier;

/// Handle to a concept in a model's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConceptId(pub(crate) usize);

impl ConceptId {
    /// Returns the raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in a hierarchy's tree.
#[derive(Debug, Clone)]
pub struct Concept {
    pub(crate) identity: Identifier,
    pub(crate) hierarchy: HierarchyId,
    pub(crate) parent: Option<ConceptId>,
    pub(crate) children: Vec<ConceptId>,
    pub(crate) outward: Vec<ConstraintId>,
    pub(crate) inward: BTreeSet<ConstraintId>,
}

impl Concept {
    pub(crate) fn new(
        identity: Identifier,
        hierarchy: HierarchyId,
        parent: Option<ConceptId>,
    ) -> Self {
        Self {
            identity,
            hierarchy,
            parent,
            children: Vec::new(),
            outward: Vec::new(),
            inward: BTreeSet::new(),
        }
    }

    /// The concept's identifier.
    #[must_use]
    pub fn identity(&self) -> &Identifier {
        &self.identity
    }

    /// The hierarchy this concept belongs to.
    #[must_use]
    pub fn hierarchy(&self) -> HierarchyId {
        self.hierarchy
    }

    /// The parent concept, or `None` for a hierarchy root.
    #[must_use]
    pub fn parent(&self) -> Option<ConceptId> {
        self.parent
    }

    /// Direct children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[ConceptId] {
        &self.children
    }

    /// Constraints whose source value is this concept.
    #[must_use]
    pub fn outward_constraints(&self) -> &[ConstraintId] {
        &self.outward
    }

    /// Constraints that list this concept among their target values.
    #[must_use]
    pub fn inward_constraints(&self) -> &BTreeSet<ConstraintId> {
        &self.inward
    }

    /// Returns true for a hierarchy root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena of concepts. Removed concepts leave an empty slot so that handles
/// are never reused.
#[derive(Debug, Clone, Default)]
pub struct Concepts {
    slots: Vec<Option<Concept>>,
}

impl Concepts {
    pub(crate) fn insert(&mut self, concept: Concept) -> ConceptId {
        self.slots.push(Some(concept));
        ConceptId(self.slots.len() - 1)
    }

    pub(crate) fn take(&mut self, id: ConceptId) -> Option<Concept> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    pub(crate) fn get_mut(&mut self, id: ConceptId) -> Option<&mut Concept> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Looks up a live concept.
    #[must_use]
    pub fn get(&self, id: ConceptId) -> Option<&Concept> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Iterates over all live concepts in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (ConceptId, &Concept)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|c| (ConceptId(i), c)))
    }

    /// Number of live concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns true if no concept is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the parent of `id`, if any.
    #[must_use]
    pub fn parent(&self, id: ConceptId) -> Option<ConceptId> {
        self.get(id).and_then(|c| c.parent)
    }

    /// Iterates from the parent of `id` up to the root.
    pub fn ancestors(&self, id: ConceptId) -> Ancestors<'_> {
        Ancestors {
            concepts: self,
            next: self.parent(id),
        }
    }

    /// Returns true if `id` is `ancestor` or lies beneath it.
    #[must_use]
    pub fn is_descendant_or_equal(&self, id: ConceptId, ancestor: ConceptId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Returns `id` and all of its descendants in pre-order.
    #[must_use]
    pub fn subtree(&self, id: ConceptId) -> Vec<ConceptId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(concept) = self.get(next) {
                out.push(next);
                stack.extend(concept.children.iter().rev().copied());
            }
        }
        out
    }

    /// Depth of `id` below its root (the root has depth 0).
    #[must_use]
    pub fn depth(&self, id: ConceptId) -> usize {
        self.ancestors(id).count()
    }
}

/// Iterator over the ancestors of a concept, nearest first.
#[derive(Debug)]
pub struct Ancestors<'a> {
    concepts: &'a Concepts,
    next: Option<ConceptId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ConceptId;

    fn next(&mut self) -> Option<ConceptId> {
        let current = self.next?;
        self.next = self.concepts.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, parent: Option<ConceptId>) -> Concept {
        Concept::new(
            Identifier::new(format!("http://x.org/c#{name}"), name),
            HierarchyId(0),
            parent,
        )
    }

    fn chain() -> (Concepts, ConceptId, ConceptId, ConceptId) {
        let mut concepts = Concepts::default();
        let root = concepts.insert(node("Root", None));
        let mid = concepts.insert(node("Mid", Some(root)));
        let leaf = concepts.insert(node("Leaf", Some(mid)));
        concepts.get_mut(root).unwrap().children.push(mid);
        concepts.get_mut(mid).unwrap().children.push(leaf);
        (concepts, root, mid, leaf)
    }

    #[test]
    fn ancestors_walk_to_root() {
        let (concepts, root, mid, leaf) = chain();
        let ancestors: Vec<_> = concepts.ancestors(leaf).collect();
        assert_eq!(ancestors, vec![mid, root]);
        assert_eq!(concepts.depth(leaf), 2);
        assert_eq!(concepts.depth(root), 0);
    }

    #[test]
    fn descendant_or_equal() {
        let (concepts, root, mid, leaf) = chain();
        assert!(concepts.is_descendant_or_equal(leaf, root));
        assert!(concepts.is_descendant_or_equal(mid, mid));
        assert!(!concepts.is_descendant_or_equal(root, leaf));
    }

    #[test]
    fn subtree_is_pre_order_and_skips_removed() {
        let (mut concepts, root, mid, leaf) = chain();
        assert_eq!(concepts.subtree(root), vec![root, mid, leaf]);
        concepts.take(leaf);
        assert_eq!(concepts.subtree(root), vec![root, mid]);
        assert_eq!(concepts.len(), 2);
        assert!(concepts.get(leaf).is_none());
    }
}
