//! Hierarchies: one rooted concept tree plus its constraint types.

use std::collections::HashMap;

use crate::concept::ConceptId;
use crate::constraint::ConstraintTypeId;
use crate::identifier::Identifier;

/// Handle to a hierarchy of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HierarchyId(pub(crate) usize);

impl HierarchyId {
    /// Returns the position of the hierarchy in registration order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One rooted tree plus the constraint types scoped to it.
///
/// The index maps every concept of the tree, root included, by identity.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub(crate) id: HierarchyId,
    pub(crate) root: ConceptId,
    pub(crate) constraint_types: Vec<ConstraintTypeId>,
    pub(crate) index: HashMap<Identifier, ConceptId>,
}

impl Hierarchy {
    pub(crate) fn new(id: HierarchyId, root: ConceptId, root_identity: Identifier) -> Self {
        let mut index = HashMap::new();
        index.insert(root_identity, root);
        Self {
            id,
            root,
            constraint_types: Vec::new(),
            index,
        }
    }

    /// This hierarchy's handle.
    #[must_use]
    pub fn id(&self) -> HierarchyId {
        self.id
    }

    /// The root concept.
    #[must_use]
    pub fn root(&self) -> ConceptId {
        self.root
    }

    /// Constraint types whose source side is this hierarchy, in registration order.
    #[must_use]
    pub fn constraint_types(&self) -> &[ConstraintTypeId] {
        &self.constraint_types
    }

    /// Looks up a concept of this hierarchy by IRI.
    #[must_use]
    pub fn lookup(&self, uri: &str) -> Option<ConceptId> {
        self.index.get(&Identifier::new(uri, "")).copied()
    }

    /// Number of concepts in the tree, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always false: a hierarchy contains at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
