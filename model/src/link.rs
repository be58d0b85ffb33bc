//! Property/value links anchoring the two sides of a constraint.

use crate::concept::{ConceptId, Concepts};
use crate::identifier::Identifier;

/// A (property, category) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    property: Identifier,
    value: ConceptId,
}

impl Link {
    /// Creates a link.
    #[must_use]
    pub fn new(property: Identifier, value: ConceptId) -> Self {
        Self { property, value }
    }

    /// The property identifier.
    #[must_use]
    pub fn property(&self) -> &Identifier {
        &self.property
    }

    /// The category the property points at.
    #[must_use]
    pub fn value(&self) -> ConceptId {
        self.value
    }

    /// Derives a link with the same property and a different value.
    ///
    /// The result is only a sub-link of `self` when `value` lies beneath
    /// this link's value; see [`Link::is_sub_link_of`].
    #[must_use]
    pub fn derive(&self, value: ConceptId) -> Link {
        Link {
            property: self.property.clone(),
            value,
        }
    }

    /// Returns true if `self` shares `other`'s property and its value is a
    /// descendant-or-equal of `other`'s value.
    #[must_use]
    pub fn is_sub_link_of(&self, other: &Link, concepts: &Concepts) -> bool {
        self.property == other.property
            && concepts.is_descendant_or_equal(self.value, other.value)
    }
}
