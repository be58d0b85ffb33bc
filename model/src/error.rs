//! Errors raised by model edit operations.

use thiserror::Error;

/// Errors raised by [`Model`](crate::Model) construction and edit operations.
///
/// Every variant is reported before any mutation takes place: an operation
/// that returns an error leaves the model exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A content concept with this IRI already exists somewhere in the model.
    #[error("a concept named '{name}' already exists ({uri})")]
    DuplicateName {
        /// Requested name (label).
        name: String,
        /// IRI the name maps to.
        uri: String,
    },

    /// The name cannot be turned into an identifier.
    #[error("'{name}' is not a valid concept name")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// A constraint value lies outside the anchor hierarchy of its type.
    #[error("'{value}' is not within '{anchor}', the {side} anchor of constraint type '{focus}'")]
    OutOfScopeValue {
        /// Label of the constraint type's focus concept.
        focus: String,
        /// Which side of the constraint was out of scope.
        side: LinkSide,
        /// Label of the offending concept.
        value: String,
        /// Label of the anchor concept the value must descend from.
        anchor: String,
    },

    /// Two target values of a constraint are in a descendant relationship.
    #[error("target values '{ancestor}' and '{descendant}' overlap: '{descendant}' descends from '{ancestor}'")]
    RedundantTargetValues {
        /// Label of the more general target.
        ancestor: String,
        /// Label of the more specific target.
        descendant: String,
    },

    /// A constraint was constructed without any target value.
    #[error("a constraint of type '{focus}' needs at least one target value")]
    EmptyTargetValues {
        /// Label of the constraint type's focus concept.
        focus: String,
    },

    /// Rename, move, remove or constrain was attempted on a hierarchy root.
    #[error("cannot {operation} the hierarchy root '{root}'")]
    InvalidRootOperation {
        /// The attempted operation.
        operation: &'static str,
        /// Label of the root.
        root: String,
    },

    /// A move would place a concept under a parent of another hierarchy.
    #[error("cannot move '{concept}' under '{parent}': they belong to different hierarchies")]
    CrossHierarchyMove {
        /// Label of the moved concept.
        concept: String,
        /// Label of the requested parent.
        parent: String,
    },

    /// A move would place a concept under itself or one of its descendants.
    #[error("cannot move '{concept}' under its own descendant '{parent}'")]
    CyclicMove {
        /// Label of the moved concept.
        concept: String,
        /// Label of the requested parent.
        parent: String,
    },

    /// The constraint type is not defined on the concept's hierarchy.
    #[error("constraint type '{focus}' does not apply to hierarchy '{hierarchy}'")]
    TypeNotInHierarchy {
        /// Label of the constraint type's focus concept.
        focus: String,
        /// Label of the hierarchy root.
        hierarchy: String,
    },

    /// A concept handle does not refer to a live concept.
    #[error("unknown concept handle {0}")]
    UnknownConcept(usize),

    /// A constraint handle does not refer to a live constraint.
    #[error("unknown constraint handle {0}")]
    UnknownConstraint(usize),

    /// A hierarchy handle or name does not refer to a registered hierarchy.
    #[error("unknown hierarchy '{0}'")]
    UnknownHierarchy(String),

    /// A constraint-type handle or name does not refer to a registered type.
    #[error("unknown constraint type '{0}'")]
    UnknownConstraintType(String),
}

/// The side of a constraint a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSide {
    /// The source value side.
    Source,
    /// The target values side.
    Target,
}

impl std::fmt::Display for LinkSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LinkSide::Source => "source",
            LinkSide::Target => "target",
        })
    }
}
