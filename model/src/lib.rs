//! Taxonomy-and-constraint model.
//!
//! A [`Model`] holds a set of concept hierarchies (rooted trees of named
//! categories) plus cross-hierarchy constraints restricting, for a category
//! of one hierarchy, which categories of another hierarchy it may be
//! associated with. Constraints are inherited: a concept without a rule of
//! its own is governed by its nearest constrained ancestor, and every
//! hierarchy root carries a default rule per constraint type.
//!
//! # Entry Point
//!
//! ```
//! use taxo_model::{AcceptAll, Model, SchemaConfig};
//!
//! let config = SchemaConfig::from_toml_str(r#"
//!     [namespaces]
//!     schema = "http://example.org/menu/schema#"
//!     content = "http://example.org/menu/content#"
//!
//!     [[hierarchy]]
//!     root = "Dish"
//!     [[hierarchy.constraint_type]]
//!     focus = "DishConstraint"
//!     source_property = "hasDish"
//!     target_property = "hasIngredient"
//!     target_hierarchy = "Ingredient"
//!
//!     [[hierarchy]]
//!     root = "Ingredient"
//! "#).unwrap();
//! let mut model = Model::from_config(&config, Box::new(AcceptAll)).unwrap();
//! let dish = model.hierarchies()[0].root();
//! let pasta = model.add_child(dish, "Pasta").unwrap();
//! assert_eq!(model.concept(pasta).unwrap().identity().label(), "Pasta");
//! ```
//!
//! # Ownership
//!
//! Concepts and constraints live in arenas owned by the model and refer to
//! each other through [`ConceptId`] and [`ConstraintId`] handles.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod concept;
pub mod config;
pub mod constraint;
pub mod error;
pub mod events;
pub mod hierarchy;
pub mod identifier;
pub mod link;
pub mod model;
pub mod policy;


pub use concept::{Concept, ConceptId, Concepts};
pub use config::{ConfigError, SchemaConfig};
pub use constraint::{Constraint, ConstraintId, ConstraintType, ConstraintTypeId};
pub use error::{LinkSide, ModelError};
pub use events::{EventLog, ModelEvent, ModelListener};
pub use hierarchy::{Hierarchy, HierarchyId};
pub use identifier::{Identifier, Namespaces};
pub use link::Link;
pub use model::Model;
pub use policy::{
    AcceptAll, AlwaysConfirm, ConfirmEveryMove, Confirmations, ConflictResolver,
    ConstraintProposal, MoveProposal, NeverConfirm, RefinementResolver, TreeView,
};
