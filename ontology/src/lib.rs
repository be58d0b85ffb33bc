//! OWL axiom document for taxonomy models.
//!
//! The `taxo-ontology` crate holds the persisted side of a taxonomy: an
//! insertion-ordered set of OWL axioms over named classes, restrictions,
//! unions and intersections. It answers told-subsumption queries, saves and
//! opens a JSON document, and exports Turtle and N-Triples for reasoners.
//!
//! # Entry Point
//!
//! ```
//! use taxo_ontology::{named, AxiomStore, OntologyAccess};
//!
//! let mut store = AxiomStore::new("http://example.org/menu");
//! store.declare_class("http://example.org/menu#Pasta");
//! store.add_subclass_axiom(
//!     named("http://example.org/menu#Pasta"),
//!     named("http://example.org/menu#Dish"),
//! );
//! assert_eq!(
//!     store.subclasses("http://example.org/menu#Dish", true),
//!     vec!["http://example.org/menu#Pasta"],
//! );
//! ```
//!
//! # Serialization
//!
//! ```
//! let store = taxo_ontology::AxiomStore::new("http://example.org/menu");
//! let turtle = taxo_ontology::serializer::turtle::to_turtle(&store);
//! let ntriples = taxo_ontology::serializer::ntriples::to_ntriples(&store);
//! assert!(turtle.contains("owl:Ontology"));
//! assert!(ntriples.ends_with(" .\n"));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod model;
pub mod serializer;
pub mod store;

pub use error::OntologyError;
pub use model::{all, intersection_of, named, some, union_of, Axiom, ClassExpression};
pub use store::{AxiomDocument, AxiomStore, OntologyAccess};
