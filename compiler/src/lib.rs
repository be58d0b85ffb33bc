//! Compiles taxonomy models to and from OWL axiom documents.
//!
//! - [`load`]: [`ContentLoader`] rebuilds a model from a document, rejecting
//!   documents that do not follow the encoding with a single
//!   [`BadContentOntology`] error
//! - [`render`]: [`ContentRenderer`] rewrites a document from a model
//! - [`check`]: runtime verification of the model's invariants
//! - [`workspace`]: a configuration, model and document opened together
//!
//! # Entry Point
//!
//! ```
//! use taxo_compiler::{ContentLoader, ContentRenderer};
//! use taxo_model::{AcceptAll, Model, SchemaConfig};
//! use taxo_ontology::AxiomStore;
//!
//! let config = SchemaConfig::from_toml_str(r#"
//!     [namespaces]
//!     schema = "http://example.org/menu/schema#"
//!     content = "http://example.org/menu/content#"
//!     [[hierarchy]]
//!     root = "Dish"
//! "#).unwrap();
//! let mut model = Model::from_config(&config, Box::new(AcceptAll)).unwrap();
//! let root = model.hierarchies()[0].root();
//! model.add_child(root, "Pasta").unwrap();
//!
//! let mut store = AxiomStore::new("http://example.org/menu");
//! ContentRenderer::render(&model, &mut store).unwrap();
//!
//! let mut reloaded = Model::from_config(&config, Box::new(AcceptAll)).unwrap();
//! let summary = ContentLoader::load_into(&mut reloaded, &store).unwrap();
//! assert_eq!(summary.concepts, 1);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod check;
pub mod load;
pub mod render;
pub mod workspace;

pub use check::{check_model, ConsistencyReport, Severity, TestResult};
pub use load::{BadContentOntology, ContentLoader, LoadError, LoadSummary};
pub use render::{ContentRenderer, RenderError, RenderSummary};
pub use workspace::{Workspace, WorkspaceError};
