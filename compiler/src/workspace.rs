//! A schema configuration, its model and the axiom document it persists to.

use std::path::{Path, PathBuf};

use taxo_model::{ConfigError, ConflictResolver, Model, SchemaConfig};
use taxo_ontology::serializer::{ntriples, turtle};
use taxo_ontology::{AxiomStore, OntologyError};
use thiserror::Error;
use tracing::info;

use crate::load::{BadContentOntology, ContentLoader, LoadSummary};
use crate::render::{ContentRenderer, RenderError, RenderSummary};

/// Errors raised while opening, saving or exporting a workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The schema configuration is unreadable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The axiom document could not be read or written.
    #[error(transparent)]
    Ontology(#[from] OntologyError),

    /// The axiom document does not encode a model of this schema.
    #[error(transparent)]
    Load(#[from] BadContentOntology),

    /// The model could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// An open taxonomy: configuration, model and axiom document.
#[derive(Debug)]
pub struct Workspace {
    config: SchemaConfig,
    model: Model,
    store: AxiomStore,
    path: PathBuf,
}

impl Workspace {
    /// Reads the configuration at `config_path` and loads the document at
    /// `document_path` into a model governed by `resolver`. A missing
    /// document yields a model with only the hierarchy roots.
    ///
    /// # Errors
    ///
    /// - [`WorkspaceError::Config`] if the configuration cannot be used.
    /// - [`WorkspaceError::Ontology`] if the document cannot be read.
    /// - [`WorkspaceError::Load`] if the document does not fit the schema.
    pub fn open(
        config_path: &Path,
        document_path: &Path,
        resolver: Box<dyn ConflictResolver>,
    ) -> Result<Self, WorkspaceError> {
        let config = SchemaConfig::from_path(config_path)?;
        let store = if document_path.exists() {
            AxiomStore::open(document_path)?
        } else {
            info!(path = %document_path.display(), "no document yet, starting empty");
            AxiomStore::new(ontology_iri(&config))
        };
        Self::from_parts(config, store, document_path.to_path_buf(), resolver)
    }

    /// Builds a workspace from an already parsed configuration and document.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Config`] if the configuration is invalid and
    /// [`WorkspaceError::Load`] if the document does not fit it.
    pub fn from_parts(
        config: SchemaConfig,
        store: AxiomStore,
        path: PathBuf,
        resolver: Box<dyn ConflictResolver>,
    ) -> Result<Self, WorkspaceError> {
        let mut model = Model::from_config(&config, resolver)?;
        if !store.is_empty() {
            let LoadSummary {
                concepts,
                constraints,
            } = ContentLoader::load_into(&mut model, &store)?;
            info!(path = %path.display(), concepts, constraints, "opened workspace");
        }
        Ok(Self {
            config,
            model,
            store,
            path,
        })
    }

    /// The schema configuration.
    #[must_use]
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// The model.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The model, for editing.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// The axiom document as of the last render.
    #[must_use]
    pub fn store(&self) -> &AxiomStore {
        &self.store
    }

    /// Where the document is saved.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the model into the in-memory document without writing it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Render`] if rendering fails; the document is
    /// unchanged in that case.
    pub fn render(&mut self) -> Result<RenderSummary, WorkspaceError> {
        Ok(ContentRenderer::render(&self.model, &mut self.store)?)
    }

    /// Renders the model and writes the document. The file is only written
    /// once rendering has succeeded; the model is clean afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Render`] if rendering fails and
    /// [`WorkspaceError::Ontology`] if the file cannot be written.
    pub fn save(&mut self) -> Result<RenderSummary, WorkspaceError> {
        let summary = self.render()?;
        self.store.save(&self.path)?;
        self.model.mark_clean();
        info!(path = %self.path.display(), axioms = self.store.len(), "saved workspace");
        Ok(summary)
    }

    /// Renders the model and returns the document as Turtle.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Render`] if rendering fails.
    pub fn export_turtle(&mut self) -> Result<String, WorkspaceError> {
        self.render()?;
        Ok(turtle::to_turtle(&self.store))
    }

    /// Renders the model and returns the document as N-Triples.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Render`] if rendering fails.
    pub fn export_ntriples(&mut self) -> Result<String, WorkspaceError> {
        self.render()?;
        Ok(ntriples::to_ntriples(&self.store))
    }
}

/// The ontology IRI for a new document: the content namespace without its
/// trailing separator.
#[must_use]
pub fn ontology_iri(config: &SchemaConfig) -> String {
    config
        .namespaces
        .content
        .trim_end_matches(['#', '/'])
        .to_owned()
}
