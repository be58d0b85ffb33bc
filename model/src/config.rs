//! Declarative schema configuration.
//!
//! The configuration names each hierarchy's root concept and, per
//! hierarchy, the constraint types whose source side it is. It is read once
//! at startup, before any content is loaded:
//!
//! ```toml
//! [namespaces]
//! schema = "http://example.org/menu/schema#"
//! content = "http://example.org/menu/content#"
//!
//! [[hierarchy]]
//! root = "Dish"
//!
//! [[hierarchy.constraint_type]]
//! focus = "DishConstraint"
//! source_property = "hasDish"
//! target_property = "hasIngredient"
//! target_hierarchy = "Ingredient"
//!
//! [[hierarchy]]
//! root = "Ingredient"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ModelError;
use crate::identifier::Namespaces;
use crate::model::Model;
use crate::policy::ConflictResolver;

/// Errors raised while reading or applying a schema configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read schema configuration {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for this schema.
    #[error("failed to parse schema configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but is inconsistent.
    #[error("invalid schema configuration: {0}")]
    Invalid(String),

    /// Registering the schema on a model failed.
    #[error("failed to build model from schema configuration: {0}")]
    Model(#[from] ModelError),
}

/// Root of the schema configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Schema and content namespaces.
    pub namespaces: NamespaceConfig,
    /// Hierarchies in registration order.
    #[serde(rename = "hierarchy", default)]
    pub hierarchies: Vec<HierarchyConfig>,
}

/// The `[namespaces]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// IRI prefix for roots, focus concepts and properties.
    pub schema: String,
    /// IRI prefix for user-created categories.
    pub content: String,
}

/// One `[[hierarchy]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Name of the root concept (schema namespace).
    pub root: String,
    /// Constraint types whose source side is this hierarchy.
    #[serde(rename = "constraint_type", default)]
    pub constraint_types: Vec<ConstraintTypeConfig>,
}

/// One `[[hierarchy.constraint_type]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintTypeConfig {
    /// Name of the focus concept (schema namespace).
    pub focus: String,
    /// Name of the property linking a definition class to its source value.
    pub source_property: String,
    /// Name of the property restricting the target values.
    pub target_property: String,
    /// Root name of the hierarchy target values are drawn from.
    pub target_hierarchy: String,
}

impl SchemaConfig {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, and the
    /// errors of [`SchemaConfig::from_toml_str`] otherwise.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] if [`SchemaConfig::validate`] fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SchemaConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks namespaces, root and focus uniqueness, and that every
    /// constraint type targets a declared hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ns = &self.namespaces;
        if ns.schema.trim().is_empty() || ns.content.trim().is_empty() {
            return Err(ConfigError::Invalid("namespaces must not be empty".into()));
        }
        if ns.schema == ns.content {
            return Err(ConfigError::Invalid(
                "schema and content namespaces must differ".into(),
            ));
        }
        if ns.content.starts_with(&ns.schema) || ns.schema.starts_with(&ns.content) {
            return Err(ConfigError::Invalid(
                "schema and content namespaces must not be prefixes of each other".into(),
            ));
        }

        let mut roots = HashSet::new();
        for h in &self.hierarchies {
            if !roots.insert(h.root.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "hierarchy root '{}' is declared twice",
                    h.root
                )));
            }
        }

        let mut foci = HashSet::new();
        for h in &self.hierarchies {
            for t in &h.constraint_types {
                if !foci.insert(t.focus.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "focus concept '{}' is declared twice",
                        t.focus
                    )));
                }
                if !roots.contains(t.target_hierarchy.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "constraint type '{}' targets unknown hierarchy '{}'",
                        t.focus, t.target_hierarchy
                    )));
                }
            }
        }
        Ok(())
    }

    /// Returns the namespaces as a model value.
    #[must_use]
    pub fn to_namespaces(&self) -> Namespaces {
        Namespaces::new(&self.namespaces.schema, &self.namespaces.content)
    }
}

impl Model {
    /// Builds a model from a configuration: hierarchies first, then
    /// constraint types (which give each root its default constraints).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration is inconsistent
    /// and [`ConfigError::Model`] if registration fails.
    pub fn from_config(
        config: &SchemaConfig,
        resolver: Box<dyn ConflictResolver>,
    ) -> Result<Model, ConfigError> {
        config.validate()?;
        let mut model = Model::new(config.to_namespaces(), resolver);

        let mut ids = Vec::with_capacity(config.hierarchies.len());
        for h in &config.hierarchies {
            ids.push((h.root.as_str(), model.add_hierarchy(&h.root)?));
        }
        let lookup = |name: &str| {
            ids.iter()
                .find(|(root, _)| *root == name)
                .map(|(_, id)| *id)
                .ok_or_else(|| ModelError::UnknownHierarchy(name.to_owned()))
        };

        for (h, &(_, hierarchy)) in config.hierarchies.iter().zip(ids.iter()) {
            for t in &h.constraint_types {
                let namespaces = model.namespaces().clone();
                let target = lookup(&t.target_hierarchy)?;
                model.add_constraint_type(
                    hierarchy,
                    namespaces.schema_identifier(&t.focus)?,
                    namespaces.schema_identifier(&t.source_property)?,
                    namespaces.schema_identifier(&t.target_property)?,
                    target,
                )?;
            }
        }
        model.mark_clean();
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::AcceptAll;

    const MENU: &str = r#"
[namespaces]
schema = "http://example.org/menu/schema#"
content = "http://example.org/menu/content#"

[[hierarchy]]
root = "Dish"

[[hierarchy.constraint_type]]
focus = "DishConstraint"
source_property = "hasDish"
target_property = "hasIngredient"
target_hierarchy = "Ingredient"

[[hierarchy]]
root = "Ingredient"
"#;

    #[test]
    fn parses_and_builds_model() {
        let config = SchemaConfig::from_toml_str(MENU).unwrap();
        assert_eq!(config.hierarchies.len(), 2);
        let model = Model::from_config(&config, Box::new(AcceptAll)).unwrap();
        assert_eq!(model.hierarchies().len(), 2);
        assert_eq!(model.constraint_types().len(), 1);
        let ty = &model.constraint_types()[0];
        assert_eq!(ty.focus().uri(), "http://example.org/menu/schema#DishConstraint");
        assert_eq!(ty.source_link().property().label(), "hasDish");
        assert!(!model.is_dirty());

        // The Dish root carries the default constraint pointing at the Ingredient root.
        let dish_root = model.hierarchies()[0].root();
        let ingredient_root = model.hierarchies()[1].root();
        let k = model.closest_constraint(dish_root, ty.id()).unwrap();
        let constraint = model.constraint(k).unwrap();
        assert_eq!(constraint.source(), dish_root);
        assert!(constraint.targets().contains(&ingredient_root));
    }

    #[test]
    fn rejects_unknown_target_hierarchy() {
        let text = MENU.replace("target_hierarchy = \"Ingredient\"", "target_hierarchy = \"Drink\"");
        let err = SchemaConfig::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("Drink")));
    }

    #[test]
    fn rejects_duplicate_roots() {
        let text = format!("{MENU}\n[[hierarchy]]\nroot = \"Dish\"\n");
        assert!(matches!(
            SchemaConfig::from_toml_str(&text),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_identical_namespaces() {
        let text = MENU.replace("menu/content#", "menu/schema#");
        assert!(matches!(
            SchemaConfig::from_toml_str(&text),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn reports_malformed_toml() {
        assert!(matches!(
            SchemaConfig::from_toml_str("[namespaces"),
            Err(ConfigError::Parse(_))
        ));
    }
}
