//! Workspace persistence integration tests.

mod common;

use std::fs;
use std::path::Path;

use common::{content, MENU};
use taxo_compiler::{Workspace, WorkspaceError};
use taxo_model::{AcceptAll, AlwaysConfirm, ConfigError, ConfirmEveryMove, ModelError};
use taxo_ontology::OntologyError;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("menu.toml");
    fs::write(&path, MENU).unwrap();
    path
}

fn open(config: &Path, document: &Path) -> Workspace {
    Workspace::open(config, document, Box::new(AcceptAll)).unwrap()
}

// ============================================================================
// Open / save
// ============================================================================

#[test]
fn test_missing_document_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let ws = open(&config, &dir.path().join("menu.json"));
    assert_eq!(ws.model().concepts().len(), 2);
    assert!(ws.store().is_empty());
    assert_eq!(ws.store().iri(), "http://example.org/menu/content");
}

#[test]
fn test_saved_edits_are_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let document = dir.path().join("menu.json");

    let mut ws = open(&config, &document);
    let model = ws.model_mut();
    let dish = model.hierarchies()[0].root();
    let ingredient = model.hierarchies()[1].root();
    let ty = model.constraint_types()[0].id();
    let pasta = model.add_child(dish, "Pasta").unwrap();
    let wheat = model.add_child(ingredient, "Wheat").unwrap();
    model.add_constraint(pasta, ty, [wheat]).unwrap();
    assert!(ws.model().is_dirty());

    let summary = ws.save().unwrap();
    assert_eq!(summary.concepts, 2);
    assert_eq!(summary.definitions, 2);
    assert!(!ws.model().is_dirty());
    assert!(document.exists());

    let reopened = open(&config, &document);
    let model = reopened.model();
    let pasta = model.find_concept(&content("Pasta")).unwrap();
    let wheat = model.find_concept(&content("Wheat")).unwrap();
    let governing = model.closest_constraint(pasta, ty).unwrap();
    let constraint = model.constraint(governing).unwrap();
    assert_eq!(constraint.source(), pasta);
    assert!(constraint.targets().contains(&wheat));
    assert!(!model.is_dirty());
}

#[test]
fn test_failed_render_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let document = dir.path().join("menu.json");

    let mut ws = open(&config, &document);
    let dish = ws.model().hierarchies()[0].root();
    ws.model_mut()
        .add_child(dish, "DishConstraint-Constraint-1--Dish-to-Ingredient")
        .unwrap();
    let err = ws.save().unwrap_err();
    assert!(matches!(err, WorkspaceError::Render(_)));
    assert!(!document.exists());
    assert!(ws.model().is_dirty());
}

#[test]
fn test_confirmed_target_nesting_move_cannot_break_saved_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let document = dir.path().join("menu.json");

    let mut ws = Workspace::open(
        &config,
        &document,
        Box::new(ConfirmEveryMove::new(AlwaysConfirm)),
    )
    .unwrap();
    let model = ws.model_mut();
    let dish = model.hierarchies()[0].root();
    let ingredient = model.hierarchies()[1].root();
    let ty = model.constraint_types()[0].id();
    let pasta = model.add_child(dish, "Pasta").unwrap();
    let grain = model.add_child(ingredient, "Grain").unwrap();
    let egg = model.add_child(ingredient, "Egg").unwrap();
    model.add_constraint(pasta, ty, [grain, egg]).unwrap();

    assert!(matches!(
        model.move_concept(egg, grain),
        Err(ModelError::RedundantTargetValues { .. })
    ));
    ws.save().unwrap();

    let reopened = open(&config, &document);
    let model = reopened.model();
    let pasta = model.find_concept(&content("Pasta")).unwrap();
    let egg = model.find_concept(&content("Egg")).unwrap();
    let k = model.own_constraint(pasta, ty).unwrap();
    assert_eq!(model.constraint(k).unwrap().targets().len(), 2);
    assert_eq!(model.concepts().parent(egg), Some(model.hierarchies()[1].root()));
}

// ============================================================================
// Exports
// ============================================================================

#[test]
fn test_exports_render_current_model() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let mut ws = open(&config, &dir.path().join("menu.json"));
    let dish = ws.model().hierarchies()[0].root();
    ws.model_mut().add_child(dish, "Soup").unwrap();

    let turtle = ws.export_turtle().unwrap();
    assert!(turtle.contains(&format!("<{}>\n  a owl:Class", content("Soup"))));
    assert!(turtle.contains("owl:allValuesFrom"));

    let ntriples = ws.export_ntriples().unwrap();
    assert!(ntriples.lines().all(|l| l.ends_with(" .")));
    assert!(ntriples.contains(&content("Soup")));

    // Exporting does not save.
    assert!(ws.model().is_dirty());
    assert!(!ws.path().exists());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("menu.toml");
    fs::write(&config, MENU.replace("\"Ingredient\"\n\n", "\"Drink\"\n\n")).unwrap();
    let err = Workspace::open(&config, &dir.path().join("menu.json"), Box::new(AcceptAll))
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::Config(ConfigError::Invalid(_))));
}

#[test]
fn test_corrupt_document_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let document = dir.path().join("menu.json");
    fs::write(&document, "{ not json").unwrap();
    let err = Workspace::open(&config, &document, Box::new(AcceptAll)).unwrap_err();
    assert!(matches!(err, WorkspaceError::Ontology(OntologyError::Json(_))));
}

#[test]
fn test_document_of_another_schema_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let document = dir.path().join("menu.json");
    fs::write(
        &document,
        r#"{
  "iri": "http://example.org/menu",
  "axioms": [
    { "axiom": "subClassOf",
      "sub": { "type": "named", "iri": "http://example.org/menu/content#Soup" },
      "sup": { "type": "named", "iri": "http://example.org/menu/schema#Dish" } },
    { "axiom": "subClassOf",
      "sub": { "type": "named", "iri": "http://example.org/menu/content#Soup" },
      "sup": { "type": "named", "iri": "http://example.org/menu/schema#Ingredient" } }
  ]
}"#,
    )
    .unwrap();
    let err = Workspace::open(&config, &document, Box::new(AcceptAll)).unwrap_err();
    assert!(matches!(err, WorkspaceError::Load(_)));
}
