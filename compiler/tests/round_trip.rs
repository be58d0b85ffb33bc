//! Render / load round-trip integration tests.

mod common;

use common::{constraints, content, empty_model, menu, schema, tree};
use taxo_compiler::{check_model, ContentLoader, ContentRenderer, RenderError};
use taxo_model::{EventLog, Model, ModelError, ModelEvent};
use taxo_ontology::{AxiomStore, OntologyAccess};

fn rendered() -> AxiomStore {
    let m = menu();
    let mut store = AxiomStore::new("http://example.org/menu");
    ContentRenderer::render(&m.model, &mut store).unwrap();
    store
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_load_of_render_reproduces_model() {
    let original = menu();
    let store = rendered();

    let mut loaded = empty_model();
    let summary = ContentLoader::load_into(&mut loaded, &store).unwrap();
    assert_eq!(summary.concepts, 8);
    assert_eq!(summary.constraints, 2);

    assert_eq!(tree(&loaded), tree(&original.model));
    assert_eq!(constraints(&loaded), constraints(&original.model));
    assert!(check_model(&loaded).all_passed());
}

#[test]
fn test_labels_survive_name_encoding() {
    let store = rendered();
    assert!(store.class_exists(&content("Cream_Cheese")));
    assert_eq!(
        store.label_of(&content("Cream_Cheese")).as_deref(),
        Some("Cream Cheese")
    );

    let mut loaded = empty_model();
    ContentLoader::load_into(&mut loaded, &store).unwrap();
    let cheese = loaded.find_concept(&content("Cream_Cheese")).unwrap();
    assert_eq!(
        loaded.concept(cheese).unwrap().identity().label(),
        "Cream Cheese"
    );
}

#[test]
fn test_rendering_twice_gives_the_same_document() {
    let m = menu();
    let mut store = AxiomStore::new("http://example.org/menu");
    ContentRenderer::render(&m.model, &mut store).unwrap();
    let first = store.document().clone();
    let summary = ContentRenderer::render(&m.model, &mut store).unwrap();
    assert!(summary.removed_axioms > 0);
    assert_eq!(store.document(), &first);
}

/// Renders `model` into a fresh document and loads it back.
fn reloaded(model: &Model) -> Model {
    let mut store = AxiomStore::new("http://example.org/menu");
    ContentRenderer::render(model, &mut store).unwrap();
    let mut loaded = empty_model();
    ContentLoader::load_into(&mut loaded, &store).unwrap();
    loaded
}

fn assert_round_trips(model: &Model) {
    assert!(check_model(model).all_passed());
    let loaded = reloaded(model);
    assert_eq!(tree(&loaded), tree(model));
    assert_eq!(constraints(&loaded), constraints(model));
}

// ============================================================================
// Round trip after edits
// ============================================================================

#[test]
fn test_round_trip_after_move_in_source_hierarchy() {
    let mut m = menu();
    let lasagne = m.model.find_by_label("Lasagne").unwrap();
    let soup = m.model.find_by_label("Soup").unwrap();
    let carbonara = m.model.find_by_label("Carbonara").unwrap();
    assert!(m.model.move_concept(lasagne, soup).unwrap());
    assert!(m.model.move_concept(carbonara, m.dish).unwrap());
    assert_round_trips(&m.model);
}

#[test]
fn test_round_trip_after_move_in_target_hierarchy() {
    let mut m = menu();
    let wheat = m.model.find_by_label("Wheat").unwrap();
    let egg = m.model.find_by_label("Egg").unwrap();
    let cheese = m.model.find_by_label("Cream Cheese").unwrap();
    assert!(m.model.move_concept(wheat, m.ingredient).unwrap());
    assert!(m.model.move_concept(cheese, egg).unwrap());
    assert_round_trips(&m.model);

    let loaded = reloaded(&m.model);
    let wheat = loaded.find_by_label("Wheat").unwrap();
    assert_eq!(loaded.concepts().parent(wheat), Some(loaded.hierarchies()[1].root()));
}

#[test]
fn test_target_nesting_move_is_rejected_and_document_stays_loadable() {
    let mut m = menu();
    let egg = m.model.find_by_label("Egg").unwrap();
    let grain = m.model.find_by_label("Grain").unwrap();
    let before = tree(&m.model);

    assert_eq!(
        m.model.move_concept(egg, grain),
        Err(ModelError::RedundantTargetValues {
            ancestor: "Grain".into(),
            descendant: "Egg".into(),
        })
    );
    assert_eq!(tree(&m.model), before);
    assert_round_trips(&m.model);
}

#[test]
fn test_round_trip_after_rename() {
    let mut m = menu();
    let egg = m.model.find_by_label("Egg").unwrap();
    let pasta = m.model.find_by_label("Pasta").unwrap();
    assert!(m.model.rename(egg, "Free Range Egg").unwrap());
    assert!(m.model.rename(pasta, "Fresh Pasta").unwrap());
    assert_round_trips(&m.model);

    let loaded = reloaded(&m.model);
    assert!(loaded.find_concept(&content("Free_Range_Egg")).is_some());
    assert!(loaded.find_concept(&content("Egg")).is_none());
}

#[test]
fn test_round_trip_after_remove() {
    let mut m = menu();
    let grain = m.model.find_by_label("Grain").unwrap();
    m.model.remove(grain).unwrap();
    assert_round_trips(&m.model);

    let loaded = reloaded(&m.model);
    assert_eq!(loaded.concepts().len(), 8);
    let egg = vec!["Egg".to_owned()];
    let pruned: Vec<_> = constraints(&loaded)
        .into_iter()
        .filter(|(_, source, _)| source == "Pasta" || source == "Carbonara")
        .collect();
    assert_eq!(
        pruned,
        vec![
            ("DishConstraint".to_owned(), "Carbonara".to_owned(), egg.clone()),
            ("DishConstraint".to_owned(), "Pasta".to_owned(), egg),
        ]
    );
}

#[test]
fn test_round_trip_after_mixed_edits() {
    let mut m = menu();
    let soup = m.model.find_by_label("Soup").unwrap();
    let egg = m.model.find_by_label("Egg").unwrap();
    let cheese = m.model.find_by_label("Cream Cheese").unwrap();
    let minestrone = m.model.add_child(soup, "Minestrone").unwrap();
    m.model.add_constraint(soup, m.ty, [egg, cheese]).unwrap();
    m.model.rename(cheese, "Ricotta").unwrap();
    let lasagne = m.model.find_by_label("Lasagne").unwrap();
    m.model.move_concept(lasagne, minestrone).unwrap();
    m.model.remove(egg).unwrap();
    assert_round_trips(&m.model);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_definition_classes_are_numbered_per_focus() {
    let store = rendered();
    for name in [
        "DishConstraint-Constraint-1--Dish-to-Ingredient",
        "DishConstraint-Constraint-2--Pasta-to-Egg-Grain",
        "DishConstraint-Constraint-3--Carbonara-to-Egg-Wheat",
    ] {
        assert!(store.class_exists(&content(name)), "missing {name}");
    }
    assert_eq!(store.subclasses(&schema("DishConstraint"), true).len(), 3);
}

#[test]
fn test_schema_entities_are_declared_with_labels() {
    let store = rendered();
    assert!(store.class_exists(&schema("Dish")));
    assert!(store.class_exists(&schema("DishConstraint")));
    assert_eq!(store.label_of(&schema("hasIngredient")).as_deref(), Some("hasIngredient"));
    assert_eq!(
        store.subclasses(&schema("Dish"), true),
        vec![content("Pasta"), content("Soup")]
    );
}

#[test]
fn test_render_drops_removed_concepts() {
    let mut m = menu();
    let mut store = AxiomStore::new("http://example.org/menu");
    ContentRenderer::render(&m.model, &mut store).unwrap();

    let egg = m.model.find_by_label("Egg").unwrap();
    m.model.remove(egg).unwrap();
    ContentRenderer::render(&m.model, &mut store).unwrap();

    assert!(!store.class_exists(&content("Egg")));
    assert!(!store.class_exists(&content(
        "DishConstraint-Constraint-2--Pasta-to-Egg-Grain"
    )));
    assert!(store.class_exists(&content("DishConstraint-Constraint-2--Pasta-to-Grain")));
    assert!(store.axioms().iter().all(|a| !a.mentions(&content("Egg"))));
}

#[test]
fn test_identifier_collision_leaves_document_untouched() {
    let mut m = menu();
    m.model
        .add_child(m.dish, "DishConstraint-Constraint-1--Dish-to-Ingredient")
        .unwrap();
    let mut store = rendered();
    let before = store.document().clone();

    let err = ContentRenderer::render(&m.model, &mut store).unwrap_err();
    assert_eq!(
        err,
        RenderError::IdentifierCollision(content(
            "DishConstraint-Constraint-1--Dish-to-Ingredient"
        ))
    );
    assert_eq!(store.document(), &before);
}

// ============================================================================
// Loading into a live model
// ============================================================================

#[test]
fn test_load_keeps_listeners_and_clears_dirty_flag() {
    let store = rendered();
    let mut target = empty_model();
    let log = EventLog::new();
    target.add_listener(Box::new(log.clone()));
    let dish = target.hierarchies()[0].root();
    target.add_child(dish, "Stale").unwrap();
    log.take();

    ContentLoader::load_into(&mut target, &store).unwrap();
    assert!(!target.is_dirty());
    assert!(target.find_by_label("Stale").is_none());
    assert!(log.events().is_empty());

    let pasta = target.find_by_label("Pasta").unwrap();
    target.add_child(pasta, "Penne").unwrap();
    assert!(log.events().contains(&ModelEvent::ModelUpdated));
}

#[test]
fn test_loaded_model_inherits_constraints() {
    let store = rendered();
    let mut loaded = empty_model();
    ContentLoader::load_into(&mut loaded, &store).unwrap();
    let ty = loaded.constraint_types()[0].id();
    let lasagne = loaded.find_by_label("Lasagne").unwrap();
    let pasta = loaded.find_by_label("Pasta").unwrap();
    let governing = loaded.closest_constraint(lasagne, ty).unwrap();
    assert_eq!(loaded.constraint(governing).unwrap().source(), pasta);
}
