//! The loader rejects documents that do not follow the encoding, with a
//! single error and without touching the target model.

mod common;

use common::{constraints, content, empty_model, menu, schema, tree};
use taxo_compiler::{ContentLoader, ContentRenderer, LoadError};
use taxo_model::{EventLog, LinkSide, ModelError};
use taxo_ontology::{all, intersection_of, named, some, union_of, AxiomStore, OntologyAccess};

fn rendered() -> AxiomStore {
    let m = menu();
    let mut store = AxiomStore::new("http://example.org/menu");
    ContentRenderer::render(&m.model, &mut store).unwrap();
    store
}

/// Adds a well-formed definition class for `source` allowing `targets`.
fn define(store: &mut AxiomStore, name: &str, source: &str, targets: &[&str]) -> String {
    let d = content(name);
    store.declare_class(&d);
    store.add_subclass_axiom(named(&d), named(schema("DishConstraint")));
    store.add_equivalence_axiom(
        named(&d),
        intersection_of([
            named(schema("DishConstraint")),
            some(schema("hasDish"), named(content(source))),
        ]),
    );
    store.add_subclass_axiom(
        named(&d),
        all(
            schema("hasIngredient"),
            union_of(targets.iter().map(|t| named(content(t)))),
        ),
    );
    d
}

fn load_error(store: &AxiomStore) -> LoadError {
    let mut model = empty_model();
    ContentLoader::load_into(&mut model, store).unwrap_err().cause
}

// ============================================================================
// Concept hierarchy
// ============================================================================

#[test]
fn test_class_under_two_parents_is_rejected() {
    let mut store = rendered();
    store.add_subclass_axiom(named(content("Wheat")), named(content("Egg")));
    match load_error(&store) {
        LoadError::MultipleParents { class, .. } => assert_eq!(class, content("Wheat")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_class_in_two_hierarchies_is_rejected() {
    let mut store = rendered();
    store.add_subclass_axiom(named(content("Soup")), named(schema("Ingredient")));
    assert!(matches!(
        load_error(&store),
        LoadError::MultipleParents { class, .. } if class == content("Soup")
    ));
}

// ============================================================================
// Definition classes
// ============================================================================

#[test]
fn test_two_equivalence_axioms_are_rejected() {
    let mut store = rendered();
    let d = define(&mut store, "Extra", "Soup", &["Egg"]);
    store.add_equivalence_axiom(
        named(&d),
        intersection_of([
            named(schema("DishConstraint")),
            some(schema("hasDish"), named(content("Lasagne"))),
        ]),
    );
    assert!(matches!(
        load_error(&store),
        LoadError::MalformedConstraintAxioms { class, .. } if class == d
    ));
}

#[test]
fn test_missing_target_restriction_is_rejected() {
    let mut store = rendered();
    let d = content("NoTargets");
    store.declare_class(&d);
    store.add_subclass_axiom(named(&d), named(schema("DishConstraint")));
    store.add_equivalence_axiom(
        named(&d),
        intersection_of([
            named(schema("DishConstraint")),
            some(schema("hasDish"), named(content("Soup"))),
        ]),
    );
    match load_error(&store) {
        LoadError::MalformedConstraintAxioms { class, reason } => {
            assert_eq!(class, d);
            assert!(reason.contains("found 0"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_anonymous_source_value_is_rejected() {
    let mut store = rendered();
    let d = content("Anonymous");
    store.add_subclass_axiom(named(&d), named(schema("DishConstraint")));
    store.add_equivalence_axiom(
        named(&d),
        intersection_of([
            named(schema("DishConstraint")),
            some(
                schema("hasDish"),
                union_of([named(content("Soup")), named(content("Lasagne"))]),
            ),
        ]),
    );
    store.add_subclass_axiom(named(&d), all(schema("hasIngredient"), named(content("Egg"))));
    assert!(matches!(
        load_error(&store),
        LoadError::MalformedConstraintAxioms { .. }
    ));
}

#[test]
fn test_wrong_target_property_is_rejected() {
    let mut store = rendered();
    let d = content("WrongProperty");
    store.add_subclass_axiom(named(&d), named(schema("DishConstraint")));
    store.add_equivalence_axiom(
        named(&d),
        intersection_of([
            named(schema("DishConstraint")),
            some(schema("hasDish"), named(content("Soup"))),
        ]),
    );
    store.add_subclass_axiom(named(&d), all(schema("hasDish"), named(content("Egg"))));
    assert!(matches!(
        load_error(&store),
        LoadError::MalformedConstraintAxioms { .. }
    ));
}

#[test]
fn test_unknown_target_is_rejected() {
    let mut store = rendered();
    let d = define(&mut store, "Pizza", "Soup", &["Mozzarella"]);
    assert_eq!(
        load_error(&store),
        LoadError::UnknownConcept {
            class: content("Mozzarella"),
            definition: d,
        }
    );
}

#[test]
fn test_source_from_wrong_hierarchy_is_rejected() {
    let mut store = rendered();
    define(&mut store, "Backwards", "Egg", &["Wheat"]);
    assert!(matches!(
        load_error(&store),
        LoadError::Model(ModelError::TypeNotInHierarchy { .. })
    ));
}

#[test]
fn test_out_of_scope_target_is_rejected() {
    let mut store = rendered();
    define(&mut store, "DishInDish", "Soup", &["Lasagne"]);
    assert!(matches!(
        load_error(&store),
        LoadError::Model(ModelError::OutOfScopeValue {
            side: LinkSide::Target,
            ..
        })
    ));
}

#[test]
fn test_redundant_targets_are_rejected() {
    let mut store = rendered();
    define(&mut store, "Redundant", "Soup", &["Grain", "Wheat"]);
    assert!(matches!(
        load_error(&store),
        LoadError::Model(ModelError::RedundantTargetValues { .. })
    ));
}

#[test]
fn test_second_constraint_for_one_source_is_rejected() {
    let mut store = rendered();
    define(&mut store, "Again", "Pasta", &["Wheat"]);
    assert!(matches!(
        load_error(&store),
        LoadError::MalformedConstraintAxioms { .. }
    ));
}

#[test]
fn test_definition_without_equivalence_is_skipped() {
    let mut store = rendered();
    let d = content("Loose");
    store.add_subclass_axiom(named(&d), named(schema("DishConstraint")));

    let mut model = empty_model();
    let summary = ContentLoader::load_into(&mut model, &store).unwrap();
    assert_eq!(summary.constraints, 2);
}

#[test]
fn test_equivalence_of_another_shape_is_skipped() {
    let mut store = rendered();
    let d = content("SeasonalDish");
    store.add_subclass_axiom(named(&d), named(schema("DishConstraint")));
    store.add_equivalence_axiom(
        named(&d),
        intersection_of([named(schema("DishConstraint")), named(schema("Seasonal"))]),
    );

    let mut model = empty_model();
    let summary = ContentLoader::load_into(&mut model, &store).unwrap();
    assert_eq!(summary.constraints, 2);
    assert!(model.find_concept(&d).is_none());
}

#[test]
fn test_other_equivalences_do_not_hide_the_source_equivalence() {
    let mut store = rendered();
    let d = define(&mut store, "SoupRule", "Soup", &["Egg"]);
    store.add_equivalence_axiom(
        named(&d),
        intersection_of([named(schema("DishConstraint")), named(schema("Seasonal"))]),
    );

    let mut model = empty_model();
    let summary = ContentLoader::load_into(&mut model, &store).unwrap();
    assert_eq!(summary.constraints, 3);
    let soup = model.find_by_label("Soup").unwrap();
    let ty = model.constraint_types()[0].id();
    assert!(model.own_constraint(soup, ty).is_some());
}

// ============================================================================
// Isolation
// ============================================================================

#[test]
fn test_failed_load_leaves_model_untouched() {
    let mut store = rendered();
    store.add_subclass_axiom(named(content("Wheat")), named(content("Egg")));

    let mut m = menu();
    let pasta = m.model.find_by_label("Pasta").unwrap();
    m.model.add_child(pasta, "Penne").unwrap();
    let log = EventLog::new();
    m.model.add_listener(Box::new(log.clone()));
    let tree_before = tree(&m.model);
    let constraints_before = constraints(&m.model);

    let err = ContentLoader::load_into(&mut m.model, &store).unwrap_err();
    assert!(err.to_string().contains(&content("Wheat")));
    assert_eq!(tree(&m.model), tree_before);
    assert_eq!(constraints(&m.model), constraints_before);
    assert!(m.model.is_dirty());
    assert!(log.events().is_empty());
}
