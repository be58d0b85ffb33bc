//! Shared menu fixture for integration tests.

#![allow(dead_code)]

use taxo_model::{AcceptAll, ConceptId, ConstraintTypeId, Model, SchemaConfig};

pub const SCHEMA: &str = "http://example.org/menu/schema#";
pub const CONTENT: &str = "http://example.org/menu/content#";

pub const MENU: &str = r#"
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

pub fn config() -> SchemaConfig {
    SchemaConfig::from_toml_str(MENU).unwrap()
}

pub fn empty_model() -> Model {
    Model::from_config(&config(), Box::new(AcceptAll)).unwrap()
}

pub fn schema(name: &str) -> String {
    format!("{SCHEMA}{name}")
}

pub fn content(name: &str) -> String {
    format!("{CONTENT}{name}")
}

pub struct Menu {
    pub model: Model,
    pub ty: ConstraintTypeId,
    pub dish: ConceptId,
    pub ingredient: ConceptId,
}

/// Dish > Pasta > {Lasagne, Carbonara}, Dish > Soup;
/// Ingredient > Grain > Wheat, Ingredient > {Egg, Cream Cheese}.
/// Pasta allows Grain and Egg, Carbonara allows Wheat and Egg.
pub fn menu() -> Menu {
    let mut model = empty_model();
    let dish = model.hierarchies()[0].root();
    let ingredient = model.hierarchies()[1].root();
    let ty = model.constraint_types()[0].id();

    let pasta = model.add_child(dish, "Pasta").unwrap();
    model.add_child(pasta, "Lasagne").unwrap();
    let carbonara = model.add_child(pasta, "Carbonara").unwrap();
    model.add_child(dish, "Soup").unwrap();
    let grain = model.add_child(ingredient, "Grain").unwrap();
    let wheat = model.add_child(grain, "Wheat").unwrap();
    let egg = model.add_child(ingredient, "Egg").unwrap();
    model.add_child(ingredient, "Cream Cheese").unwrap();

    model.add_constraint(pasta, ty, [grain, egg]).unwrap();
    model.add_constraint(carbonara, ty, [wheat, egg]).unwrap();
    model.mark_clean();

    Menu {
        model,
        ty,
        dish,
        ingredient,
    }
}

/// Tree as `(label, parent label)` pairs, sorted.
pub fn tree(model: &Model) -> Vec<(String, String)> {
    let mut pairs: Vec<_> = model
        .concepts()
        .iter()
        .filter_map(|(_, c)| {
            let parent = model.concept(c.parent()?).ok()?;
            Some((
                c.identity().label().to_owned(),
                parent.identity().label().to_owned(),
            ))
        })
        .collect();
    pairs.sort();
    pairs
}

/// Constraints as `(focus, source label, sorted target labels)`, sorted.
pub fn constraints(model: &Model) -> Vec<(String, String, Vec<String>)> {
    let mut out: Vec<_> = model
        .constraints()
        .map(|(_, k)| {
            let focus = model
                .constraint_type(k.constraint_type())
                .unwrap()
                .focus()
                .label()
                .to_owned();
            let source = model.concept(k.source()).unwrap().identity().label().to_owned();
            let mut targets: Vec<_> = k
                .targets()
                .iter()
                .map(|&t| model.concept(t).unwrap().identity().label().to_owned())
                .collect();
            targets.sort();
            (focus, source, targets)
        })
        .collect();
    out.sort();
    out
}
