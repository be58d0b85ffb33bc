//! Model to axioms.
//!
//! Rewrites the content part of an axiom document from a model. Everything
//! beneath the hierarchy roots and the focus concepts is removed first, then
//! the schema entities, the concept tree and one definition class per
//! constraint are written afresh.
//!
//! Definition classes are named
//! `<focus>-Constraint-<n>--<source>-to-<target>[-<target>…]` in the content
//! namespace, numbered per focus concept from 1 on every render. The names
//! are therefore not stable across renders.

use std::collections::HashMap;

use taxo_model::{ConceptId, Constraint, Identifier, Model, ModelError};
use taxo_ontology::{all, intersection_of, named, some, union_of, OntologyAccess};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while rendering a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A synthesized definition-class name is already taken in the document.
    #[error("definition class <{0}> already exists in the document")]
    IdentifierCollision(String),

    /// The model handed out a dangling handle or an invalid name.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Counts reported after a successful render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Axioms removed from the previous content.
    pub removed_axioms: usize,
    /// Content concepts written (roots excluded).
    pub concepts: usize,
    /// Definition classes written, one per constraint.
    pub definitions: usize,
}

/// Writes models into axiom documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentRenderer;

impl ContentRenderer {
    /// Rewrites the content of `ontology` from `model`.
    ///
    /// Rendering works on a copy of the document; `ontology` is replaced
    /// only if rendering succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::IdentifierCollision`] if a definition-class
    /// name is already used in the document, and [`RenderError::Model`] if
    /// the model is internally inconsistent.
    pub fn render<O: OntologyAccess + Clone>(
        model: &Model,
        ontology: &mut O,
    ) -> Result<RenderSummary, RenderError> {
        let mut scratch = ontology.clone();
        let mut summary = RenderSummary::default();

        summary.removed_axioms = clear_content(model, &mut scratch)?;
        declare_schema(model, &mut scratch)?;
        summary.concepts = declare_tree(model, &mut scratch)?;
        summary.definitions = declare_constraints(model, &mut scratch)?;

        *ontology = scratch;
        info!(
            removed = summary.removed_axioms,
            concepts = summary.concepts,
            definitions = summary.definitions,
            "rendered model"
        );
        Ok(summary)
    }
}

fn identity(model: &Model, id: ConceptId) -> Result<&Identifier, ModelError> {
    model.concept(id).map(|c| c.identity())
}

fn clear_content<O: OntologyAccess>(model: &Model, ontology: &mut O) -> Result<usize, ModelError> {
    let mut anchors = Vec::new();
    for h in model.hierarchies() {
        anchors.push(identity(model, h.root())?.uri().to_owned());
    }
    for t in model.constraint_types() {
        anchors.push(t.focus().uri().to_owned());
    }

    let mut stale: Vec<String> = Vec::new();
    for anchor in &anchors {
        for class in ontology.subclasses(anchor, false) {
            if !anchors.contains(&class) && !stale.contains(&class) {
                stale.push(class);
            }
        }
    }
    let removed = stale.iter().map(|class| ontology.remove_class(class)).sum();
    debug!(classes = stale.len(), axioms = removed, "cleared previous content");
    Ok(removed)
}

fn declare_schema<O: OntologyAccess>(model: &Model, ontology: &mut O) -> Result<(), ModelError> {
    for h in model.hierarchies() {
        let root = identity(model, h.root())?;
        ontology.declare_class(root.uri());
        ontology.add_label(root.uri(), root.label());
    }
    for t in model.constraint_types() {
        ontology.declare_class(t.focus().uri());
        ontology.add_label(t.focus().uri(), t.focus().label());
        for property in [t.source_link().property(), t.target_link().property()] {
            ontology.declare_object_property(property.uri());
            ontology.add_label(property.uri(), property.label());
        }
    }
    Ok(())
}

fn declare_tree<O: OntologyAccess>(model: &Model, ontology: &mut O) -> Result<usize, ModelError> {
    let mut count = 0;
    for h in model.hierarchies() {
        for id in model.concepts().subtree(h.root()) {
            let concept = model.concept(id)?;
            let Some(parent) = concept.parent() else {
                continue;
            };
            let own = concept.identity();
            ontology.declare_class(own.uri());
            ontology.add_label(own.uri(), own.label());
            ontology.add_subclass_axiom(named(own.uri()), named(identity(model, parent)?.uri()));
            count += 1;
        }
    }
    Ok(count)
}

fn declare_constraints<O: OntologyAccess>(
    model: &Model,
    ontology: &mut O,
) -> Result<usize, RenderError> {
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut count = 0;

    for h in model.hierarchies() {
        for id in model.concepts().subtree(h.root()) {
            let mut outward: Vec<&Constraint> = model
                .concept(id)?
                .outward_constraints()
                .iter()
                .map(|&k| model.constraint(k))
                .collect::<Result<_, _>>()?;
            outward.sort_by_key(|k| k.constraint_type());

            for constraint in outward {
                declare_definition(model, ontology, &mut counters, constraint)?;
                count += 1;
            }
        }
    }
    Ok(count)
}

fn declare_definition<O: OntologyAccess>(
    model: &Model,
    ontology: &mut O,
    counters: &mut HashMap<String, usize>,
    constraint: &Constraint,
) -> Result<(), RenderError> {
    let ty = model.constraint_type(constraint.constraint_type())?;
    let source = identity(model, constraint.source())?;
    let mut targets = constraint
        .targets()
        .iter()
        .map(|&t| identity(model, t))
        .collect::<Result<Vec<_>, _>>()?;
    targets.sort_by(|a, b| a.label().cmp(b.label()));

    let focus = ty.focus().label();
    let n = counters.entry(focus.to_owned()).or_insert(0);
    *n += 1;
    let name = format!(
        "{}-Constraint-{}--{}-to-{}",
        focus,
        n,
        source.label(),
        targets
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join("-")
    );
    let definition = model.namespaces().content_identifier(&name)?;
    if ontology.class_exists(definition.uri()) {
        return Err(RenderError::IdentifierCollision(definition.uri().to_owned()));
    }

    let d = definition.uri();
    ontology.declare_class(d);
    ontology.add_label(d, &name);
    ontology.add_subclass_axiom(named(d), named(ty.focus().uri()));
    ontology.add_equivalence_axiom(
        named(d),
        intersection_of([
            named(ty.focus().uri()),
            some(ty.source_link().property().uri(), named(source.uri())),
        ]),
    );
    ontology.add_subclass_axiom(
        named(d),
        all(
            ty.target_link().property().uri(),
            union_of(targets.iter().map(|t| named(t.uri()))),
        ),
    );
    debug!(definition = d, "rendered constraint");
    Ok(())
}
