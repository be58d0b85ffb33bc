//! Axioms to model.
//!
//! Rebuilds a model's content from an axiom document. The concept tree is
//! recovered from told subclass axioms under each hierarchy root. Each
//! constraint is recovered from a definition class `D` beneath a focus
//! concept, encoded as
//!
//! ```text
//! D ⊑ focus
//! D ≡ focus ⊓ ∃source-property.V
//! D ⊑ ∀target-property.(W₁ ⊔ … ⊔ Wₙ)
//! ```
//!
//! Loading happens on a scratch model built from the target's schema. The
//! target is only touched once the whole document has been read.

use std::collections::{HashMap, HashSet};

use taxo_model::{AcceptAll, ConceptId, ConstraintTypeId, Identifier, Model, ModelError};
use taxo_ontology::model::iris::OWL_THING;
use taxo_ontology::{ClassExpression, OntologyAccess};
use thiserror::Error;
use tracing::{debug, info};

/// A reason the document does not match the taxonomy encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// A class appears beneath two different parents.
    #[error("class <{class}> is declared under both <{first}> and <{second}>")]
    MultipleParents {
        /// IRI of the offending class.
        class: String,
        /// The parent it was first found under.
        first: String,
        /// The second parent.
        second: String,
    },

    /// A definition class does not have the expected axiom shape.
    #[error("malformed constraint axioms on <{class}>: {reason}")]
    MalformedConstraintAxioms {
        /// IRI of the definition class.
        class: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A constraint refers to a class that is not a loaded concept.
    #[error("class <{class}> referenced by <{definition}> is not a concept of the model")]
    UnknownConcept {
        /// IRI of the referenced class.
        class: String,
        /// IRI of the definition class referring to it.
        definition: String,
    },

    /// The model rejected a recovered concept or constraint.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// The document could not be loaded. The target model is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("content ontology does not match the taxonomy encoding: {cause}")]
pub struct BadContentOntology {
    /// What went wrong.
    #[source]
    pub cause: LoadError,
}

impl From<LoadError> for BadContentOntology {
    fn from(cause: LoadError) -> Self {
        Self { cause }
    }
}

/// Counts reported after a successful load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Content concepts created (roots excluded).
    pub concepts: usize,
    /// Constraints attached (root defaults excluded).
    pub constraints: usize,
}

/// Reads axiom documents into models.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentLoader;

impl ContentLoader {
    /// Replaces the content of `model` with the content read from
    /// `ontology`. Listeners and the conflict policy of `model` are kept and
    /// the model is clean afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`BadContentOntology`] wrapping the first problem found; the
    /// model is left exactly as it was.
    pub fn load_into<O: OntologyAccess + ?Sized>(
        model: &mut Model,
        ontology: &O,
    ) -> Result<LoadSummary, BadContentOntology> {
        let mut scratch = model
            .empty_like(Box::new(AcceptAll))
            .map_err(LoadError::from)?;
        let mut summary = LoadSummary::default();
        load_hierarchies(&mut scratch, ontology, &mut summary)?;
        load_constraints(&mut scratch, ontology, &mut summary)?;

        model.adopt_content(scratch);
        info!(
            concepts = summary.concepts,
            constraints = summary.constraints,
            "loaded content ontology"
        );
        Ok(summary)
    }
}

fn load_hierarchies<O: OntologyAccess + ?Sized>(
    model: &mut Model,
    ontology: &O,
    summary: &mut LoadSummary,
) -> Result<(), LoadError> {
    let roots: Vec<(ConceptId, String)> = model
        .hierarchies()
        .iter()
        .map(|h| {
            let root = h.root();
            model
                .concept(root)
                .map(|c| (root, c.identity().uri().to_owned()))
        })
        .collect::<Result<_, _>>()?;

    let mut parents: HashMap<String, String> = roots
        .iter()
        .map(|(_, iri)| (iri.clone(), OWL_THING.to_owned()))
        .collect();

    for (root, root_iri) in roots {
        let mut pending = vec![(root, root_iri)];
        while let Some((parent, parent_iri)) = pending.pop() {
            for class in ontology.subclasses(&parent_iri, true) {
                if let Some(first) = parents.get(&class) {
                    return Err(LoadError::MultipleParents {
                        class,
                        first: first.clone(),
                        second: parent_iri,
                    });
                }
                parents.insert(class.clone(), parent_iri.clone());

                let identity = match ontology.label_of(&class) {
                    Some(label) => Identifier::new(class.clone(), label),
                    None => Identifier::from_uri(class.clone()),
                };
                let child = model.add_child_with_identity(parent, identity)?;
                summary.concepts += 1;
                pending.push((child, class));
            }
        }
    }
    debug!(concepts = summary.concepts, "recovered concept hierarchies");
    Ok(())
}

struct TypeVocabulary {
    id: ConstraintTypeId,
    focus: String,
    source_property: String,
    target_property: String,
}

fn load_constraints<O: OntologyAccess + ?Sized>(
    model: &mut Model,
    ontology: &O,
    summary: &mut LoadSummary,
) -> Result<(), LoadError> {
    let types: Vec<TypeVocabulary> = model
        .constraint_types()
        .iter()
        .map(|t| TypeVocabulary {
            id: t.id(),
            focus: t.focus().uri().to_owned(),
            source_property: t.source_link().property().uri().to_owned(),
            target_property: t.target_link().property().uri().to_owned(),
        })
        .collect();

    let mut constrained: HashSet<(ConceptId, ConstraintTypeId)> = HashSet::new();
    for ty in &types {
        for definition in ontology.subclasses(&ty.focus, false) {
            let Some(source) = definition_source(ontology, ty, &definition)? else {
                continue;
            };
            let targets = definition_targets(ontology, ty, &definition)?;

            let source = concept(model, &source, &definition)?;
            let targets = targets
                .iter()
                .map(|t| concept(model, t, &definition))
                .collect::<Result<Vec<_>, _>>()?;

            if !constrained.insert((source, ty.id)) {
                return Err(malformed(
                    &definition,
                    "a second constraint of the same type for one source",
                ));
            }
            if model.add_constraint(source, ty.id, targets)? {
                summary.constraints += 1;
            }
        }
    }
    debug!(constraints = summary.constraints, "recovered constraints");
    Ok(())
}

/// The source value `V` of `D ≡ focus ⊓ ∃source-property.V`, or `None` if
/// `D` has no equivalence axiom of that shape. Equivalences of any other
/// shape do not make `D` a definition class.
fn definition_source<O: OntologyAccess + ?Sized>(
    ontology: &O,
    ty: &TypeVocabulary,
    definition: &str,
) -> Result<Option<String>, LoadError> {
    let equivalences = ontology.equivalence_axioms_of(definition);
    let fillers: Vec<&ClassExpression> = equivalences
        .iter()
        .filter_map(|operands| source_filler(ty, operands))
        .collect();
    match fillers.as_slice() {
        [] => Ok(None),
        [filler] => match filler.as_named() {
            Some(iri) => Ok(Some(iri.to_owned())),
            None => Err(malformed(definition, "source value is not a named class")),
        },
        _ => Err(malformed(
            definition,
            "more than one source equivalence axiom",
        )),
    }
}

/// The filler of `∃source-property.F` when `equivalence` is exactly
/// `focus ⊓ ∃source-property.F`, in either order.
fn source_filler<'e>(
    ty: &TypeVocabulary,
    equivalence: &'e [ClassExpression],
) -> Option<&'e ClassExpression> {
    let [ClassExpression::IntersectionOf { operands }] = equivalence else {
        return None;
    };
    let [first, second] = operands.as_slice() else {
        return None;
    };
    let (focus, restriction) = if first.as_named().is_some() {
        (first, second)
    } else {
        (second, first)
    };
    match (focus, restriction) {
        (
            ClassExpression::Named { iri },
            ClassExpression::SomeValuesFrom { property, filler },
        ) if *iri == ty.focus && *property == ty.source_property => Some(&**filler),
        _ => None,
    }
}

/// The target values `W₁ … Wₙ` of `D ⊑ ∀target-property.(W₁ ⊔ … ⊔ Wₙ)`.
fn definition_targets<O: OntologyAccess + ?Sized>(
    ontology: &O,
    ty: &TypeVocabulary,
    definition: &str,
) -> Result<Vec<String>, LoadError> {
    let restrictions: Vec<ClassExpression> = ontology
        .subclass_axioms_of(definition)
        .into_iter()
        .filter(|sup| !matches!(sup.as_named(), Some(iri) if iri == ty.focus || iri == OWL_THING))
        .collect();
    let [restriction] = restrictions.as_slice() else {
        return Err(malformed(
            definition,
            &format!(
                "expected one target restriction, found {}",
                restrictions.len()
            ),
        ));
    };

    let filler = match restriction {
        ClassExpression::AllValuesFrom { property, filler } if *property == ty.target_property => {
            filler
        }
        other => {
            return Err(malformed(
                definition,
                &format!("unexpected superclass {other}"),
            ))
        }
    };
    match &**filler {
        ClassExpression::Named { iri } => Ok(vec![iri.clone()]),
        ClassExpression::UnionOf { operands } => operands
            .iter()
            .map(|o| {
                o.as_named()
                    .map(str::to_owned)
                    .ok_or_else(|| malformed(definition, "target value is not a named class"))
            })
            .collect(),
        _ => Err(malformed(
            definition,
            "target values are neither a named class nor a union of named classes",
        )),
    }
}

fn concept(model: &Model, iri: &str, definition: &str) -> Result<ConceptId, LoadError> {
    model
        .find_concept(iri)
        .ok_or_else(|| LoadError::UnknownConcept {
            class: iri.to_owned(),
            definition: definition.to_owned(),
        })
}

fn malformed(definition: &str, reason: &str) -> LoadError {
    LoadError::MalformedConstraintAxioms {
        class: definition.to_owned(),
        reason: reason.to_owned(),
    }
}
