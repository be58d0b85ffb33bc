//! Axiom vocabulary.
//!
//! The subset of OWL 2 the taxonomy encoding needs: named classes, existential
//! and universal restrictions, unions and intersections, plus declaration,
//! subclass, equivalence and label axioms. Entities are referred to by
//! absolute IRI.

use serde::{Deserialize, Serialize};

/// A class expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClassExpression {
    /// A named class.
    Named {
        /// IRI of the class.
        iri: String,
    },
    /// `∃property.filler`
    SomeValuesFrom {
        /// IRI of the object property.
        property: String,
        /// Restriction filler.
        filler: Box<ClassExpression>,
    },
    /// `∀property.filler`
    AllValuesFrom {
        /// IRI of the object property.
        property: String,
        /// Restriction filler.
        filler: Box<ClassExpression>,
    },
    /// `A ⊔ B ⊔ …`
    UnionOf {
        /// Union members.
        operands: Vec<ClassExpression>,
    },
    /// `A ⊓ B ⊓ …`
    IntersectionOf {
        /// Intersection members.
        operands: Vec<ClassExpression>,
    },
}

impl ClassExpression {
    /// Returns the IRI if this is a named class.
    #[must_use]
    pub fn as_named(&self) -> Option<&str> {
        match self {
            ClassExpression::Named { iri } => Some(iri),
            _ => None,
        }
    }

    /// Returns true if this expression mentions the class `iri` anywhere.
    #[must_use]
    pub fn mentions(&self, iri: &str) -> bool {
        match self {
            ClassExpression::Named { iri: own } => own == iri,
            ClassExpression::SomeValuesFrom { filler, .. }
            | ClassExpression::AllValuesFrom { filler, .. } => filler.mentions(iri),
            ClassExpression::UnionOf { operands } | ClassExpression::IntersectionOf { operands } => {
                operands.iter().any(|o| o.mentions(iri))
            }
        }
    }
}

impl std::fmt::Display for ClassExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn join(
            f: &mut std::fmt::Formatter<'_>,
            operands: &[ClassExpression],
            sep: &str,
        ) -> std::fmt::Result {
            write!(f, "(")?;
            for (i, o) in operands.iter().enumerate() {
                if i > 0 {
                    write!(f, " {sep} ")?;
                }
                write!(f, "{o}")?;
            }
            write!(f, ")")
        }
        match self {
            ClassExpression::Named { iri } => write!(f, "<{iri}>"),
            ClassExpression::SomeValuesFrom { property, filler } => {
                write!(f, "some <{property}> {filler}")
            }
            ClassExpression::AllValuesFrom { property, filler } => {
                write!(f, "only <{property}> {filler}")
            }
            ClassExpression::UnionOf { operands } => join(f, operands, "or"),
            ClassExpression::IntersectionOf { operands } => join(f, operands, "and"),
        }
    }
}

/// A named class expression.
#[must_use]
pub fn named(iri: impl Into<String>) -> ClassExpression {
    ClassExpression::Named { iri: iri.into() }
}

/// `∃property.filler`
#[must_use]
pub fn some(property: impl Into<String>, filler: ClassExpression) -> ClassExpression {
    ClassExpression::SomeValuesFrom {
        property: property.into(),
        filler: Box::new(filler),
    }
}

/// `∀property.filler`
#[must_use]
pub fn all(property: impl Into<String>, filler: ClassExpression) -> ClassExpression {
    ClassExpression::AllValuesFrom {
        property: property.into(),
        filler: Box::new(filler),
    }
}

/// The union of `operands`. A single operand is returned as is.
#[must_use]
pub fn union_of(operands: impl IntoIterator<Item = ClassExpression>) -> ClassExpression {
    let mut operands: Vec<_> = operands.into_iter().collect();
    if operands.len() == 1 {
        if let Some(only) = operands.pop() {
            return only;
        }
    }
    ClassExpression::UnionOf { operands }
}

/// The intersection of `operands`. A single operand is returned as is.
#[must_use]
pub fn intersection_of(operands: impl IntoIterator<Item = ClassExpression>) -> ClassExpression {
    let mut operands: Vec<_> = operands.into_iter().collect();
    if operands.len() == 1 {
        if let Some(only) = operands.pop() {
            return only;
        }
    }
    ClassExpression::IntersectionOf { operands }
}

/// An axiom of the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "axiom", rename_all = "camelCase")]
pub enum Axiom {
    /// `Declaration(Class(iri))`
    DeclareClass {
        /// IRI of the class.
        iri: String,
    },
    /// `Declaration(ObjectProperty(iri))`
    DeclareObjectProperty {
        /// IRI of the property.
        iri: String,
    },
    /// `AnnotationAssertion(rdfs:label subject "value")`
    Label {
        /// IRI of the labelled entity.
        subject: String,
        /// The label text.
        value: String,
    },
    /// `SubClassOf(sub sup)`
    SubClassOf {
        /// The subclass expression.
        sub: ClassExpression,
        /// The superclass expression.
        sup: ClassExpression,
    },
    /// `EquivalentClasses(operands…)`
    EquivalentClasses {
        /// The equivalent expressions.
        operands: Vec<ClassExpression>,
    },
}

impl Axiom {
    /// Returns true if the axiom mentions the entity `iri` in any position.
    #[must_use]
    pub fn mentions(&self, iri: &str) -> bool {
        match self {
            Axiom::DeclareClass { iri: own } | Axiom::DeclareObjectProperty { iri: own } => {
                own == iri
            }
            Axiom::Label { subject, .. } => subject == iri,
            Axiom::SubClassOf { sub, sup } => sub.mentions(iri) || sup.mentions(iri),
            Axiom::EquivalentClasses { operands } => operands.iter().any(|o| o.mentions(iri)),
        }
    }
}

/// Well-known vocabulary IRIs used by the exports.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// `owl:Ontology`
    pub const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
    /// `owl:Class`
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    /// `owl:ObjectProperty`
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    /// `owl:Restriction`
    pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
    /// `owl:onProperty`
    pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
    /// `owl:someValuesFrom`
    pub const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";
    /// `owl:allValuesFrom`
    pub const OWL_ALL_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#allValuesFrom";
    /// `owl:unionOf`
    pub const OWL_UNION_OF: &str = "http://www.w3.org/2002/07/owl#unionOf";
    /// `owl:intersectionOf`
    pub const OWL_INTERSECTION_OF: &str = "http://www.w3.org/2002/07/owl#intersectionOf";
    /// `owl:equivalentClass`
    pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
    /// `owl:Thing`
    pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    /// `rdf:type`
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:first`
    pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    /// `rdf:rest`
    pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    /// `rdf:nil`
    pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    /// `rdfs:label`
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:subClassOf`
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `xsd:string`
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}
