//! The in-memory axiom store and the access trait the compiler works
//! against.
//!
//! Axioms are kept in insertion order and deduplicated on insertion.
//! Subsumption queries answer from told axioms only: a named class `D` is a
//! direct subclass of `C` if the document states `SubClassOf(D, C)`, or if
//! `D` is equivalent to an intersection with `C` as a named conjunct.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OntologyError;
use crate::model::{Axiom, ClassExpression};

/// Read and write access to an axiom document.
pub trait OntologyAccess {
    /// Declares a class.
    fn declare_class(&mut self, iri: &str);

    /// Declares an object property.
    fn declare_object_property(&mut self, iri: &str);

    /// Attaches an `rdfs:label` to an entity.
    fn add_label(&mut self, iri: &str, label: &str);

    /// Adds `SubClassOf(sub, sup)`.
    fn add_subclass_axiom(&mut self, sub: ClassExpression, sup: ClassExpression);

    /// Adds `EquivalentClasses(first, second)`.
    fn add_equivalence_axiom(&mut self, first: ClassExpression, second: ClassExpression);

    /// Removes the class together with every axiom that mentions it.
    /// Returns the number of axioms removed.
    fn remove_class(&mut self, iri: &str) -> usize;

    /// Named subclasses of `iri`, direct only or transitive. Never contains
    /// `iri` itself.
    fn subclasses(&self, iri: &str, direct: bool) -> Vec<String>;

    /// Returns true if the class is declared.
    fn class_exists(&self, iri: &str) -> bool;

    /// For every equivalence axiom naming `iri` as an operand, the other
    /// operands.
    fn equivalence_axioms_of(&self, iri: &str) -> Vec<Vec<ClassExpression>>;

    /// Superclass expressions of every `SubClassOf(iri, _)` axiom.
    fn subclass_axioms_of(&self, iri: &str) -> Vec<ClassExpression>;

    /// The first label attached to the entity.
    fn label_of(&self, iri: &str) -> Option<String>;
}

/// Serialized form of a store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxiomDocument {
    /// IRI of the ontology.
    pub iri: String,
    /// Axioms in insertion order.
    #[serde(default)]
    pub axioms: Vec<Axiom>,
}

/// An insertion-ordered, duplicate-free axiom set.
#[derive(Debug, Clone, Default)]
pub struct AxiomStore {
    document: AxiomDocument,
    seen: HashSet<Axiom>,
}

impl AxiomStore {
    /// Creates an empty store for the ontology `iri`.
    #[must_use]
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            document: AxiomDocument {
                iri: iri.into(),
                axioms: Vec::new(),
            },
            seen: HashSet::new(),
        }
    }

    /// Builds a store from a document, dropping duplicate axioms.
    #[must_use]
    pub fn from_document(document: AxiomDocument) -> Self {
        let mut store = Self::new(document.iri);
        for axiom in document.axioms {
            store.insert(axiom);
        }
        store
    }

    /// The ontology IRI.
    #[must_use]
    pub fn iri(&self) -> &str {
        &self.document.iri
    }

    /// The underlying document.
    #[must_use]
    pub fn document(&self) -> &AxiomDocument {
        &self.document
    }

    /// All axioms in insertion order.
    #[must_use]
    pub fn axioms(&self) -> &[Axiom] {
        &self.document.axioms
    }

    /// Number of axioms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.document.axioms.len()
    }

    /// Returns true if the store holds no axioms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document.axioms.is_empty()
    }

    /// Adds an axiom. Returns false if it was already present.
    pub fn insert(&mut self, axiom: Axiom) -> bool {
        if self.seen.contains(&axiom) {
            return false;
        }
        self.seen.insert(axiom.clone());
        self.document.axioms.push(axiom);
        true
    }

    /// Returns true if the store holds `axiom`.
    #[must_use]
    pub fn contains(&self, axiom: &Axiom) -> bool {
        self.seen.contains(axiom)
    }

    /// Declared classes in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.document.axioms.iter().filter_map(|a| match a {
            Axiom::DeclareClass { iri } => Some(iri.as_str()),
            _ => None,
        })
    }

    /// Parses a store from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Json`] if the text is not a valid document.
    pub fn from_json_str(text: &str) -> Result<Self, OntologyError> {
        let document: AxiomDocument = serde_json::from_str(text)?;
        Ok(Self::from_document(document))
    }

    /// Serializes the store as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Json`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, OntologyError> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }

    /// Reads a store from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Io`] if the file cannot be read and
    /// [`OntologyError::Json`] if it is not a valid document.
    pub fn open(path: &Path) -> Result<Self, OntologyError> {
        let text = std::fs::read_to_string(path).map_err(|source| OntologyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json_str(&text)?;
        debug!(path = %path.display(), axioms = store.len(), "opened axiom document");
        Ok(store)
    }

    /// Writes the store to a JSON file, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Json`] if serialization fails and
    /// [`OntologyError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), OntologyError> {
        let text = self.to_json_string()?;
        std::fs::write(path, text).map_err(|source| OntologyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), axioms = self.len(), "saved axiom document");
        Ok(())
    }

    fn direct_subclasses(&self, iri: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        let mut push = |candidate: &str| {
            if candidate != iri && !found.iter().any(|f| f == candidate) {
                found.push(candidate.to_owned());
            }
        };
        for axiom in &self.document.axioms {
            match axiom {
                Axiom::SubClassOf { sub, sup } => {
                    if let (Some(sub), Some(sup)) = (sub.as_named(), sup.as_named()) {
                        if sup == iri {
                            push(sub);
                        }
                    }
                }
                Axiom::EquivalentClasses { operands } => {
                    let defines_subclass = operands.iter().any(|o| match o {
                        ClassExpression::IntersectionOf { operands } => {
                            operands.iter().any(|c| c.as_named() == Some(iri))
                        }
                        _ => false,
                    });
                    if defines_subclass {
                        operands.iter().filter_map(ClassExpression::as_named).for_each(&mut push);
                    }
                }
                _ => {}
            }
        }
        found
    }
}

impl OntologyAccess for AxiomStore {
    fn declare_class(&mut self, iri: &str) {
        self.insert(Axiom::DeclareClass { iri: iri.to_owned() });
    }

    fn declare_object_property(&mut self, iri: &str) {
        self.insert(Axiom::DeclareObjectProperty { iri: iri.to_owned() });
    }

    fn add_label(&mut self, iri: &str, label: &str) {
        self.insert(Axiom::Label {
            subject: iri.to_owned(),
            value: label.to_owned(),
        });
    }

    fn add_subclass_axiom(&mut self, sub: ClassExpression, sup: ClassExpression) {
        self.insert(Axiom::SubClassOf { sub, sup });
    }

    fn add_equivalence_axiom(&mut self, first: ClassExpression, second: ClassExpression) {
        self.insert(Axiom::EquivalentClasses {
            operands: vec![first, second],
        });
    }

    fn remove_class(&mut self, iri: &str) -> usize {
        let before = self.document.axioms.len();
        self.document.axioms.retain(|a| !a.mentions(iri));
        let removed = before - self.document.axioms.len();
        if removed > 0 {
            self.seen = self.document.axioms.iter().cloned().collect();
        }
        removed
    }

    fn subclasses(&self, iri: &str, direct: bool) -> Vec<String> {
        if direct {
            return self.direct_subclasses(iri);
        }
        let mut visited: HashSet<String> = HashSet::from([iri.to_owned()]);
        let mut out = Vec::new();
        let mut queue = VecDeque::from([iri.to_owned()]);
        while let Some(current) = queue.pop_front() {
            for sub in self.direct_subclasses(&current) {
                if visited.insert(sub.clone()) {
                    out.push(sub.clone());
                    queue.push_back(sub);
                }
            }
        }
        out
    }

    fn class_exists(&self, iri: &str) -> bool {
        self.contains(&Axiom::DeclareClass { iri: iri.to_owned() })
    }

    fn equivalence_axioms_of(&self, iri: &str) -> Vec<Vec<ClassExpression>> {
        self.document
            .axioms
            .iter()
            .filter_map(|a| match a {
                Axiom::EquivalentClasses { operands }
                    if operands.iter().any(|o| o.as_named() == Some(iri)) =>
                {
                    Some(
                        operands
                            .iter()
                            .filter(|o| o.as_named() != Some(iri))
                            .cloned()
                            .collect(),
                    )
                }
                _ => None,
            })
            .collect()
    }

    fn subclass_axioms_of(&self, iri: &str) -> Vec<ClassExpression> {
        self.document
            .axioms
            .iter()
            .filter_map(|a| match a {
                Axiom::SubClassOf { sub, sup } if sub.as_named() == Some(iri) => Some(sup.clone()),
                _ => None,
            })
            .collect()
    }

    fn label_of(&self, iri: &str) -> Option<String> {
        self.document.axioms.iter().find_map(|a| match a {
            Axiom::Label { subject, value } if subject == iri => Some(value.clone()),
            _ => None,
        })
    }
}
