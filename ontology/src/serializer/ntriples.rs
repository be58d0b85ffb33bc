//! N-Triples export.
//!
//! One triple per line with absolute IRIs. Restrictions, unions and
//! intersections become blank nodes (`_:b0`, `_:b1`, …) numbered in output
//! order; collections are encoded as `rdf:first`/`rdf:rest` lists.

use crate::model::iris::{
    OWL_ALL_VALUES_FROM, OWL_CLASS, OWL_EQUIVALENT_CLASS, OWL_INTERSECTION_OF,
    OWL_OBJECT_PROPERTY, OWL_ONTOLOGY, OWL_ON_PROPERTY, OWL_RESTRICTION, OWL_SOME_VALUES_FROM,
    OWL_UNION_OF, RDFS_LABEL, RDFS_SUBCLASS_OF, RDF_FIRST, RDF_NIL, RDF_REST, RDF_TYPE,
    XSD_STRING,
};
use crate::model::{Axiom, ClassExpression};
use crate::store::AxiomStore;

/// Serializes the store to an N-Triples string.
#[must_use]
pub fn to_ntriples(store: &AxiomStore) -> String {
    let mut out = String::with_capacity(128 * 1024);
    let mut blanks = 0usize;

    triple(&mut out, &iri(store.iri()), RDF_TYPE, &iri(OWL_ONTOLOGY));

    for axiom in store.axioms() {
        match axiom {
            Axiom::DeclareClass { iri: class } => {
                triple(&mut out, &iri(class), RDF_TYPE, &iri(OWL_CLASS));
            }
            Axiom::DeclareObjectProperty { iri: property } => {
                triple(&mut out, &iri(property), RDF_TYPE, &iri(OWL_OBJECT_PROPERTY));
            }
            Axiom::Label { subject, value } => {
                triple(&mut out, &iri(subject), RDFS_LABEL, &lit(value, XSD_STRING));
            }
            Axiom::SubClassOf { sub, sup } => {
                let s = node(&mut out, &mut blanks, sub);
                let o = node(&mut out, &mut blanks, sup);
                triple(&mut out, &s, RDFS_SUBCLASS_OF, &o);
            }
            Axiom::EquivalentClasses { operands } => {
                let Some((first, rest)) = operands.split_first() else {
                    continue;
                };
                let s = node(&mut out, &mut blanks, first);
                for other in rest {
                    let o = node(&mut out, &mut blanks, other);
                    triple(&mut out, &s, OWL_EQUIVALENT_CLASS, &o);
                }
            }
        }
    }

    out
}

/// Writes the triples describing `expr` and returns the term naming it.
fn node(out: &mut String, blanks: &mut usize, expr: &ClassExpression) -> String {
    match expr {
        ClassExpression::Named { iri: class } => iri(class),
        ClassExpression::SomeValuesFrom { property, filler }
        | ClassExpression::AllValuesFrom { property, filler } => {
            let on = if matches!(expr, ClassExpression::SomeValuesFrom { .. }) {
                OWL_SOME_VALUES_FROM
            } else {
                OWL_ALL_VALUES_FROM
            };
            let b = blank(blanks);
            let f = node(out, blanks, filler);
            triple(out, &b, RDF_TYPE, &iri(OWL_RESTRICTION));
            triple(out, &b, OWL_ON_PROPERTY, &iri(property));
            triple(out, &b, on, &f);
            b
        }
        ClassExpression::UnionOf { operands } | ClassExpression::IntersectionOf { operands } => {
            let kind = if matches!(expr, ClassExpression::UnionOf { .. }) {
                OWL_UNION_OF
            } else {
                OWL_INTERSECTION_OF
            };
            let b = blank(blanks);
            let members = list(out, blanks, operands);
            triple(out, &b, RDF_TYPE, &iri(OWL_CLASS));
            triple(out, &b, kind, &members);
            b
        }
    }
}

fn list(out: &mut String, blanks: &mut usize, items: &[ClassExpression]) -> String {
    let Some((head, tail)) = items.split_first() else {
        return iri(RDF_NIL);
    };
    let cell = blank(blanks);
    let first = node(out, blanks, head);
    let rest = list(out, blanks, tail);
    triple(out, &cell, RDF_FIRST, &first);
    triple(out, &cell, RDF_REST, &rest);
    cell
}

fn blank(blanks: &mut usize) -> String {
    let b = format!("_:b{}", blanks);
    *blanks += 1;
    b
}

fn triple(out: &mut String, subj: &str, pred: &str, obj: &str) {
    out.push_str(subj);
    out.push_str(" <");
    out.push_str(pred);
    out.push_str("> ");
    out.push_str(obj);
    out.push_str(" .\n");
}

fn iri(s: &str) -> String {
    format!("<{}>", s)
}

fn lit(s: &str, datatype: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{}\"^^<{}>", escaped, datatype)
}
