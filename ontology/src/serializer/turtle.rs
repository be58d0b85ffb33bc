//! Turtle 1.1 export.
//!
//! Statements about a named subject are grouped into one block, in the
//! order the subject first appears in the document. Restrictions and
//! boolean class expressions are written as anonymous `[ … ]` nodes.

use crate::model::{Axiom, ClassExpression};
use crate::store::AxiomStore;

/// Serializes the store to a Turtle string.
#[must_use]
pub fn to_turtle(store: &AxiomStore) -> String {
    let mut out = String::with_capacity(64 * 1024);

    // Prefix declarations
    out.push_str("@prefix owl:  <http://www.w3.org/2002/07/owl#> .\n");
    out.push_str("@prefix rdf:  <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .\n");
    out.push_str("@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n");
    out.push_str("@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .\n");
    out.push('\n');

    out.push_str(&format!("<{}>\n  a owl:Ontology .\n\n", store.iri()));

    let mut blocks: Vec<(String, Vec<String>)> = Vec::new();
    let mut anonymous: Vec<String> = Vec::new();

    for axiom in store.axioms() {
        match axiom {
            Axiom::DeclareClass { iri } => {
                statement(&mut blocks, iri, "a owl:Class".to_owned());
            }
            Axiom::DeclareObjectProperty { iri } => {
                statement(&mut blocks, iri, "a owl:ObjectProperty".to_owned());
            }
            Axiom::Label { subject, value } => {
                statement(&mut blocks, subject, format!("rdfs:label {}", turtle_string(value)));
            }
            Axiom::SubClassOf { sub, sup } => {
                let object = format!("rdfs:subClassOf {}", expression(sup));
                match sub.as_named() {
                    Some(iri) => statement(&mut blocks, iri, object),
                    None => anonymous.push(format!("{} {} .\n\n", expression(sub), object)),
                }
            }
            Axiom::EquivalentClasses { operands } => {
                let Some((first, rest)) = operands.split_first() else {
                    continue;
                };
                for other in rest {
                    let object = format!("owl:equivalentClass {}", expression(other));
                    match first.as_named() {
                        Some(iri) => statement(&mut blocks, iri, object),
                        None => anonymous.push(format!("{} {} .\n\n", expression(first), object)),
                    }
                }
            }
        }
    }

    for (subject, predicates) in &blocks {
        out.push_str(&format!("<{}>\n  {} .\n\n", subject, predicates.join(" ;\n  ")));
    }
    for line in &anonymous {
        out.push_str(line);
    }

    out
}

fn statement(blocks: &mut Vec<(String, Vec<String>)>, subject: &str, predicate: String) {
    match blocks.iter_mut().find(|(s, _)| s == subject) {
        Some((_, predicates)) => predicates.push(predicate),
        None => blocks.push((subject.to_owned(), vec![predicate])),
    }
}

fn expression(expr: &ClassExpression) -> String {
    match expr {
        ClassExpression::Named { iri } => format!("<{}>", iri),
        ClassExpression::SomeValuesFrom { property, filler } => format!(
            "[ a owl:Restriction ; owl:onProperty <{}> ; owl:someValuesFrom {} ]",
            property,
            expression(filler)
        ),
        ClassExpression::AllValuesFrom { property, filler } => format!(
            "[ a owl:Restriction ; owl:onProperty <{}> ; owl:allValuesFrom {} ]",
            property,
            expression(filler)
        ),
        ClassExpression::UnionOf { operands } => {
            format!("[ a owl:Class ; owl:unionOf {} ]", collection(operands))
        }
        ClassExpression::IntersectionOf { operands } => {
            format!("[ a owl:Class ; owl:intersectionOf {} ]", collection(operands))
        }
    }
}

fn collection(operands: &[ClassExpression]) -> String {
    let mut result = "( ".to_owned();
    for operand in operands {
        result.push_str(&expression(operand));
        result.push(' ');
    }
    result.push(')');
    result
}

fn turtle_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{all, intersection_of, named, some, union_of};
    use crate::store::OntologyAccess;

    fn sample() -> AxiomStore {
        let mut store = AxiomStore::new("http://example.org/menu");
        store.declare_class("urn:pasta");
        store.add_label("urn:pasta", "Pasta \"fresh\"");
        store.declare_class("urn:def");
        store.add_subclass_axiom(named("urn:def"), named("urn:focus"));
        store.add_equivalence_axiom(
            named("urn:def"),
            intersection_of([named("urn:focus"), some("urn:hasDish", named("urn:pasta"))]),
        );
        store.add_subclass_axiom(
            named("urn:def"),
            all(
                "urn:hasIngredient",
                union_of([named("urn:wheat"), named("urn:egg")]),
            ),
        );
        store
    }

    #[test]
    fn produces_prefixes_and_header() {
        let turtle = to_turtle(&sample());
        assert!(turtle.contains("@prefix owl:"));
        assert!(turtle.contains("<http://example.org/menu>\n  a owl:Ontology ."));
    }

    #[test]
    fn groups_statements_per_subject() {
        let turtle = to_turtle(&sample());
        assert!(turtle.contains("<urn:pasta>\n  a owl:Class ;\n  rdfs:label \"Pasta \\\"fresh\\\"\" .\n"));
        assert_eq!(turtle.matches("<urn:def>\n").count(), 1);
    }

    #[test]
    fn writes_restrictions_as_anonymous_nodes() {
        let turtle = to_turtle(&sample());
        assert!(turtle.contains(
            "owl:equivalentClass [ a owl:Class ; owl:intersectionOf ( <urn:focus> \
             [ a owl:Restriction ; owl:onProperty <urn:hasDish> ; owl:someValuesFrom <urn:pasta> ] ) ]"
        ));
        assert!(turtle.contains("owl:unionOf ( <urn:wheat> <urn:egg> )"));
    }
}
