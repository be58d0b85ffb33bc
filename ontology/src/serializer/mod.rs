//! RDF exports of an axiom store.
//!
//! Two formats are supported:
//! - **Turtle** ([`turtle`]): grouped per subject, for reading and for RDF tooling
//! - **N-Triples** ([`ntriples`]): one triple per line, for bulk loading into a reasoner
//!
//! Both are export-only; the JSON document is the persisted format.

pub mod ntriples;
pub mod turtle;
