//! Namespaced identifiers.
//!
//! Every entity that crosses the model/ontology boundary is named by an
//! [`Identifier`]: a full IRI plus a human-readable label. Equality and
//! hashing consider the IRI only, so two identifiers with the same IRI but
//! different labels are the same entity.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::ModelError;

/// A namespaced global name with a human-readable label.
#[derive(Debug, Clone, Eq)]
pub struct Identifier {
    uri: String,
    label: String,
}

impl Identifier {
    /// Creates an identifier from a full IRI and a label.
    pub fn new(uri: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            label: label.into(),
        }
    }

    /// Creates an identifier whose label is derived from the IRI's local name.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let label = decode_name(local_name(&uri));
        Self { uri, label }
    }

    /// Returns the full IRI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.label, self.uri)
    }
}

/// The two identifier namespaces of a model.
///
/// - `schema`: hierarchy roots, constraint-type focus concepts, properties.
/// - `content`: user-created, editable categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    /// IRI prefix for schema-level entities.
    pub schema: String,
    /// IRI prefix for content categories.
    pub content: String,
}

impl Namespaces {
    /// Creates a namespace pair.
    pub fn new(schema: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            content: content.into(),
        }
    }

    /// Builds a schema-namespace identifier for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is blank.
    pub fn schema_identifier(&self, name: &str) -> Result<Identifier, ModelError> {
        identifier_in(&self.schema, name)
    }

    /// Builds a content-namespace identifier for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is blank.
    pub fn content_identifier(&self, name: &str) -> Result<Identifier, ModelError> {
        identifier_in(&self.content, name)
    }

    /// Returns true if `uri` lives in the content namespace.
    #[must_use]
    pub fn is_content(&self, uri: &str) -> bool {
        uri.starts_with(&self.content)
    }
}

fn identifier_in(prefix: &str, name: &str) -> Result<Identifier, ModelError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ModelError::InvalidName {
            name: name.to_owned(),
        });
    }
    Ok(Identifier::new(
        format!("{prefix}{}", encode_name(name)),
        name,
    ))
}

/// Encodes a human-readable name as an IRI local name.
///
/// Whitespace becomes `_`; characters outside `[A-Za-z0-9._~-]` are
/// percent-encoded byte by byte.
#[must_use]
pub fn encode_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_whitespace() {
            out.push('_');
        } else if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '~' | '-') {
            out.push(ch);
        } else {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    out
}

/// Reverses [`encode_name`] as far as possible (`_` decodes to a space).
#[must_use]
pub fn decode_name(local: &str) -> String {
    let bytes = local.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                (Some(hi), Some(lo)) => {
                    out.push((hi << 4) | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b'_' => {
                out.push(b' ');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Returns the local name of an IRI: the part after the last `#` or `/`.
#[must_use]
pub fn local_name(uri: &str) -> &str {
    uri.rsplit(['#', '/']).next().unwrap_or(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_label() {
        let a = Identifier::new("http://x.org/c#Foo", "Foo");
        let b = Identifier::new("http://x.org/c#Foo", "Something else");
        assert_eq!(a, b);
        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn content_identifier_encodes_spaces() {
        let ns = Namespaces::new("http://x.org/s#", "http://x.org/c#");
        let id = ns.content_identifier("Hot Dish").unwrap();
        assert_eq!(id.uri(), "http://x.org/c#Hot_Dish");
        assert_eq!(id.label(), "Hot Dish");
        assert!(ns.is_content(id.uri()));
    }

    #[test]
    fn blank_names_are_rejected() {
        let ns = Namespaces::new("http://x.org/s#", "http://x.org/c#");
        assert!(matches!(
            ns.content_identifier("   "),
            Err(ModelError::InvalidName { .. })
        ));
    }

    #[test]
    fn reserved_characters_are_percent_encoded() {
        assert_eq!(encode_name("a/b"), "a%2Fb");
        assert_eq!(decode_name("a%2Fb"), "a/b");
        assert_eq!(decode_name("Hot_Dish"), "Hot Dish");
    }

    #[test]
    fn from_uri_derives_label() {
        let id = Identifier::from_uri("http://x.org/c#Ice_Cream");
        assert_eq!(id.label(), "Ice Cream");
        assert_eq!(local_name("http://x.org/path/Leaf"), "Leaf");
    }
}
