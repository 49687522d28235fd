//! A single named value within a result row

use crate::Value;
use serde::{Deserialize, Serialize};

/// One named value with optional datatype and language metadata.
///
/// A binding with an empty name is the "invalid binding" returned when a
/// caller probes an index that does not exist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Binding {
    name: String,
    value: Value,
    data_type: Option<String>,
    language_tag: Option<String>,
}

impl Binding {
    /// Create a binding whose datatype is inferred from the value
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        let data_type = value.implied_data_type().map(str::to_string);
        Self {
            name: name.into(),
            value,
            data_type,
            language_tag: None,
        }
    }

    /// Create an IRI binding
    pub fn uri(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::new(name, Value::Uri(uri.into()))
    }

    /// Create a blank node binding
    pub fn blank(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, Value::BlankNode(label.into()))
    }

    /// Override the datatype URI
    pub fn with_data_type(mut self, uri: impl Into<String>) -> Self {
        self.data_type = Some(uri.into());
        self
    }

    /// Attach a language tag. Tagged literals carry no datatype.
    pub fn with_language(mut self, tag: impl Into<String>) -> Self {
        self.language_tag = Some(tag.into());
        self.data_type = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn data_type(&self) -> Option<&str> {
        self.data_type.as_deref()
    }

    pub fn language_tag(&self) -> Option<&str> {
        self.language_tag.as_deref()
    }

    /// False for the placeholder returned on out-of-range lookups
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Render the value as an N-Triples term (`<iri>`, `_:b`, `"x"@en`,
    /// `"1"^^<...#integer>`). Unbound values render as an empty string.
    pub fn to_ntriples(&self) -> String {
        match &self.value {
            Value::Unbound => String::new(),
            Value::Uri(uri) => format!("<{}>", uri),
            Value::BlankNode(label) => format!("_:{}", label),
            literal => {
                let lexical = escape_literal(&literal.to_string());
                if let Some(lang) = &self.language_tag {
                    format!("\"{}\"@{}", lexical, lang)
                } else if let Some(dt) = &self.data_type {
                    format!("\"{}\"^^<{}>", lexical, dt)
                } else {
                    format!("\"{}\"", lexical)
                }
            }
        }
    }
}

fn escape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.to_ntriples())
    }
}
