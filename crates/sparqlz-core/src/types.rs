//! Core value types for sparqlz

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// XML Schema datatype URIs used when inferring a binding's data type
pub mod xsd {
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

/// An RDF term value carried by a binding
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// No value bound at this position
    #[default]
    Unbound,
    /// xsd:boolean literal
    Bool(bool),
    /// xsd:integer literal
    Integer(i64),
    /// xsd:double literal
    Double(f64),
    /// xsd:decimal literal (stored as string for precision)
    Decimal(String),
    /// Plain or language-tagged string literal
    String(String),
    /// IRI resource
    Uri(String),
    /// Blank node label, without the `_:` prefix
    BlankNode(String),
    /// xsd:date literal
    Date(NaiveDate),
    /// xsd:dateTime literal
    DateTime(DateTime<Utc>),
}

impl Value {
    /// Check if nothing is bound
    pub fn is_unbound(&self) -> bool {
        matches!(self, Value::Unbound)
    }

    pub fn is_uri(&self) -> bool {
        matches!(self, Value::Uri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Value::BlankNode(_))
    }

    /// Literals are everything that is neither a resource nor unbound
    pub fn is_literal(&self) -> bool {
        !matches!(self, Value::Unbound | Value::Uri(_) | Value::BlankNode(_))
    }

    /// Try to get the lexical form of a string or IRI
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Uri(s) | Value::BlankNode(s) | Value::Decimal(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::String(s) => s.parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            Value::Decimal(s) | Value::String(s) => s.parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The XSD datatype implied by the value, if it is a typed literal
    pub fn implied_data_type(&self) -> Option<&'static str> {
        match self {
            Value::Bool(_) => Some(xsd::BOOLEAN),
            Value::Integer(_) => Some(xsd::INTEGER),
            Value::Double(_) => Some(xsd::DOUBLE),
            Value::Decimal(_) => Some(xsd::DECIMAL),
            Value::Date(_) => Some(xsd::DATE),
            Value::DateTime(_) => Some(xsd::DATE_TIME),
            Value::String(_) | Value::Uri(_) | Value::BlankNode(_) | Value::Unbound => None,
        }
    }
}

/// Renders the lexical form. Unbound renders as the empty string so that
/// `string_value()` on a missing column yields "".
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Unbound => Ok(()),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Uri(v) => write!(f, "{}", v),
            Value::BlankNode(v) => write!(f, "{}", v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

/// Query shape, which determines whether a result is tabular, a graph or a
/// single boolean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatementType {
    #[default]
    Select,
    Construct,
    Describe,
    Ask,
}

impl StatementType {
    pub fn is_table(&self) -> bool {
        matches!(self, StatementType::Select)
    }

    /// Construct and Describe produce rows of `s`, `p`, `o` bindings
    pub fn is_graph(&self) -> bool {
        matches!(self, StatementType::Construct | StatementType::Describe)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, StatementType::Ask)
    }

    /// Whether results of this shape are navigated row by row
    pub fn produces_rows(&self) -> bool {
        !self.is_bool()
    }
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StatementType::Select => "SELECT",
            StatementType::Construct => "CONSTRUCT",
            StatementType::Describe => "DESCRIBE",
            StatementType::Ask => "ASK",
        };
        f.write_str(name)
    }
}
