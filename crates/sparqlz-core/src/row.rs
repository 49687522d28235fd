//! A row of bindings from a query result

use crate::{Binding, Value};
use std::collections::HashMap;

/// Ordered bindings forming one row, in the left-to-right column order of
/// the originating query. An empty row is the canonical "no data at this
/// position" value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRow {
    bindings: Vec<Binding>,
}

impl ResultRow {
    /// Create a new row
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    /// Append a binding as the next column
    pub fn push(&mut self, binding: Binding) {
        self.bindings.push(binding);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Get a binding by column index
    pub fn binding(&self, index: usize) -> Option<&Binding> {
        self.bindings.get(index)
    }

    /// Get a value by column index
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.bindings.get(index).map(Binding::value)
    }

    /// Column index of the binding with the given name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bindings.iter().position(|b| b.name() == name)
    }

    /// Get a binding by name (linear scan; prefer index lookup)
    pub fn binding_by_name(&self, name: &str) -> Option<&Binding> {
        self.index_of(name).and_then(|idx| self.bindings.get(idx))
    }

    /// Get a value by name (linear scan; prefer index lookup)
    pub fn value_by_name(&self, name: &str) -> Option<&Value> {
        self.binding_by_name(name).map(Binding::value)
    }

    /// Binding names in column order
    pub fn binding_names(&self) -> Vec<&str> {
        self.bindings.iter().map(Binding::name).collect()
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Binding> {
        self.bindings.iter()
    }

    /// Convert to a name-keyed map
    pub fn to_map(&self) -> HashMap<String, Value> {
        self.bindings
            .iter()
            .map(|b| (b.name().to_string(), b.value().clone()))
            .collect()
    }
}

impl FromIterator<Binding> for ResultRow {
    fn from_iter<I: IntoIterator<Item = Binding>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultRow {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}

impl std::fmt::Display for ResultRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.bindings.iter().map(|b| b.to_string()).collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}
