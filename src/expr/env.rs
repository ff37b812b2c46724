//! Compile-time environments and run-time bindings

use std::collections::BTreeMap;

use crate::value::{ScalarKind, ScalarValue};

/// Names visible to a predicate and the kind each one carries.
///
/// Used for type checking at compile time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    names: BTreeMap<String, ScalarKind>,
}

impl Environment {
    /// An environment with no names
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name with its kind
    pub fn with(mut self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.names.insert(name.into(), kind);
        self
    }

    /// Derives an environment from concrete bindings
    pub fn from_bindings(bindings: &Bindings) -> Self {
        Self {
            names: bindings
                .iter()
                .map(|(name, value)| (name.to_string(), value.kind()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<ScalarKind> {
        self.names.get(name).copied()
    }
}

/// Values bound to names for one evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: BTreeMap<String, ScalarValue>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a name to a value
    pub fn bind(mut self, name: impl Into<String>, value: ScalarValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalarValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
