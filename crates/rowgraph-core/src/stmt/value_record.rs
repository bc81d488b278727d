use super::Value;

use indexmap::IndexMap;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// An ordered set of named values.
///
/// Equality is order-sensitive so that it agrees with `Hash`.
#[derive(Debug, Default, Clone)]
pub struct ValueRecord {
    fields: IndexMap<String, Value>,
}

impl ValueRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Returns `true` when every field is null. An empty record counts as all-null.
    pub fn is_all_null(&self) -> bool {
        self.fields.values().all(Value::is_null)
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.fields
    }
}

impl Deref for ValueRecord {
    type Target = IndexMap<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

impl PartialEq for ValueRecord {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len() && self.fields.iter().eq(other.fields.iter())
    }
}

impl Eq for ValueRecord {}

impl Hash for ValueRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fields.len().hash(state);
        for (name, value) in &self.fields {
            name.hash(state);
            value.hash(state);
        }
    }
}

impl std::fmt::Display for ValueRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ValueRecord {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
