use super::Entity;
use crate::stmt::{Type, Value};
use crate::Result;

use indexmap::IndexMap;
use std::any::Any;

/// A dynamic property bag, materialized for result maps of [`Type::Map`].
///
/// Every name is a valid property. Keys keep the spelling they were set
/// with.
#[derive(Debug, Default, Clone)]
pub struct Row {
    values: IndexMap<String, Value>,
}

impl Row {
    pub const TYPE_NAME: &'static str = "row";

    pub fn new() -> Row {
        Row::default()
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Entity for Row {
    fn type_name(&self) -> &'static str {
        Row::TYPE_NAME
    }

    fn find_property(&self, name: &str, _underscore_to_camel_case: bool) -> Option<String> {
        Some(name.to_string())
    }

    fn setter_type(&self, property: &str) -> Option<Type> {
        match self.values.get(property) {
            Some(Value::List(_)) => Some(Type::list(Type::Any)),
            _ => Some(Type::Any),
        }
    }

    fn get(&self, property: &str) -> Option<Value> {
        self.values.get(property).cloned()
    }

    fn set(&mut self, property: &str, value: Value) -> Result<()> {
        self.values.insert(property.to_string(), value);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
