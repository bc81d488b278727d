use crate::stmt::{Type, Value};
use crate::{Error, Result};

use std::any::Any;
use std::fmt;

/// A type the materializer can create and populate.
///
/// Usually implemented with the [`impl_entity!`](crate::impl_entity) macro.
pub trait Entity: Any + Send + fmt::Debug {
    /// Name the entity is registered under.
    fn type_name(&self) -> &'static str;

    /// Resolves a column-derived name to a property name, ignoring case.
    ///
    /// With `underscore_to_camel_case`, underscores on both sides are
    /// ignored as well, so `AUTHOR_ID` and `authorid` both find `author_id`.
    fn find_property(&self, name: &str, underscore_to_camel_case: bool) -> Option<String>;

    /// The declared type of a settable property.
    fn setter_type(&self, property: &str) -> Option<Type>;

    fn has_setter(&self, property: &str) -> bool {
        self.setter_type(property).is_some()
    }

    fn get(&self, property: &str) -> Option<Value>;

    fn set(&mut self, property: &str, value: Value) -> Result<()>;

    /// Appends to a collection property, creating it if unset.
    fn push(&mut self, property: &str, value: Value) -> Result<()> {
        push_by_copy(self, property, value)
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Appends to a collection property by reading it, extending the copy and
/// setting it back.
pub fn push_by_copy<E: Entity + ?Sized>(entity: &mut E, property: &str, value: Value) -> Result<()> {
    let mut items = match entity.get(property) {
        Some(Value::List(items)) => items,
        Some(Value::Null) | None => vec![],
        Some(other) => return Err(Error::type_conversion(other, "list")),
    };
    items.push(value);
    entity.set(property, Value::List(items))
}

/// Case-insensitive property lookup over a static list of names.
pub fn find_property(
    properties: &[&'static str],
    name: &str,
    underscore_to_camel_case: bool,
) -> Option<String> {
    let matches = |property: &str| {
        if underscore_to_camel_case {
            let lhs = property.chars().filter(|c| *c != '_');
            let rhs = name.chars().filter(|c| *c != '_');
            lhs.map(|c| c.to_ascii_lowercase())
                .eq(rhs.map(|c| c.to_ascii_lowercase()))
        } else {
            property.eq_ignore_ascii_case(name)
        }
    };

    properties
        .iter()
        .find(|property| matches(property))
        .map(|property| property.to_string())
}

#[cfg(test)]
mod tests {
    use super::find_property;

    const PROPERTIES: &[&str] = &["id", "author_id", "title"];

    #[test]
    fn matches_ignoring_case() {
        assert_eq!(find_property(PROPERTIES, "TITLE", false).as_deref(), Some("title"));
        assert_eq!(find_property(PROPERTIES, "AUTHOR_ID", false).as_deref(), Some("author_id"));
        assert_eq!(find_property(PROPERTIES, "AUTHORID", false), None);
    }

    #[test]
    fn camel_case_ignores_underscores() {
        assert_eq!(find_property(PROPERTIES, "AUTHORID", true).as_deref(), Some("author_id"));
        assert_eq!(find_property(PROPERTIES, "author_id", true).as_deref(), Some("author_id"));
    }
}
