use crate::ObjectFactory;

use rowgraph_core::{
    stmt::{Type, Value},
    Error, Result,
};

/// Turns the rows of a nested statement into the value assigned to a
/// property of type `target`.
///
/// Collection targets receive every row. Anything else receives the single
/// row, or null when there is none.
pub(crate) fn extract_from_list(
    rows: Vec<Value>,
    target: &Type,
    factory: &dyn ObjectFactory,
) -> Result<Value> {
    if factory.is_collection(target) {
        return Ok(Value::List(rows));
    }

    let mut rows = rows.into_iter();
    match (rows.next(), rows.len()) {
        (None, _) => Ok(Value::Null),
        (Some(row), 0) => Ok(row),
        (Some(_), rest) => Err(Error::too_many_records(format!(
            "expected one result (or null) to be returned, but found {}",
            rest + 1
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultObjectFactory;

    #[test]
    fn single_and_empty() {
        let factory = DefaultObjectFactory::new();
        let target = Type::object("Author");

        assert_eq!(extract_from_list(vec![], &target, &factory).unwrap(), Value::Null);
        assert_eq!(
            extract_from_list(vec![Value::I64(1)], &target, &factory).unwrap(),
            Value::I64(1)
        );
    }

    #[test]
    fn list_target_takes_all_rows() {
        let factory = DefaultObjectFactory::new();
        let target = Type::list(Type::I64);
        let rows = vec![Value::I64(1), Value::I64(2)];

        assert_eq!(
            extract_from_list(rows.clone(), &target, &factory).unwrap(),
            Value::List(rows)
        );
        assert_eq!(
            extract_from_list(vec![], &target, &factory).unwrap(),
            Value::List(vec![])
        );
    }

    #[test]
    fn too_many_for_single_target() {
        let factory = DefaultObjectFactory::new();
        let err = extract_from_list(vec![Value::I64(1), Value::I64(2)], &Type::I64, &factory)
            .unwrap_err();

        assert!(err.is_too_many_records());
        assert!(err.to_string().ends_with("but found 2"));
    }
}
