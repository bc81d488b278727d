use crate::stmt::Type;

/// Maps one column, or a nested structure, onto one property or
/// constructor argument.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMapping {
    /// Target property. Constructor arguments may omit it.
    pub property: Option<String>,

    /// Source column, matched case-insensitively.
    pub column: Option<String>,

    /// Declared target type. `None` uses the property's setter type.
    pub ty: Option<Type>,

    /// Participates in row identity.
    pub id: bool,

    /// Passed to the entity constructor instead of a setter.
    pub constructor: bool,

    /// Statement run to produce the value.
    pub nested_query: Option<String>,

    /// Result map used to materialize the value from the same row.
    pub nested_result_map: Option<String>,

    /// Prepended to the nested result map's column names.
    pub column_prefix: Option<String>,

    /// The nested object exists only if one of these columns is non-null.
    pub not_null_columns: Vec<String>,

    /// Parameter parts for a nested query, each `property <- column`.
    pub composites: Vec<FieldMapping>,

    /// Named result set the value is filled from.
    pub result_set: Option<String>,

    /// Columns of the named result set that reference this row.
    pub foreign_column: Option<String>,

    /// Per-mapping override of lazy loading.
    pub lazy: Option<bool>,
}

impl FieldMapping {
    pub fn new(property: impl Into<String>, column: impl Into<String>) -> FieldMapping {
        FieldMapping {
            property: Some(property.into()),
            column: Some(column.into()),
            ..FieldMapping::default()
        }
    }

    /// A mapping for a property with no column, e.g. a nested result map.
    pub fn property(property: impl Into<String>) -> FieldMapping {
        FieldMapping {
            property: Some(property.into()),
            ..FieldMapping::default()
        }
    }

    /// A positional constructor argument read from `column`.
    pub fn arg(column: impl Into<String>, ty: Type) -> FieldMapping {
        FieldMapping {
            column: Some(column.into()),
            ty: Some(ty),
            constructor: true,
            ..FieldMapping::default()
        }
    }

    pub fn ty(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn id(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn constructor(mut self) -> Self {
        self.constructor = true;
        self
    }

    pub fn nested_query(mut self, statement: impl Into<String>) -> Self {
        self.nested_query = Some(statement.into());
        self
    }

    pub fn nested_result_map(mut self, result_map: impl Into<String>) -> Self {
        self.nested_result_map = Some(result_map.into());
        self
    }

    pub fn column_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.column_prefix = Some(prefix.into());
        self
    }

    pub fn not_null_column(mut self, column: impl Into<String>) -> Self {
        self.not_null_columns.push(column.into());
        self
    }

    /// Adds a composite parameter part: `property` of the nested query's
    /// parameter is read from `column`.
    pub fn composite(mut self, property: impl Into<String>, column: impl Into<String>) -> Self {
        self.composites.push(FieldMapping::new(property, column));
        self
    }

    pub fn result_set(mut self, name: impl Into<String>) -> Self {
        self.result_set = Some(name.into());
        self
    }

    pub fn foreign_column(mut self, column: impl Into<String>) -> Self {
        self.foreign_column = Some(column.into());
        self
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = Some(lazy);
        self
    }

    pub fn is_composite(&self) -> bool {
        !self.composites.is_empty()
    }

    /// Nested result map filled from the same rows. Mappings fed by a named
    /// result set do not count.
    pub fn has_nested_result_map(&self) -> bool {
        self.nested_result_map.is_some() && self.result_set.is_none()
    }

    /// The column names of a comma-separated column list.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        split_columns(self.column.as_deref())
    }

    pub fn foreign_columns(&self) -> impl Iterator<Item = &str> {
        split_columns(self.foreign_column.as_deref())
    }
}

fn split_columns(columns: Option<&str>) -> impl Iterator<Item = &str> {
    columns
        .into_iter()
        .flat_map(|columns| columns.split(','))
        .map(str::trim)
        .filter(|column| !column.is_empty())
}
