use crate::stmt::Type;

/// Driver-reported SQL type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Boolean,
    Integer,
    BigInt,
    Double,
    Varchar,
    Blob,
    Uuid,
    Other,
}

/// Metadata for one column of a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column label as reported by the driver.
    pub name: String,

    pub sql_type: Option<SqlType>,

    /// Native value type the driver declares for the column, if any.
    pub declared: Option<Type>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Column {
        Column {
            name: name.into(),
            sql_type: None,
            declared: None,
        }
    }

    pub fn sql_type(mut self, sql_type: SqlType) -> Self {
        self.sql_type = Some(sql_type);
        self
    }

    pub fn declared(mut self, ty: Type) -> Self {
        self.declared = Some(ty);
        self
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Column {
        Column::new(name)
    }
}
