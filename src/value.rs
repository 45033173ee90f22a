//! The typed union of values a cell in a row can hold.

use crate::catalog::schema::ColumnType;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Float(x) => write!(f, "{x}"),
            SqlValue::Text(s) => write!(f, "{s}"),
            SqlValue::Null => write!(f, "NULL"),
        }
    }
}

impl SqlValue {
    pub fn type_of(&self) -> Option<ColumnType> {
        match self {
            SqlValue::Int(_) => Some(ColumnType::Int),
            SqlValue::Float(_) => Some(ColumnType::Float),
            SqlValue::Text(_) => Some(ColumnType::Text),
            SqlValue::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Serializes the value for use as a grouping key or an ORDER BY sort key.
    /// NULL sorts as an empty string.
    pub fn sort_key(&self) -> String {
        match self {
            SqlValue::Int(i) => format!("{i}"),
            SqlValue::Float(x) => format!("{x}"),
            SqlValue::Text(s) => s.clone(),
            SqlValue::Null => String::new(),
        }
    }

    /// Coerces this value (typically parsed as a string/number literal) into
    /// the given column type; used to coerce INSERT/UPDATE/WHERE literals
    /// against a column's declared type.
    pub fn coerce(&self, dtype: ColumnType) -> Result<SqlValue, crate::error::SchemaError> {
        if self.is_null() {
            return Ok(SqlValue::Null);
        }
        match (self, dtype) {
            (SqlValue::Int(i), ColumnType::Int) => Ok(SqlValue::Int(*i)),
            (SqlValue::Int(i), ColumnType::Float) => Ok(SqlValue::Float(*i as f64)),
            (SqlValue::Int(i), ColumnType::Text) => Ok(SqlValue::Text(i.to_string())),
            (SqlValue::Float(x), ColumnType::Float) => Ok(SqlValue::Float(*x)),
            (SqlValue::Float(x), ColumnType::Int) => Ok(SqlValue::Int(*x as i64)),
            (SqlValue::Float(x), ColumnType::Text) => Ok(SqlValue::Text(x.to_string())),
            (SqlValue::Text(s), ColumnType::Text) => Ok(SqlValue::Text(s.clone())),
            (SqlValue::Text(s), ColumnType::Int) => s
                .parse::<i64>()
                .map(SqlValue::Int)
                .map_err(|_| crate::error::SchemaError::TypeMismatch {
                    column: String::new(),
                }),
            (SqlValue::Text(s), ColumnType::Float) => s
                .parse::<f64>()
                .map(SqlValue::Float)
                .map_err(|_| crate::error::SchemaError::TypeMismatch {
                    column: String::new(),
                }),
            (SqlValue::Null, _) => unreachable!(),
        }
    }
}
