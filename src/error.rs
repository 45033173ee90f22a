//! Error taxonomy for the storage engine and the SQL front end.
//!
//! Mirrors the two-family split the engine is built around: `EngineError`
//! covers anything that happens below the SQL layer (storage, schema,
//! constraints), `QueryError` covers the SQL front end itself.

#[derive(thiserror::Error, Debug, Clone)]
pub enum EngineError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("page error: {0}")]
    Page(#[from] PageError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("constraint violation: {0}")]
    Constraint(#[from] ConstraintViolation),
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    pub fn other(msg: impl Into<String>) -> Self {
        EngineError::Other(msg.into())
    }

    /// The class name used in the HTTP error envelope.
    pub fn class_name(&self) -> &'static str {
        match self {
            EngineError::Schema(_) => "SchemaError",
            EngineError::Page(_) => "PageError",
            EngineError::Storage(_) => "StorageError",
            EngineError::Constraint(_) => "ConstraintViolation",
            EngineError::Other(_) => "EngineError",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum SchemaError {
    #[error("expected {expected} values, got {got}")]
    ArityMismatch { expected: usize, got: usize },
    #[error("value for column '{column}' has the wrong type")]
    TypeMismatch { column: String },
    #[error("buffer too short to decode column '{column}'")]
    BufferTooShort { column: String },
    #[error("unsupported SQL type: {0}")]
    UnsupportedType(String),
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum PageError {
    #[error("read of {length} bytes at offset {offset} exceeds page bounds (size {size})")]
    ReadOutOfBounds {
        offset: usize,
        length: usize,
        size: usize,
    },
    #[error("write of {length} bytes at offset {offset} exceeds page bounds (size {size})")]
    WriteOutOfBounds {
        offset: usize,
        length: usize,
        size: usize,
    },
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum StorageError {
    #[error("I/O failure: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e.to_string())
    }
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum ConstraintViolation {
    #[error("duplicate value for primary key column '{column}'")]
    DuplicatePrimaryKey { column: String },
    #[error("NOT NULL violation on column '{column}'")]
    NotNull { column: String },
    #[error("row has no non-null values")]
    AllNull,
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum QueryError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum ParseError {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unexpected character: '{0}'")]
    UnexpectedChar(char),
    #[error("unexpected token: expected {expected}, got {got:?}")]
    UnexpectedToken { expected: String, got: String },
    #[error("unsupported statement starting with '{0}'")]
    UnsupportedStatement(String),
    #[error("unexpected end of input")]
    UnexpectedEof,
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum ExecutionError {
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<EngineError> for QueryError {
    fn from(e: EngineError) -> Self {
        QueryError::Execution(ExecutionError::Engine(e))
    }
}
