//! Ties the SQL front end to the executor tree for one full statement:
//! tokenize, parse, execute, and surface a missing-semicolon warning
//! rather than an error.

use crate::engine::Engine;
use crate::error::{ParseError, QueryError};
use crate::exec;
use crate::row::RowMap;

pub struct ExecutionOutcome {
    pub rows: Vec<RowMap>,
    pub warning: Option<String>,
}

/// Runs one SQL statement end to end against `engine`.
pub fn execute(engine: &mut Engine, sql: &str) -> Result<ExecutionOutcome, QueryError> {
    if sql.trim().is_empty() {
        return Err(QueryError::Parse(ParseError::UnexpectedEof));
    }

    let (statement, had_semicolon) = crate::sql::parse(sql)?;
    let rows = exec::execute_statement(engine, statement)?;

    let warning = if had_semicolon {
        None
    } else {
        Some("Consider ending your SQL with a semicolon (;)".to_string())
    };

    Ok(ExecutionOutcome { rows, warning })
}
