//! INSERT / UPDATE / DELETE executors: thin wrappers over engine methods
//! that build the `where_fn` predicate closure from the parsed
//! `BinaryExpression`.

use crate::engine::Engine;
use crate::error::ExecutionError;
use crate::exec::{bare_column_name, coerce_literal, compare, Executor};
use crate::row::RowMap;
use crate::sql::ast::{BinaryExpression, Literal};
use crate::value::SqlValue;

fn literal_to_value(literal: &Literal) -> SqlValue {
    match literal {
        Literal::Int(i) => SqlValue::Int(*i),
        Literal::Float(f) => SqlValue::Float(*f),
        Literal::Text(s) => SqlValue::Text(s.clone()),
        Literal::Null => SqlValue::Null,
    }
}

/// Builds a `where_fn` closure for a table's predicate, coercing the
/// literal to the referenced column's dtype when the table/column are
/// known.
fn build_where_fn(
    engine: &Engine,
    table: &str,
    predicate: &BinaryExpression,
) -> Box<dyn Fn(&RowMap) -> bool> {
    let col = bare_column_name(&predicate.column).to_lowercase();
    let dtype = engine
        .schema_of(table)
        .and_then(|schema| schema.column_index(&col).map(|i| schema.columns[i].dtype));
    let literal = coerce_literal(&predicate.literal, dtype);
    let op = predicate.op.clone();
    Box::new(move |row: &RowMap| match row.get(&col) {
        Some(value) => compare(&op, value, &literal),
        None => false,
    })
}

pub struct InsertExecutor {
    table: String,
    values: Vec<Literal>,
}

impl InsertExecutor {
    pub fn new(table: String, values: Vec<Literal>) -> Self {
        InsertExecutor { table, values }
    }
}

impl Executor for InsertExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        let values: Vec<SqlValue> = self.values.iter().map(literal_to_value).collect();
        engine
            .insert_row(&self.table, values)
            .map_err(ExecutionError::Engine)?;
        Ok(Vec::new())
    }
}

pub struct UpdateExecutor {
    table: String,
    assignments: Vec<(String, Literal)>,
    where_clause: Option<BinaryExpression>,
}

impl UpdateExecutor {
    pub fn new(
        table: String,
        assignments: Vec<(String, Literal)>,
        where_clause: Option<BinaryExpression>,
    ) -> Self {
        UpdateExecutor {
            table,
            assignments,
            where_clause,
        }
    }
}

impl Executor for UpdateExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        let set_values: Vec<(String, SqlValue)> = self
            .assignments
            .iter()
            .map(|(col, lit)| (col.to_lowercase(), literal_to_value(lit)))
            .collect();
        let where_fn: Box<dyn Fn(&RowMap) -> bool> = match &self.where_clause {
            Some(predicate) => build_where_fn(engine, &self.table, predicate),
            None => Box::new(|_: &RowMap| true),
        };
        let updated = engine
            .update_rows(&self.table, &set_values, where_fn.as_ref())
            .map_err(ExecutionError::Engine)?;
        let mut row = RowMap::new();
        row.insert("updated", SqlValue::Int(updated as i64));
        Ok(vec![row])
    }
}

pub struct DeleteExecutor {
    table: String,
    where_clause: Option<BinaryExpression>,
}

impl DeleteExecutor {
    pub fn new(table: String, where_clause: Option<BinaryExpression>) -> Self {
        DeleteExecutor { table, where_clause }
    }
}

impl Executor for DeleteExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        let where_fn: Box<dyn Fn(&RowMap) -> bool> = match &self.where_clause {
            Some(predicate) => build_where_fn(engine, &self.table, predicate),
            None => Box::new(|_: &RowMap| true),
        };
        let deleted = engine
            .delete_rows(&self.table, where_fn.as_ref())
            .map_err(ExecutionError::Engine)?;
        let mut row = RowMap::new();
        row.insert("deleted", SqlValue::Int(deleted as i64));
        Ok(vec![row])
    }
}
