use crate::engine::Engine;
use crate::error::ExecutionError;
use crate::exec::{bare_column_name, compare, coerce_literal, Executor};
use crate::row::RowMap;
use crate::sql::ast::BinaryExpression;

pub struct TableScanExecutor {
    table: String,
}

impl TableScanExecutor {
    pub fn new(table: String) -> Self {
        TableScanExecutor { table }
    }
}

impl Executor for TableScanExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        engine
            .scan_table(&self.table)
            .map_err(ExecutionError::Engine)
    }
}

pub struct FilterExecutor {
    source: Box<dyn Executor>,
    predicate: BinaryExpression,
}

impl FilterExecutor {
    pub fn new(source: Box<dyn Executor>, predicate: BinaryExpression) -> Self {
        FilterExecutor { source, predicate }
    }
}

impl Executor for FilterExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        let rows = self.source.execute(engine)?;
        let col = bare_column_name(&self.predicate.column).to_lowercase();

        // The predicate's table is whatever schema currently owns `col`;
        // at this scope a Filter always sits directly over a single-table
        // scan, so the column's dtype is looked up off that table.
        let table_name = self.predicate.column.split('.').next().unwrap_or(&col);
        let dtype = engine
            .schema_of(table_name)
            .and_then(|schema| schema.column_index(&col).map(|i| schema.columns[i].dtype))
            .or_else(|| {
                rows.first()
                    .and_then(|row| row.get(&col))
                    .and_then(|v| v.type_of())
            });
        let literal = coerce_literal(&self.predicate.literal, dtype);

        Ok(rows
            .into_iter()
            .filter(|row| match row.get(&col) {
                Some(value) => compare(&self.predicate.op, value, &literal),
                None => false,
            })
            .collect())
    }
}
