//! Nested-loop INNER JOIN executor. On key collision between the two
//! sides, the left row's keys win.

use crate::engine::Engine;
use crate::error::ExecutionError;
use crate::exec::{bare_column_name, Executor};
use crate::row::RowMap;
use crate::sql::ast::Join;

pub struct JoinExecutor {
    join: Join,
}

impl JoinExecutor {
    pub fn new(join: Join) -> Self {
        JoinExecutor { join }
    }
}

impl Executor for JoinExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        let left_rows = engine
            .scan_table(&self.join.left_table)
            .map_err(ExecutionError::Engine)?;
        let right_rows = engine
            .scan_table(&self.join.right_table)
            .map_err(ExecutionError::Engine)?;

        let left_col = bare_column_name(&self.join.left_column).to_lowercase();
        let right_col = bare_column_name(&self.join.right_column).to_lowercase();

        let mut result = Vec::new();
        for lrow in &left_rows {
            let lval = lrow.get(&left_col);
            for rrow in &right_rows {
                if lval.is_some() && lval == rrow.get(&right_col) {
                    let mut combined = rrow.clone();
                    combined.merge_overwriting_with(lrow);
                    result.push(combined);
                }
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ColumnDef;
    use crate::value::SqlValue;

    fn engine_with_customers_and_orders() -> (Engine, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = Engine::open(dir.path().join("dbfile"), 512).unwrap();
        engine
            .create_table(
                "customers",
                vec![
                    ColumnDef {
                        name: "id".to_string(),
                        type_name: "INTEGER".to_string(),
                        constraints: vec![],
                    },
                    ColumnDef {
                        name: "name".to_string(),
                        type_name: "TEXT".to_string(),
                        constraints: vec![],
                    },
                ],
            )
            .unwrap();
        engine
            .create_table(
                "orders",
                vec![
                    ColumnDef {
                        name: "id".to_string(),
                        type_name: "INTEGER".to_string(),
                        constraints: vec![],
                    },
                    ColumnDef {
                        name: "customer_id".to_string(),
                        type_name: "INTEGER".to_string(),
                        constraints: vec![],
                    },
                    ColumnDef {
                        name: "total".to_string(),
                        type_name: "FLOAT".to_string(),
                        constraints: vec![],
                    },
                ],
            )
            .unwrap();
        engine
            .insert_row("customers", vec![SqlValue::Int(1), SqlValue::Text("Alice".to_string())])
            .unwrap();
        engine
            .insert_row("customers", vec![SqlValue::Int(2), SqlValue::Text("Bob".to_string())])
            .unwrap();
        engine
            .insert_row("orders", vec![SqlValue::Int(100), SqlValue::Int(1), SqlValue::Float(9.5)])
            .unwrap();
        engine
            .insert_row("orders", vec![SqlValue::Int(101), SqlValue::Int(1), SqlValue::Float(4.0)])
            .unwrap();
        engine
            .insert_row("orders", vec![SqlValue::Int(102), SqlValue::Int(2), SqlValue::Float(1.0)])
            .unwrap();
        (engine, dir)
    }

    #[test]
    fn inner_join_produces_one_row_per_match_with_left_precedence() {
        let (mut engine, _dir) = engine_with_customers_and_orders();
        let mut join = JoinExecutor::new(Join {
            left_table: "customers".to_string(),
            right_table: "orders".to_string(),
            right_alias: None,
            left_column: "id".to_string(),
            right_column: "customer_id".to_string(),
        });
        let rows = join.execute(&mut engine).unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            // The left table's `id` always wins over the right's `id` column.
            assert!(matches!(row.get("id"), Some(SqlValue::Int(1)) | Some(SqlValue::Int(2))));
        }
    }
}
