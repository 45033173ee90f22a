//! CREATE TABLE / DROP TABLE / SHOW TABLES executors.

use crate::engine::{ColumnDef as EngineColumnDef, Engine};
use crate::error::ExecutionError;
use crate::exec::Executor;
use crate::row::RowMap;
use crate::sql::ast::CreateTable;
use crate::value::SqlValue;

pub struct CreateTableExecutor {
    create: CreateTable,
}

impl CreateTableExecutor {
    pub fn new(create: CreateTable) -> Self {
        CreateTableExecutor { create }
    }
}

impl Executor for CreateTableExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        let columns = self
            .create
            .columns
            .iter()
            .map(|col| EngineColumnDef {
                name: col.name.clone(),
                type_name: col.dtype.name.clone(),
                constraints: col.constraints.iter().map(|c| c.name.clone()).collect(),
            })
            .collect();
        engine
            .create_table(&self.create.name, columns)
            .map_err(ExecutionError::Engine)?;
        Ok(Vec::new())
    }
}

pub struct DropTableExecutor {
    table: String,
}

impl DropTableExecutor {
    pub fn new(table: String) -> Self {
        DropTableExecutor { table }
    }
}

impl Executor for DropTableExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        engine.drop_table(&self.table).map_err(ExecutionError::Engine)?;
        Ok(Vec::new())
    }
}

pub struct ShowTablesExecutor;

impl Executor for ShowTablesExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        Ok(engine
            .table_names()
            .into_iter()
            .map(|name| {
                let mut row = RowMap::new();
                row.insert("table_name", SqlValue::Text(name));
                row
            })
            .collect())
    }
}
