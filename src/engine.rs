//! The engine façade: the single owner of the pager and catalog, and the
//! only thing that touches on-disk bytes.

use std::path::Path;

use crate::catalog::schema::{ColumnSchema, ColumnType, TableSchema};
use crate::catalog::table::Table;
use crate::catalog::Catalog;
use crate::error::{ConstraintViolation, EngineError, SchemaError};
use crate::row::RowMap;
use crate::storage::row_page::RowPage;
use crate::storage::{record, Pager};
use crate::value::SqlValue;

pub struct Engine {
    pager: Pager,
    catalog: Catalog,
}

/// One column definition as parsed off a `CREATE TABLE` statement, before
/// it has been turned into a `ColumnSchema`.
pub struct ColumnDef {
    pub name: String,
    pub type_name: String,
    pub constraints: Vec<String>,
}

impl Engine {
    pub fn open(path: impl AsRef<Path>, page_size: usize) -> Result<Self, EngineError> {
        Ok(Engine {
            pager: Pager::open(path, page_size)?,
            catalog: Catalog::new(),
        })
    }

    pub fn table_names(&self) -> Vec<String> {
        self.catalog.table_names()
    }

    pub fn schema_of(&self, name: &str) -> Option<&TableSchema> {
        self.catalog.get(name).map(|t| &t.schema)
    }

    pub fn create_table(&mut self, name: &str, columns: Vec<ColumnDef>) -> Result<(), EngineError> {
        let upper_name = name.to_uppercase();
        if self.catalog.contains(&upper_name) {
            return Err(EngineError::other(format!(
                "table '{upper_name}' already exists"
            )));
        }

        let mut column_schemas = Vec::with_capacity(columns.len());
        for col in columns {
            if column_schemas
                .iter()
                .any(|c: &ColumnSchema| c.name.eq_ignore_ascii_case(&col.name))
            {
                return Err(SchemaError::DuplicateColumn(col.name).into());
            }
            let dtype = resolve_column_type(&col.type_name)?;
            let upper_constraints: Vec<String> =
                col.constraints.iter().map(|c| c.to_uppercase()).collect();
            let primary_key = upper_constraints.iter().any(|c| c == "PRIMARY_KEY");
            let not_null = primary_key || upper_constraints.iter().any(|c| c == "NOT_NULL");
            column_schemas.push(ColumnSchema {
                name: col.name,
                dtype,
                not_null,
                primary_key,
            });
        }

        let first_page = self.catalog.allocate_page_id();
        let schema = TableSchema {
            name: upper_name.clone(),
            columns: column_schemas,
            first_page: Some(first_page),
        };
        self.catalog.insert(Table::new(schema, first_page));

        let page = self.pager.get_page(first_page)?;
        page.clear();
        self.pager.flush_page(first_page)?;
        Ok(())
    }

    pub fn drop_table(&mut self, name: &str) -> Result<(), EngineError> {
        let table = self
            .catalog
            .get(name)
            .ok_or_else(|| EngineError::other(format!("table '{name}' does not exist")))?;
        let first_page = table.first_page;
        self.catalog.remove(name);
        let page = self.pager.get_page(first_page)?;
        page.clear();
        self.pager.flush_page(first_page)?;
        Ok(())
    }

    pub fn insert_row(&mut self, name: &str, values: Vec<SqlValue>) -> Result<(), EngineError> {
        let schema = self
            .catalog
            .get(name)
            .ok_or_else(|| EngineError::other(format!("table '{name}' does not exist")))?
            .schema
            .clone();

        if values.len() != schema.columns.len() {
            return Err(SchemaError::ArityMismatch {
                expected: schema.columns.len(),
                got: values.len(),
            }
            .into());
        }

        let mut coerced = Vec::with_capacity(values.len());
        for (col, value) in schema.columns.iter().zip(values.into_iter()) {
            let value = value.coerce(col.dtype)?;
            if value.is_null() && col.not_null {
                return Err(ConstraintViolation::NotNull {
                    column: col.name.clone(),
                }
                .into());
            }
            coerced.push(value);
        }
        if coerced.iter().all(|v| v.is_null()) {
            return Err(ConstraintViolation::AllNull.into());
        }

        if let Some(pk) = schema.primary_key_column() {
            let pk_index = schema.column_index(&pk.name).unwrap();
            let new_pk_value = &coerced[pk_index];
            for row in self.scan_table_raw(name)? {
                if &row[pk_index] == new_pk_value {
                    return Err(ConstraintViolation::DuplicatePrimaryKey {
                        column: pk.name.clone(),
                    }
                    .into());
                }
            }
        }

        let body = record::encode_row(&schema, &coerced)?;
        let (start, end) = self
            .catalog
            .page_range(name)
            .expect("table exists in catalog");

        for page_num in start..end {
            let page = self.pager.get_page(page_num)?;
            let mut row_page = RowPage::open(page)?;
            if row_page.add_row(&body)? {
                self.pager.flush_page(page_num)?;
                return Ok(());
            }
        }

        let new_page_num = self.catalog.allocate_page_id();
        let page = self.pager.get_page(new_page_num)?;
        page.clear();
        let mut row_page = RowPage::open(page)?;
        if !row_page.add_row(&body)? {
            return Err(EngineError::other(
                "row does not fit even on a fresh page",
            ));
        }
        self.pager.flush_page(new_page_num)?;
        Ok(())
    }

    /// Yields live rows as raw value vectors, in page/slot order.
    fn scan_table_raw(&mut self, name: &str) -> Result<Vec<Vec<SqlValue>>, EngineError> {
        let schema = self
            .catalog
            .get(name)
            .ok_or_else(|| EngineError::other(format!("table '{name}' does not exist")))?
            .schema
            .clone();
        let (start, end) = self
            .catalog
            .page_range(name)
            .expect("table exists in catalog");

        let mut rows = Vec::new();
        for page_num in start..end {
            let page = self.pager.get_page(page_num)?;
            let row_page = RowPage::open(page)?;
            for body in row_page.get_rows()? {
                rows.push(record::decode_row(&schema, &body)?);
            }
        }
        Ok(rows)
    }

    pub fn scan_table(&mut self, name: &str) -> Result<Vec<RowMap>, EngineError> {
        let schema = self
            .catalog
            .get(name)
            .ok_or_else(|| EngineError::other(format!("table '{name}' does not exist")))?
            .schema
            .clone();
        self.scan_table_raw(name)
            .map(|rows| rows.into_iter().map(|row| to_row_map(&schema, row)).collect())
    }

    /// Applies `set_values` to every row matching `where_fn`. Same-length
    /// replacement only: a size change fails the whole statement.
    pub fn update_rows(
        &mut self,
        name: &str,
        set_values: &[(String, SqlValue)],
        where_fn: &dyn Fn(&RowMap) -> bool,
    ) -> Result<usize, EngineError> {
        let schema = self
            .catalog
            .get(name)
            .ok_or_else(|| EngineError::other(format!("table '{name}' does not exist")))?
            .schema
            .clone();
        let (start, end) = self
            .catalog
            .page_range(name)
            .expect("table exists in catalog");

        let mut updated = 0;
        for page_num in start..end {
            let page = self.pager.get_page(page_num)?;
            let mut row_page = RowPage::open(page)?;
            let bodies = row_page.get_rows()?;
            let mut dirty = false;
            for (slot_index, body) in bodies.iter().enumerate() {
                let mut values = record::decode_row(&schema, body)?;
                let row_map = to_row_map(&schema, values.clone());
                if !where_fn(&row_map) {
                    continue;
                }
                for (col_name, new_value) in set_values {
                    let idx = schema.column_index(col_name).ok_or_else(|| {
                        EngineError::other(format!("column '{col_name}' does not exist"))
                    })?;
                    let col = &schema.columns[idx];
                    let coerced = new_value.coerce(col.dtype)?;
                    if coerced.is_null() && col.not_null {
                        return Err(ConstraintViolation::NotNull {
                            column: col.name.clone(),
                        }
                        .into());
                    }
                    values[idx] = coerced;
                }
                let new_body = record::encode_row(&schema, &values)?;
                if !row_page.update_row(slot_index, &new_body)? {
                    return Err(EngineError::other("in-place update failed"));
                }
                updated += 1;
                dirty = true;
            }
            if dirty {
                self.pager.flush_page(page_num)?;
            }
        }
        Ok(updated)
    }

    pub fn delete_rows(
        &mut self,
        name: &str,
        where_fn: &dyn Fn(&RowMap) -> bool,
    ) -> Result<usize, EngineError> {
        let schema = self
            .catalog
            .get(name)
            .ok_or_else(|| EngineError::other(format!("table '{name}' does not exist")))?
            .schema
            .clone();
        let (start, end) = self
            .catalog
            .page_range(name)
            .expect("table exists in catalog");

        let mut deleted = 0;
        for page_num in start..end {
            let page = self.pager.get_page(page_num)?;
            let mut row_page = RowPage::open(page)?;
            let bodies = row_page.get_rows()?;
            let mut dirty = false;
            for (slot_index, body) in bodies.iter().enumerate() {
                let values = record::decode_row(&schema, body)?;
                let row_map = to_row_map(&schema, values);
                if !where_fn(&row_map) {
                    continue;
                }
                row_page.delete_row(slot_index)?;
                deleted += 1;
                dirty = true;
            }
            if dirty {
                self.pager.flush_page(page_num)?;
            }
        }
        Ok(deleted)
    }
}

fn to_row_map(schema: &TableSchema, values: Vec<SqlValue>) -> RowMap {
    schema
        .columns
        .iter()
        .zip(values.into_iter())
        .map(|(col, value)| (col.name.to_lowercase(), value))
        .collect()
}

/// Resolves a parsed SQL type name to an internal dtype. Only the
/// int/text/float families are actually stored; other recognized SQL type
/// names parse but fail here rather than at parse time.
fn resolve_column_type(type_name: &str) -> Result<ColumnType, EngineError> {
    let upper = type_name.to_uppercase();
    let base = upper.split('(').next().unwrap_or(&upper);
    match base {
        "INT" | "INTEGER" => Ok(ColumnType::Int),
        "TEXT" | "STRING" | "VARCHAR" => Ok(ColumnType::Text),
        "FLOAT" | "REAL" => Ok(ColumnType::Float),
        _ => Err(SchemaError::UnsupportedType(type_name.to_string()).into()),
    }
}
