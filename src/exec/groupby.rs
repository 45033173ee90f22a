//! GROUP BY executor: partitions rows by a tuple of grouping-column values
//! and emits one row per group with `count(*)`. `HAVING` is accepted by
//! the parser but not applied here yet.

use std::collections::HashMap;

use crate::engine::Engine;
use crate::error::ExecutionError;
use crate::exec::{bare_column_name, Executor};
use crate::row::RowMap;
use crate::value::SqlValue;

pub struct GroupByExecutor {
    source: Box<dyn Executor>,
    group_by: Vec<String>,
}

impl GroupByExecutor {
    pub fn new(source: Box<dyn Executor>, group_by: Vec<String>) -> Self {
        GroupByExecutor { source, group_by }
    }
}

impl Executor for GroupByExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        let rows = self.source.execute(engine)?;
        if rows.is_empty() {
            return Ok(rows);
        }

        let group_cols: Vec<String> = self
            .group_by
            .iter()
            .map(|c| bare_column_name(c).to_lowercase())
            .collect();

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<RowMap>> = HashMap::new();
        for row in rows {
            let key: String = group_cols
                .iter()
                .map(|col| row.get(col).map(|v| v.sort_key()).unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\u{0}");
            if !groups.contains_key(&key) {
                order.push(key.clone());
            }
            groups.entry(key).or_default().push(row);
        }

        let mut result = Vec::with_capacity(order.len());
        for key in order {
            let group_rows = &groups[&key];
            let mut agg = RowMap::new();
            for col in &group_cols {
                let value = group_rows[0].get(col).cloned().unwrap_or(SqlValue::Null);
                agg.insert(col.clone(), value);
            }
            agg.insert("count(*)", SqlValue::Int(group_rows.len() as i64));
            result.push(agg);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ColumnDef;
    use crate::exec::scan::TableScanExecutor;

    fn engine_with_sales() -> (Engine, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = Engine::open(dir.path().join("dbfile"), 512).unwrap();
        engine
            .create_table(
                "sales",
                vec![
                    ColumnDef {
                        name: "product".to_string(),
                        type_name: "TEXT".to_string(),
                        constraints: vec![],
                    },
                    ColumnDef {
                        name: "amount".to_string(),
                        type_name: "INTEGER".to_string(),
                        constraints: vec![],
                    },
                ],
            )
            .unwrap();
        for (product, amount) in [("Apple", 10), ("Apple", 20), ("Orange", 15)] {
            engine
                .insert_row(
                    "sales",
                    vec![SqlValue::Text(product.to_string()), SqlValue::Int(amount)],
                )
                .unwrap();
        }
        (engine, dir)
    }

    #[test]
    fn groups_by_product_with_counts() {
        let (mut engine, _dir) = engine_with_sales();
        let mut group_by = GroupByExecutor::new(
            Box::new(TableScanExecutor::new("sales".to_string())),
            vec!["product".to_string()],
        );
        let rows = group_by.execute(&mut engine).unwrap();
        assert_eq!(rows.len(), 2);
        let total: i64 = rows
            .iter()
            .map(|r| match r.get("count(*)") {
                Some(SqlValue::Int(n)) => *n,
                _ => 0,
            })
            .sum();
        assert_eq!(total, 3);
    }
}
