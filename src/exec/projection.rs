//! Projection executor: expands `*`, and for each other select-list item
//! derives an output name (lower-cased; `AS alias` wins; `FUNC(x)` keeps
//! the call text; `t.c` becomes `c`) and a source name used to fetch the
//! value off the upstream row map.

use crate::engine::Engine;
use crate::error::ExecutionError;
use crate::exec::Executor;
use crate::row::RowMap;
use crate::sql::ast::Select;
use crate::value::SqlValue;

pub struct ProjectionExecutor {
    source: Box<dyn Executor>,
    select: Select,
}

impl ProjectionExecutor {
    pub fn new(source: Box<dyn Executor>, select: Select) -> Self {
        ProjectionExecutor { source, select }
    }
}

impl Executor for ProjectionExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        let rows = self.source.execute(engine)?;
        if rows.is_empty() {
            return Ok(rows);
        }

        let first_keys: Vec<String> = rows[0].keys().cloned().collect();
        let mut projections: Vec<(String, String)> = Vec::new();
        for item in &self.select.columns {
            if item.0 == "*" {
                projections.extend(first_keys.iter().map(|k| (k.clone(), k.clone())));
            } else {
                projections.push(project_names(&item.0));
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut out = RowMap::new();
                for (out_name, src_name) in &projections {
                    let value = row.get(src_name).cloned().unwrap_or(SqlValue::Null);
                    out.insert(out_name.clone(), value);
                }
                out
            })
            .collect())
    }
}

/// Splits one select-list expression into `(output_name, source_name)`.
fn project_names(expr: &str) -> (String, String) {
    if let Some(idx) = expr.find(" AS ") {
        let base = &expr[..idx];
        let alias = &expr[idx + " AS ".len()..];
        (alias.to_lowercase(), source_name(base))
    } else {
        (expr.to_lowercase(), source_name(expr))
    }
}

/// The row-map key an expression's value is fetched under. Function calls
/// keep their full lower-cased call text (GroupBy emits aggregates under
/// that key, e.g. `count(*)`); qualified names drop the table prefix.
fn source_name(expr: &str) -> String {
    if expr.contains('(') {
        expr.to_lowercase()
    } else if let Some(idx) = expr.rfind('.') {
        expr[idx + 1..].to_lowercase()
    } else {
        expr.to_lowercase()
    }
}
