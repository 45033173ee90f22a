//! Pull-based (volcano-style) executor tree.
//!
//! Every operator's `execute` consumes all rows from its source(s) and
//! materializes a `Vec<RowMap>`; there is no lazy/streaming evaluation.

mod ddl;
mod dml;
mod groupby;
mod join;
mod orderby;
mod projection;
mod scan;

pub use ddl::{CreateTableExecutor, DropTableExecutor, ShowTablesExecutor};
pub use dml::{DeleteExecutor, InsertExecutor, UpdateExecutor};
pub use groupby::GroupByExecutor;
pub use join::JoinExecutor;
pub use orderby::OrderByExecutor;
pub use projection::ProjectionExecutor;
pub use scan::{FilterExecutor, TableScanExecutor};

use crate::engine::Engine;
use crate::error::ExecutionError;
use crate::plan::LogicalPlan;
use crate::row::RowMap;
use crate::sql::ast::{Select, Statement};
use crate::value::SqlValue;

pub trait Executor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError>;
}

/// Slices `offset`/`limit` are applied last, by wrapping this trait object.
struct LimitExecutor {
    source: Box<dyn Executor>,
    offset: usize,
    limit: Option<usize>,
}

impl Executor for LimitExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        let rows = self.source.execute(engine)?;
        let start = self.offset.min(rows.len());
        let end = match self.limit {
            Some(limit) => (start + limit).min(rows.len()),
            None => rows.len(),
        };
        Ok(rows[start..end].to_vec())
    }
}

/// Builds and runs the executor tree for one parsed statement, returning
/// row maps for `SELECT`/`SHOW TABLES`, or summary rows (e.g.
/// `{"updated": n}`) for DML.
pub fn execute_statement(
    engine: &mut Engine,
    statement: Statement,
) -> Result<Vec<RowMap>, ExecutionError> {
    match statement {
        Statement::Create(create) => {
            let mut exec = CreateTableExecutor::new(create);
            exec.execute(engine)
        }
        Statement::Drop(drop) => {
            let mut exec = DropTableExecutor::new(drop.name);
            exec.execute(engine)
        }
        Statement::Insert(insert) => {
            let mut exec = InsertExecutor::new(insert.table, insert.values);
            exec.execute(engine)
        }
        Statement::Update(update) => {
            let mut exec = UpdateExecutor::new(update.table, update.assignments, update.where_clause);
            exec.execute(engine)
        }
        Statement::Delete(delete) => {
            let mut exec = DeleteExecutor::new(delete.table, delete.where_clause);
            exec.execute(engine)
        }
        Statement::ShowTables => {
            let mut exec = ShowTablesExecutor;
            exec.execute(engine)
        }
        Statement::Select(select) => {
            let mut root = build_select_executor(select);
            root.execute(engine)
        }
    }
}

fn build_select_executor(select: Select) -> Box<dyn Executor> {
    let plan = crate::plan::plan_select(select.clone());
    let source = build_plan_executor(plan);

    // When grouping, GroupBy consumes the pre-projection rows directly (it
    // needs the raw column values, not the output-named projection) and
    // itself emits the already-shaped output row (grouping columns +
    // `count(*)`), so no separate Projection wraps the source in that case.
    let grouped: Box<dyn Executor> = match &select.group_by {
        Some(group_cols) => Box::new(GroupByExecutor::new(source, group_cols.clone())),
        None => Box::new(ProjectionExecutor::new(source, select.clone())),
    };

    let ordered: Box<dyn Executor> = match &select.order_by {
        Some(items) => Box::new(OrderByExecutor::new(grouped, items.clone())),
        None => grouped,
    };

    if select.limit.is_some() || select.offset.is_some() {
        Box::new(LimitExecutor {
            source: ordered,
            offset: select.offset.unwrap_or(0),
            limit: select.limit,
        })
    } else {
        ordered
    }
}

fn build_plan_executor(plan: LogicalPlan) -> Box<dyn Executor> {
    match plan {
        LogicalPlan::Scan { table } => Box::new(TableScanExecutor::new(table)),
        LogicalPlan::JoinScan(join) => Box::new(JoinExecutor::new(join)),
        LogicalPlan::Filter { source, predicate } => {
            Box::new(FilterExecutor::new(build_plan_executor(*source), predicate))
        }
        LogicalPlan::Projection { source, .. } => build_plan_executor(*source),
        other => unreachable!("{other:?} is not a SELECT source node"),
    }
}

/// Coerces a parsed literal to `dtype` when possible, falling back to the
/// literal's natural type on failure (mirrors the source's
/// try-coerce-else-fall-back-to-raw behavior for WHERE/HAVING literals).
fn coerce_literal(
    literal: &crate::sql::ast::Literal,
    dtype: Option<crate::catalog::schema::ColumnType>,
) -> SqlValue {
    let raw = match literal {
        crate::sql::ast::Literal::Int(i) => SqlValue::Int(*i),
        crate::sql::ast::Literal::Float(f) => SqlValue::Float(*f),
        crate::sql::ast::Literal::Text(s) => SqlValue::Text(s.clone()),
        crate::sql::ast::Literal::Null => SqlValue::Null,
    };
    match dtype {
        Some(dtype) => raw.coerce(dtype).unwrap_or(raw),
        None => raw,
    }
}

fn bare_column_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn compare(op: &str, left: &SqlValue, right: &SqlValue) -> bool {
    use std::cmp::Ordering;
    let ord = match (left, right) {
        (SqlValue::Int(a), SqlValue::Int(b)) => a.partial_cmp(b),
        (SqlValue::Float(a), SqlValue::Float(b)) => a.partial_cmp(b),
        (SqlValue::Int(a), SqlValue::Float(b)) => (*a as f64).partial_cmp(b),
        (SqlValue::Float(a), SqlValue::Int(b)) => a.partial_cmp(&(*b as f64)),
        (SqlValue::Text(a), SqlValue::Text(b)) => a.partial_cmp(b),
        _ => None,
    };
    match op {
        "=" => left == right,
        "!=" => left != right,
        "<" => matches!(ord, Some(Ordering::Less)),
        ">" => matches!(ord, Some(Ordering::Greater)),
        "<=" => matches!(ord, Some(Ordering::Less) | Some(Ordering::Equal)),
        ">=" => matches!(ord, Some(Ordering::Greater) | Some(Ordering::Equal)),
        _ => false,
    }
}
