//! ORDER BY executor: stable sort by a list of `(column, direction)` pairs,
//! applied from the last key to the first so the first key is primary.
//! NULLs sort as the empty string.

use crate::engine::Engine;
use crate::error::ExecutionError;
use crate::exec::Executor;
use crate::row::RowMap;
use crate::sql::ast::OrderByItem;
use crate::value::SqlValue;

pub struct OrderByExecutor {
    source: Box<dyn Executor>,
    order_by: Vec<OrderByItem>,
}

impl OrderByExecutor {
    pub fn new(source: Box<dyn Executor>, order_by: Vec<OrderByItem>) -> Self {
        OrderByExecutor { source, order_by }
    }
}

impl Executor for OrderByExecutor {
    fn execute(&mut self, engine: &mut Engine) -> Result<Vec<RowMap>, ExecutionError> {
        let mut rows = self.source.execute(engine)?;
        if rows.is_empty() || self.order_by.is_empty() {
            return Ok(rows);
        }

        for item in self.order_by.iter().rev() {
            rows.sort_by(|a, b| {
                let va = a.get(&item.column).unwrap_or(&SqlValue::Null);
                let vb = b.get(&item.column).unwrap_or(&SqlValue::Null);
                let ord = compare_for_order(va, vb);
                if item.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }
        Ok(rows)
    }
}

/// Orders two sort-key values: NULL compares as the empty string,
/// same-typed numbers compare numerically, and anything else falls back
/// to lexicographic text.
fn compare_for_order(a: &SqlValue, b: &SqlValue) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (SqlValue::Null, SqlValue::Null) => Ordering::Equal,
        (SqlValue::Null, other) => "".cmp(&other.sort_key()),
        (other, SqlValue::Null) => other.sort_key().as_str().cmp(""),
        (SqlValue::Int(x), SqlValue::Int(y)) => x.cmp(y),
        (SqlValue::Float(x), SqlValue::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (SqlValue::Int(x), SqlValue::Float(y)) => {
            (*x as f64).partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (SqlValue::Float(x), SqlValue::Int(y)) => {
            x.partial_cmp(&(*y as f64)).unwrap_or(Ordering::Equal)
        }
        (a, b) => a.sort_key().cmp(&b.sort_key()),
    }
}
