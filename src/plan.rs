//! Tagged logical plan nodes.
//!
//! The raw `Join` AST node and `CreateTable` AST are threaded through
//! untransformed; everything else becomes a plan node so the executor
//! builder has a uniform tree to walk.

use crate::sql::ast::{BinaryExpression, CreateTable, Join, Literal, Select};

#[derive(Debug, Clone)]
pub enum LogicalPlan {
    Scan {
        table: String,
    },
    JoinScan(Join),
    Filter {
        source: Box<LogicalPlan>,
        predicate: BinaryExpression,
    },
    Projection {
        source: Box<LogicalPlan>,
        select: Select,
    },
    Insert {
        table: String,
        values: Vec<Literal>,
    },
    Update {
        table: String,
        assignments: Vec<(String, Literal)>,
        predicate: Option<BinaryExpression>,
    },
    Delete {
        table: String,
        predicate: Option<BinaryExpression>,
    },
    Drop {
        table: String,
    },
    Create(CreateTable),
    ShowTables,
}

/// Builds the logical plan for a `Select`: `Join → Filter? →
/// Projection` when the source is a join, else `Scan → Filter? →
/// Projection`. The `Projection` node retains the parent `Select` so the
/// executor builder can wrap it with GroupBy / OrderBy / Limit.
pub fn plan_select(select: Select) -> LogicalPlan {
    use crate::sql::ast::FromClause;

    let source: LogicalPlan = match &select.from {
        FromClause::Table(name) => LogicalPlan::Scan { table: name.clone() },
        FromClause::Join(join) => LogicalPlan::JoinScan(join.clone()),
    };

    let filtered = match &select.where_clause {
        Some(predicate) => LogicalPlan::Filter {
            source: Box::new(source),
            predicate: predicate.clone(),
        },
        None => source,
    };

    LogicalPlan::Projection {
        source: Box::new(filtered),
        select,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::ast::FromClause;

    #[test]
    fn builds_scan_filter_projection_for_plain_select() {
        let select = Select {
            columns: vec![],
            from: FromClause::Table("users".to_string()),
            where_clause: Some(BinaryExpression {
                column: "age".to_string(),
                op: ">".to_string(),
                literal: Literal::Int(28),
            }),
            group_by: None,
            having: None,
            order_by: None,
            limit: None,
            offset: None,
        };
        let plan = plan_select(select);
        match plan {
            LogicalPlan::Projection { source, .. } => match *source {
                LogicalPlan::Filter { source, .. } => {
                    assert!(matches!(*source, LogicalPlan::Scan { .. }));
                }
                _ => panic!("expected Filter"),
            },
            _ => panic!("expected Projection"),
        }
    }
}
