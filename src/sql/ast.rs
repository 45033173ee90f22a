//! Typed AST produced by the parser.
//!
//! Select-list items, predicates, and ORDER/GROUP BY columns keep the
//! qualifier/alias/function-call text the parser saw rather than splitting
//! it into a structured expression tree; the projection and filter
//! executors pick it back apart.

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataType {
    pub name: String,
    pub args: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConstraint {
    pub name: String,
    pub ref_table: Option<String>,
    pub ref_column: Option<String>,
}

impl ColumnConstraint {
    pub fn simple(name: impl Into<String>) -> Self {
        ColumnConstraint {
            name: name.into(),
            ref_table: None,
            ref_column: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub dtype: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

/// The raw select-list expression text, e.g. `"id"`, `"t.c"`,
/// `"COUNT(*)"`, `"x AS alias"`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub column: String,
    pub op: String,
    pub literal: Literal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub left_table: String,
    pub right_table: String,
    pub right_alias: Option<String>,
    pub left_column: String,
    pub right_column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FromClause {
    Table(String),
    Join(Join),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub column: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub columns: Vec<SelectItem>,
    pub from: FromClause,
    pub where_clause: Option<BinaryExpression>,
    pub group_by: Option<Vec<String>>,
    pub having: Option<BinaryExpression>,
    pub order_by: Option<Vec<OrderByItem>>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub values: Vec<Literal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(String, Literal)>,
    pub where_clause: Option<BinaryExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub where_clause: Option<BinaryExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Create(CreateTable),
    Drop(DropTable),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Select(Select),
    ShowTables,
}
