//! The SQL front end: tokenizer, AST, and recursive-descent parser.

pub mod ast;
pub mod parser;
pub mod tokenizer;

use crate::error::ParseError;
use ast::Statement;

/// Tokenizes and parses `sql`, returning the statement and whether a
/// trailing semicolon was present (its absence is a warning, not an
/// error).
pub fn parse(sql: &str) -> Result<(Statement, bool), ParseError> {
    let tokens = tokenizer::Tokenizer::new(sql).tokenize()?;
    parser::Parser::new(tokens).parse()
}
