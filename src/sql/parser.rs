//! Recursive-descent parser, one-token lookahead.

use crate::error::ParseError;
use crate::sql::ast::*;
use crate::sql::tokenizer::{Token, TokenType};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, ttype: TokenType, value: Option<&str>) -> Result<Token, ParseError> {
        let tok = self.advance();
        let value_matches = match value {
            Some(v) => tok.value.eq_ignore_ascii_case(v),
            None => true,
        };
        if tok.ttype != ttype || !value_matches {
            return Err(ParseError::UnexpectedToken {
                expected: format!("{:?} {:?}", ttype, value),
                got: format!("{:?} {:?}", tok.ttype, tok.value),
            });
        }
        Ok(tok)
    }

    fn at_symbol(&self, value: &str) -> bool {
        self.peek().ttype == TokenType::Symbol && self.peek().value == value
    }

    fn at_keyword(&self, value: &str) -> bool {
        self.peek().ttype == TokenType::Keyword && self.peek().value.eq_ignore_ascii_case(value)
    }

    fn consume_optional_semicolon(&mut self) {
        if self.at_symbol(";") {
            self.advance();
        }
    }

    /// Parses one statement, returning whether the input had a trailing
    /// semicolon so the caller can surface the "missing semicolon" warning.
    pub fn parse(mut self) -> Result<(Statement, bool), ParseError> {
        let statement = self.parse_statement()?;
        let had_semicolon = self.tokens[..self.pos]
            .iter()
            .rev()
            .find(|t| t.ttype != TokenType::Eof)
            .map(|t| t.ttype == TokenType::Symbol && t.value == ";")
            .unwrap_or(false);
        Ok((statement, had_semicolon))
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let tok = self.peek().clone();
        if tok.value.eq_ignore_ascii_case("CREATE") {
            Ok(Statement::Create(self.parse_create()?))
        } else if tok.value.eq_ignore_ascii_case("DROP") {
            Ok(Statement::Drop(self.parse_drop()?))
        } else if tok.value.eq_ignore_ascii_case("INSERT") {
            Ok(Statement::Insert(self.parse_insert()?))
        } else if tok.value.eq_ignore_ascii_case("UPDATE") {
            Ok(Statement::Update(self.parse_update()?))
        } else if tok.value.eq_ignore_ascii_case("DELETE") {
            Ok(Statement::Delete(self.parse_delete()?))
        } else if tok.value.eq_ignore_ascii_case("SELECT") {
            Ok(Statement::Select(self.parse_select()?))
        } else if tok.value.eq_ignore_ascii_case("SHOW") {
            self.parse_show_tables()?;
            Ok(Statement::ShowTables)
        } else {
            Err(ParseError::UnsupportedStatement(tok.value))
        }
    }

    fn parse_create(&mut self) -> Result<CreateTable, ParseError> {
        self.expect(TokenType::Keyword, Some("CREATE"))?;
        self.expect(TokenType::Keyword, Some("TABLE"))?;
        let name = self.expect(TokenType::Identifier, None)?.value;
        self.expect(TokenType::Symbol, Some("("))?;

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_def()?);
            if self.at_symbol(")") {
                self.advance();
                break;
            }
            self.expect(TokenType::Symbol, Some(","))?;
        }
        self.consume_optional_semicolon();
        Ok(CreateTable { name, columns })
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.expect(TokenType::Identifier, None)?.value;
        let type_tok = self.advance();
        let dtype_name = type_tok.value.to_uppercase();
        let mut args = Vec::new();
        if dtype_name == "VARCHAR" {
            self.expect(TokenType::Symbol, Some("("))?;
            let size_tok = self.expect(TokenType::Literal, None)?;
            let size: i64 = size_tok.value.parse().map_err(|_| ParseError::UnexpectedToken {
                expected: "integer".to_string(),
                got: size_tok.value,
            })?;
            self.expect(TokenType::Symbol, Some(")"))?;
            args.push(size);
        }
        let dtype = DataType {
            name: dtype_name,
            args,
        };

        let mut constraints = Vec::new();
        while self.peek().ttype == TokenType::Keyword {
            let kw = self.peek().value.to_uppercase();
            match kw.as_str() {
                "PRIMARY" => {
                    self.advance();
                    self.expect(TokenType::Keyword, Some("KEY"))?;
                    constraints.push(ColumnConstraint::simple("PRIMARY_KEY"));
                }
                "NOT" => {
                    self.advance();
                    self.expect(TokenType::Keyword, Some("NULL"))?;
                    constraints.push(ColumnConstraint::simple("NOT_NULL"));
                }
                "UNIQUE" => {
                    self.advance();
                    constraints.push(ColumnConstraint::simple("UNIQUE"));
                }
                "AUTO_INCREMENT" => {
                    self.advance();
                    constraints.push(ColumnConstraint::simple("AUTO_INCREMENT"));
                }
                "REFERENCES" => {
                    self.advance();
                    let ref_table = self.expect(TokenType::Identifier, None)?.value;
                    self.expect(TokenType::Symbol, Some("("))?;
                    let ref_col = self.expect(TokenType::Identifier, None)?.value;
                    self.expect(TokenType::Symbol, Some(")"))?;
                    constraints.push(ColumnConstraint {
                        name: "FOREIGN_KEY".to_string(),
                        ref_table: Some(ref_table),
                        ref_column: Some(ref_col),
                    });
                }
                _ => break,
            }
        }
        Ok(ColumnDef {
            name,
            dtype,
            constraints,
        })
    }

    fn parse_drop(&mut self) -> Result<DropTable, ParseError> {
        self.expect(TokenType::Keyword, Some("DROP"))?;
        self.expect(TokenType::Keyword, Some("TABLE"))?;
        let name = self.expect(TokenType::Identifier, None)?.value;
        self.consume_optional_semicolon();
        Ok(DropTable { name })
    }

    fn parse_literal_value(&mut self) -> Result<Literal, ParseError> {
        if self.peek().ttype == TokenType::Keyword && self.peek().value.eq_ignore_ascii_case("NULL") {
            self.advance();
            return Ok(Literal::Null);
        }
        let tok = self.advance();
        if tok.ttype != TokenType::Literal {
            return Err(ParseError::UnexpectedToken {
                expected: "literal or NULL".to_string(),
                got: format!("{:?} {:?}", tok.ttype, tok.value),
            });
        }
        Ok(parse_literal_text(&tok.value))
    }

    fn parse_insert(&mut self) -> Result<Insert, ParseError> {
        self.expect(TokenType::Keyword, Some("INSERT"))?;
        self.expect(TokenType::Keyword, Some("INTO"))?;
        let table = self.expect(TokenType::Identifier, None)?.value;
        self.expect(TokenType::Keyword, Some("VALUES"))?;
        self.expect(TokenType::Symbol, Some("("))?;

        let mut values = Vec::new();
        loop {
            values.push(self.parse_literal_value()?);
            if self.at_symbol(")") {
                self.advance();
                break;
            }
            self.expect(TokenType::Symbol, Some(","))?;
        }
        self.consume_optional_semicolon();
        Ok(Insert { table, values })
    }

    fn parse_update(&mut self) -> Result<Update, ParseError> {
        self.expect(TokenType::Keyword, Some("UPDATE"))?;
        let table = self.expect(TokenType::Identifier, None)?.value;
        self.expect(TokenType::Keyword, Some("SET"))?;

        let mut assignments = Vec::new();
        loop {
            let col = self.expect(TokenType::Identifier, None)?.value;
            self.expect(TokenType::Symbol, Some("="))?;
            let val = self.parse_literal_value()?;
            assignments.push((col, val));
            if !self.at_symbol(",") {
                break;
            }
            self.advance();
        }

        let where_clause = if self.at_keyword("WHERE") {
            self.advance();
            Some(self.parse_binary_expression()?)
        } else {
            None
        };
        self.consume_optional_semicolon();
        Ok(Update {
            table,
            assignments,
            where_clause,
        })
    }

    fn parse_delete(&mut self) -> Result<Delete, ParseError> {
        self.expect(TokenType::Keyword, Some("DELETE"))?;
        self.expect(TokenType::Keyword, Some("FROM"))?;
        let table = self.expect(TokenType::Identifier, None)?.value;
        let where_clause = if self.at_keyword("WHERE") {
            self.advance();
            Some(self.parse_binary_expression()?)
        } else {
            None
        };
        self.consume_optional_semicolon();
        Ok(Delete { table, where_clause })
    }

    fn parse_qualified_name(&mut self, first: String) -> Result<String, ParseError> {
        if self.at_symbol(".") {
            self.advance();
            let rest = self.expect(TokenType::Identifier, None)?.value;
            Ok(format!("{first}.{rest}"))
        } else {
            Ok(first)
        }
    }

    fn parse_select(&mut self) -> Result<Select, ParseError> {
        self.expect(TokenType::Keyword, Some("SELECT"))?;
        let mut columns = Vec::new();
        loop {
            let tok = self.advance();
            if tok.ttype != TokenType::Identifier && tok.value != "*" {
                return Err(ParseError::UnexpectedToken {
                    expected: "column name or '*'".to_string(),
                    got: format!("{:?} {:?}", tok.ttype, tok.value),
                });
            }
            let mut col_name = tok.value.clone();
            if self.at_symbol(".") {
                self.advance();
                let next = self.expect(TokenType::Identifier, None)?.value;
                col_name = format!("{col_name}.{next}");
            }
            if self.at_symbol("(") {
                self.advance();
                let inner = self.advance().value;
                self.expect(TokenType::Symbol, Some(")"))?;
                col_name = format!("{col_name}({inner})");
            }
            if self.at_keyword("AS") {
                self.advance();
                let alias = self.expect(TokenType::Identifier, None)?.value;
                col_name = format!("{col_name} AS {alias}");
            }
            columns.push(SelectItem(col_name));

            if self.at_keyword("FROM") {
                break;
            } else if self.at_symbol(",") {
                self.advance();
            } else {
                return Err(ParseError::UnexpectedToken {
                    expected: "',' or FROM".to_string(),
                    got: format!("{:?} {:?}", self.peek().ttype, self.peek().value),
                });
            }
        }

        self.expect(TokenType::Keyword, Some("FROM"))?;
        let table_name = self.expect(TokenType::Identifier, None)?.value;

        // A bare identifier here is a table alias. Parsed, then discarded:
        // the rest of the pipeline resolves columns to bare table names.
        if self.peek().ttype == TokenType::Identifier {
            self.advance();
        }

        let mut from = FromClause::Table(table_name.clone());
        if self.at_keyword("INNER") {
            self.advance();
            self.expect(TokenType::Keyword, Some("JOIN"))?;
            let right_table = self.expect(TokenType::Identifier, None)?.value;
            let right_alias = if self.peek().ttype == TokenType::Identifier {
                Some(self.advance().value)
            } else {
                None
            };
            self.expect(TokenType::Keyword, Some("ON"))?;
            let left_first = self.expect(TokenType::Identifier, None)?.value;
            let left_col = self.parse_qualified_name(left_first)?;
            self.expect(TokenType::Symbol, Some("="))?;
            let right_first = self.expect(TokenType::Identifier, None)?.value;
            let right_col = self.parse_qualified_name(right_first)?;
            from = FromClause::Join(Join {
                left_table: table_name,
                right_table,
                right_alias,
                left_column: left_col,
                right_column: right_col,
            });
        }

        let where_clause = if self.at_keyword("WHERE") {
            self.advance();
            Some(self.parse_binary_expression()?)
        } else {
            None
        };

        let group_by = if self.at_keyword("GROUP") {
            self.advance();
            self.expect(TokenType::Keyword, Some("BY"))?;
            let mut cols = Vec::new();
            loop {
                let first = self.expect(TokenType::Identifier, None)?.value;
                cols.push(self.parse_qualified_name(first)?);
                if !self.at_symbol(",") {
                    break;
                }
                self.advance();
            }
            Some(cols)
        } else {
            None
        };

        let having = if self.at_keyword("HAVING") {
            self.advance();
            Some(self.parse_binary_expression()?)
        } else {
            None
        };

        let order_by = if self.at_keyword("ORDER") {
            self.advance();
            self.expect(TokenType::Keyword, Some("BY"))?;
            let mut items = Vec::new();
            loop {
                let first = self.expect(TokenType::Identifier, None)?.value;
                let col = self.parse_qualified_name(first)?;
                let descending = if self.at_keyword("DESC") {
                    self.advance();
                    true
                } else if self.at_keyword("ASC") {
                    self.advance();
                    false
                } else {
                    false
                };
                items.push(OrderByItem {
                    column: col.to_lowercase(),
                    descending,
                });
                if !self.at_symbol(",") {
                    break;
                }
                self.advance();
            }
            Some(items)
        } else {
            None
        };

        let limit = if self.at_keyword("LIMIT") {
            self.advance();
            let tok = self.expect(TokenType::Literal, None)?;
            Some(tok.value.parse::<usize>().map_err(|_| ParseError::UnexpectedToken {
                expected: "integer".to_string(),
                got: tok.value,
            })?)
        } else {
            None
        };

        let offset = if self.at_keyword("OFFSET") {
            self.advance();
            let tok = self.expect(TokenType::Literal, None)?;
            Some(tok.value.parse::<usize>().map_err(|_| ParseError::UnexpectedToken {
                expected: "integer".to_string(),
                got: tok.value,
            })?)
        } else {
            None
        };

        self.consume_optional_semicolon();
        Ok(Select {
            columns,
            from,
            where_clause,
            group_by,
            having,
            order_by,
            limit,
            offset,
        })
    }

    fn parse_binary_expression(&mut self) -> Result<BinaryExpression, ParseError> {
        let first = self.expect(TokenType::Identifier, None)?.value;
        let column = self.parse_qualified_name(first)?;
        let op = self.expect(TokenType::Symbol, None)?.value;
        let literal_tok = self.expect(TokenType::Literal, None)?;
        Ok(BinaryExpression {
            column,
            op,
            literal: parse_literal_text(&literal_tok.value),
        })
    }

    fn parse_show_tables(&mut self) -> Result<(), ParseError> {
        self.expect(TokenType::Keyword, Some("SHOW"))?;
        self.expect(TokenType::Keyword, Some("TABLES"))?;
        self.consume_optional_semicolon();
        Ok(())
    }
}

/// Literals come off the tokenizer as plain text; this decides int vs.
/// float vs. text the same way the engine's value coercion does.
fn parse_literal_text(text: &str) -> Literal {
    if let Ok(i) = text.parse::<i64>() {
        Literal::Int(i)
    } else if let Ok(f) = text.parse::<f64>() {
        Literal::Float(f)
    } else {
        Literal::Text(text.to_string())
    }
}
