pub mod cql_parser;
pub use cql_parser::*;

pub mod ast;

pub mod parse_error;
pub use parse_error::*;

pub mod word_comparer;
pub use word_comparer::*;

pub mod cql_comparers;
pub use cql_comparers::*;

pub mod writer;
pub use writer::*;

use tracing::trace;

use crate::parser::ast::{Expression, Predicate};

/// Parses a whole filter. The empty string and `*` select everything.
pub fn parse_filter(text: &str) -> Result<Predicate, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return Ok(Predicate::Include);
    }

    let mut parser = CqlParser::new(text);
    let predicate = Predicate::parse(&mut parser)?;
    parser.expect_eof()?;

    trace!(filter = %text, "parsed filter");
    Ok(predicate)
}

/// Parses a standalone value expression.
pub fn parse_expression(text: &str) -> Result<Expression, ParseError> {
    let mut parser = CqlParser::new(text);
    let expression = Expression::parse(&mut parser)?;
    parser.expect_eof()?;
    Ok(expression)
}

pub fn write_filter(predicate: &Predicate) -> String {
    CqlWriter::write_filter(predicate)
}

pub fn write_expression(expression: &Expression) -> String {
    CqlWriter::write_expression(expression)
}
