use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parser::{
    ast::{
        ArithmeticOp, BoolParser, Function, GeometryParser, NumberParser, PropertyParser, StringParser,
        TemporalParser, Value,
    },
    CqlParser, CqlWriter, ParseError,
};

/// Value producing node of a filter.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Attribute path; the empty path is the default geometry.
    Property(String),
    Literal(Value),
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Function(Function),
}

impl Expression {
    pub fn property(path: &str) -> Expression {
        Expression::Property(path.to_string())
    }

    pub fn literal(value: impl Into<Value>) -> Expression {
        Expression::Literal(value.into())
    }

    pub fn arithmetic(op: ArithmeticOp, left: Expression, right: Expression) -> Expression {
        Expression::Arithmetic { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Literal(_))
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Expression::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&str> {
        match self {
            Expression::Property(path) => Some(path),
            _ => None,
        }
    }

    pub fn parse(parser: &mut CqlParser) -> Result<Expression, ParseError> {
        Self::parse_additive(parser)
    }

    fn parse_additive(parser: &mut CqlParser) -> Result<Expression, ParseError> {
        let mut left = Self::parse_term(parser)?;

        loop {
            let pivot = parser.position;
            parser.next_non_whitespace();
            let op = match parser.current() {
                '+' => ArithmeticOp::Add,
                '-' => ArithmeticOp::Sub,
                _ => {
                    parser.reset(pivot);
                    return Ok(left);
                }
            };
            parser.next();
            let right = Self::parse_term(parser)?;
            left = Expression::arithmetic(op, left, right);
        }
    }

    fn parse_term(parser: &mut CqlParser) -> Result<Expression, ParseError> {
        let mut left = Self::parse_factor(parser)?;

        loop {
            let pivot = parser.position;
            parser.next_non_whitespace();
            let op = match parser.current() {
                '*' => ArithmeticOp::Mul,
                '/' => ArithmeticOp::Div,
                _ => {
                    parser.reset(pivot);
                    return Ok(left);
                }
            };
            parser.next();
            let right = Self::parse_factor(parser)?;
            left = Expression::arithmetic(op, left, right);
        }
    }

    fn parse_factor(parser: &mut CqlParser) -> Result<Expression, ParseError> {
        parser.next_non_whitespace();

        if parser.eof() {
            return ParseError::new("Expected an expression", parser.position, parser).err();
        }

        if parser.current() == '(' {
            parser.next();
            let inner = Self::parse(parser)?;
            parser.expect(')', "Expected ')'")?;
            return Ok(inner);
        }
        if StringParser::is_string_delimiter(parser) {
            return StringParser::parse(parser).map(|text| Expression::Literal(Value::Text(text)));
        }
        if parser.current() == '"' {
            return StringParser::parse_delimited(parser, '"').map(Expression::Property);
        }
        if TemporalParser::is_timestamp(parser) {
            return TemporalParser::parse_timestamp(parser).map(|ts| Expression::Literal(Value::Timestamp(ts)));
        }
        if NumberParser::is_number(parser) {
            return NumberParser::parse(parser).map(Expression::Literal);
        }
        if GeometryParser::is_geometry(parser) {
            return GeometryParser::parse(parser).map(|g| Expression::Literal(Value::Geometry(g)));
        }
        if TemporalParser::is_duration(parser) {
            return TemporalParser::parse_duration(parser).map(|ms| Expression::Literal(Value::Duration(ms)));
        }
        if BoolParser::is_bool(parser) {
            return BoolParser::parse(parser).map(Expression::Literal);
        }

        PropertyParser::parse(parser)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", CqlWriter::write_expression(self))
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Property(path) => write!(f, "Property({})", path),
            Expression::Literal(value) => write!(f, "Literal({:?})", value),
            Expression::Arithmetic { op, left, right } => {
                write!(f, "Arithmetic({:?} {} {:?})", left, op.symbol(), right)
            }
            Expression::Function(fun) => write!(f, "Function({}{:?})", fun.name, fun.args),
        }
    }
}
