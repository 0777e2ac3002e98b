use crate::parser::{ast::Value, CqlParser, ParseError};

pub struct BoolParser;

impl BoolParser {
    pub fn is_bool(parser: &CqlParser) -> bool {
        parser.comparers.b_true.compare(parser) || parser.comparers.b_false.compare(parser)
    }

    pub fn parse(parser: &mut CqlParser) -> Result<Value, ParseError> {
        let comparers = parser.comparers;
        if comparers.b_true.consume(parser) {
            return Ok(Value::Boolean(true));
        }
        if comparers.b_false.consume(parser) {
            return Ok(Value::Boolean(false));
        }
        ParseError::new("Invalid boolean value", parser.position, parser).err()
    }
}
