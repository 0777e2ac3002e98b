use ordered_float::NotNan;

use crate::parser::{ast::Value, CqlParser, ParseError};

pub struct NumberParser;

impl NumberParser {
    pub fn is_number(parser: &CqlParser) -> bool {
        let current = parser.current();
        if current.is_ascii_digit() {
            return true;
        }

        let (next, after) = (parser.peek(1), parser.peek(2));
        match current {
            '+' | '-' => next.is_ascii_digit() || (next == '.' && after.is_ascii_digit()),
            '.' => next.is_ascii_digit(),
            _ => false,
        }
    }

    /// Integer syntax yields `Integer`; a fraction or exponent yields `Float`.
    /// A leading sign belongs to the literal.
    pub fn parse(parser: &mut CqlParser) -> Result<Value, ParseError> {
        let pivot = parser.position;
        let is_float = Self::scan(parser)?;

        let number = parser.text_from_pivot(pivot);
        let number = match is_float {
            true => {
                let value = number.parse::<f64>().map_err(|_| ParseError::new("Invalid number", pivot, parser))?;
                Value::Float(NotNan::new(value).map_err(|_| ParseError::new("Invalid number", pivot, parser))?)
            }
            false => Value::Integer(number.parse::<i64>().map_err(|_| ParseError::new("Invalid number", pivot, parser))?),
        };

        Ok(number)
    }

    /// Any numeric literal read as a coordinate or distance.
    pub fn parse_f64(parser: &mut CqlParser) -> Result<f64, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;
        Self::scan(parser)?;
        match parser.text_from_pivot(pivot).parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => ParseError::new("Invalid number", pivot, parser).err(),
        }
    }

    fn scan(parser: &mut CqlParser) -> Result<bool, ParseError> {
        let pivot = parser.position;
        let mut is_float = false;

        if !NumberParser::is_number(parser) {
            return Err(ParseError::new("Invalid number value", pivot, parser));
        }

        if parser.current() == '+' || parser.current() == '-' {
            parser.next();
        }

        while parser.current().is_ascii_digit() {
            parser.next();
        }

        if parser.current() == '.' {
            is_float = true;
            parser.next();
            while parser.current().is_ascii_digit() {
                parser.next();
            }
        }

        if matches!(parser.current(), 'e' | 'E') {
            let signed = matches!(parser.peek(1), '+' | '-');
            let digit = if signed { parser.peek(2) } else { parser.peek(1) };
            if digit.is_ascii_digit() {
                is_float = true;
                parser.jump(if signed { 2 } else { 1 });
                while parser.current().is_ascii_digit() {
                    parser.next();
                }
            }
        }

        let current = parser.current();
        if current.is_alphanumeric() || current == '_' || current == '.' {
            return Err(ParseError::new("Invalid number value", pivot, parser));
        }

        Ok(is_float)
    }
}

#[cfg(test)]
pub mod tests {
    use crate::parser::{ast::{NumberParser, Value}, CqlParser};

    #[test]
    pub fn test_number_parser_int() {
        let mut parser = CqlParser::new("32");

        let result = NumberParser::parse(&mut parser);

        match result {
            Ok(Value::Integer(value)) => assert_eq!(value, 32),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_number_parser_int_negative() {
        let mut parser = CqlParser::new("-32");

        match NumberParser::parse(&mut parser) {
            Ok(Value::Integer(value)) => assert_eq!(value, -32),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_number_parser_float() {
        let mut parser = CqlParser::new("32.5)");

        match NumberParser::parse(&mut parser) {
            Ok(Value::Float(value)) => assert_eq!(value.into_inner(), 32.5),
            _ => panic!(),
        }
        assert_eq!(parser.current(), ')');
    }

    #[test]
    pub fn test_number_parser_exponent() {
        let mut parser = CqlParser::new("1.5e-3 ");

        match NumberParser::parse(&mut parser) {
            Ok(Value::Float(value)) => assert_eq!(value.into_inner(), 0.0015),
            _ => panic!(),
        }

        let mut parser = CqlParser::new("2E3");
        match NumberParser::parse(&mut parser) {
            Ok(Value::Float(value)) => assert_eq!(value.into_inner(), 2000.0),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_parse_f64_keeps_large_values() {
        let mut parser = CqlParser::new("100000000000000000000 ");

        match NumberParser::parse_f64(&mut parser) {
            Ok(value) => assert_eq!(value, 1e20),
            Err(_) => panic!(),
        }

        let mut parser = CqlParser::new("1e400");
        assert!(NumberParser::parse_f64(&mut parser).is_err());
    }

    #[test]
    pub fn test_number_parser_comma_delimiter() {
        let mut parser = CqlParser::new("32,");

        match NumberParser::parse(&mut parser) {
            Ok(Value::Integer(value)) => assert_eq!(value, 32),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_number_parser_wrong_value() {
        let mut parser = CqlParser::new("32a");

        match NumberParser::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.start, 0);
                assert_eq!(err.end, 2);
                assert_eq!(err.text, "32a");
            }
        }
    }

    #[test]
    pub fn test_number_parser_overflow() {
        let mut parser = CqlParser::new("99999999999999999999");
        assert!(NumberParser::parse(&mut parser).is_err());
    }

    #[test]
    pub fn test_is_number() {
        assert!(NumberParser::is_number(&CqlParser::new("-.5")));
        assert!(NumberParser::is_number(&CqlParser::new(".5")));
        assert!(!NumberParser::is_number(&CqlParser::new("- 5")));
        assert!(!NumberParser::is_number(&CqlParser::new("abc")));
    }
}
