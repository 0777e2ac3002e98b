use crate::parser::{ast::Expression, CqlParser, ParseError};

/// Argument lists of function calls and `IN` lists.
pub struct ArgsParser;

impl ArgsParser {
    pub fn is_args_start(parser: &CqlParser) -> bool {
        parser.current() == '('
    }

    /// Parenthesised, comma separated expression list. The cursor ends
    /// past the closing parenthesis.
    pub fn parse(parser: &mut CqlParser) -> Result<Vec<Expression>, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;
        if !Self::is_args_start(parser) {
            return ParseError::new("Expected '('", pivot, parser).err();
        }
        parser.next();

        if parser.accept(')') {
            return Ok(vec![]);
        }

        let mut args = vec![];
        loop {
            parser.next_non_whitespace();
            if parser.eof() || matches!(parser.current(), ',' | ')') {
                return ParseError::new("Expected an argument", pivot, parser).err();
            }
            args.push(Expression::parse(parser)?);

            if !parser.accept(',') {
                parser.expect(')', "Expected ',' or ')'")?;
                return Ok(args);
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use crate::parser::{ast::{ArgsParser, Expression}, CqlParser};

    #[test]
    pub fn test_args_empty() {
        let text = "()";

        let mut parser = CqlParser::new(text);

        let result = ArgsParser::parse(&mut parser);

        match result {
            Ok(result) => assert_eq!(result.len(), 0),
            Err(_) => panic!(),
        }
        assert!(parser.eof());
    }

    #[test]
    pub fn test_args_two() {
        let text = "(true, 1)";

        let mut parser = CqlParser::new(text);

        let result = ArgsParser::parse(&mut parser);

        match result {
            Ok(result) => {
                assert_eq!(result.len(), 2);
                assert_eq!(result[1], Expression::literal(1i64));
            },
            Err(_) => panic!(),
        }
    }

    #[test]
    pub fn test_args_three() {
        let text = "('hello', att, 1 + 2)";

        let mut parser = CqlParser::new(text);

        let result = ArgsParser::parse(&mut parser);

        match result {
            Ok(result) => {
                assert_eq!(result.len(), 3);
                assert_eq!(result[1], Expression::property("att"));
            },
            Err(_) => panic!(),
        }
    }

    #[test]
    pub fn test_args_wrong() {
        for text in ["'hello', true", "(1,,2)", "(1 2)", "(1,)", "(1"] {
            let mut parser = CqlParser::new(text);
            assert!(ArgsParser::parse(&mut parser).is_err(), "{} should fail", text);
        }
    }
}
