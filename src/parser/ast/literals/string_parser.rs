use crate::parser::{CqlParser, ParseError};

pub struct StringParser;

impl StringParser {
    pub fn is_string_delimiter(parser: &CqlParser) -> bool {
        parser.current() == '\''
    }

    /// Reads a literal delimited by `quote`. A backslash before the quote
    /// character is the only escape.
    pub fn parse_delimited(parser: &mut CqlParser, quote: char) -> Result<String, ParseError> {
        let pivot = parser.position;
        if parser.current() != quote {
            return ParseError::new("Invalid string value", pivot, parser).err();
        }
        parser.next();

        let mut value = String::new();
        loop {
            if parser.eof() {
                return ParseError::new("Unterminated string", pivot, parser).err();
            }

            let current = parser.current();
            if current == '\\' && parser.peek(1) == quote {
                value.push(quote);
                parser.jump(2);
                continue;
            }

            parser.next();
            if current == quote {
                return Ok(value);
            }
            value.push(current);
        }
    }

    pub fn parse(parser: &mut CqlParser) -> Result<String, ParseError> {
        Self::parse_delimited(parser, '\'')
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::StringParser, CqlParser};

    #[test]
    pub fn test_string_parser() {
        let mut parser = CqlParser::new("'Porto' AND");
        assert_eq!(StringParser::parse(&mut parser).expect("Failed to parse string"), "Porto");
        assert_eq!(parser.position, 7);
    }

    #[test]
    pub fn test_string_parser_escaped_quote() {
        let mut parser = CqlParser::new(r"'it\'s'");
        assert_eq!(StringParser::parse(&mut parser).expect("Failed to parse string"), "it's");
    }

    #[test]
    pub fn test_string_parser_keeps_other_backslashes() {
        let mut parser = CqlParser::new(r"'a\%b'");
        assert_eq!(StringParser::parse(&mut parser).expect("Failed to parse string"), r"a\%b");
    }

    #[test]
    pub fn test_string_parser_unterminated() {
        let mut parser = CqlParser::new("'abc");
        let err = StringParser::parse(&mut parser).unwrap_err();
        assert_eq!(err.message, "Unterminated string");
        assert_eq!(err.start, 0);
        assert_eq!(err.text, "'abc");
    }

    #[test]
    pub fn test_double_quoted() {
        let mut parser = CqlParser::new("\"\"");
        assert_eq!(StringParser::parse_delimited(&mut parser, '"').expect("Failed to parse"), "");
    }
}
