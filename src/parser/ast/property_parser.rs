use crate::parser::{
    ast::{ArgsParser, Expression, Function},
    is_reserved_word, CqlParser, ParseError,
};

/// Bare attribute names and generic function calls.
pub struct PropertyParser;

impl PropertyParser {
    pub fn is_identifier_start(ch: char) -> bool {
        ch.is_alphabetic() || ch == '_'
    }

    pub fn is_identifier_char(ch: char) -> bool {
        ch.is_alphanumeric() || matches!(ch, '_' | '.' | ':')
    }

    /// Whether `name` can be written without double quotes.
    pub fn is_plain_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if Self::is_identifier_start(first) => {}
            _ => return false,
        }
        chars.all(Self::is_identifier_char) && !is_reserved_word(name)
    }

    pub fn parse_name(parser: &mut CqlParser) -> Result<String, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        if !Self::is_identifier_start(parser.current()) {
            return ParseError::new("Invalid property name", pivot, parser).err();
        }

        while Self::is_identifier_char(parser.current()) {
            parser.next();
        }

        Ok(parser.text_from_pivot(pivot))
    }

    pub fn parse(parser: &mut CqlParser) -> Result<Expression, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;
        let name = Self::parse_name(parser)?;

        if is_reserved_word(&name) {
            return ParseError::new("Reserved word cannot be used as a property name", pivot, parser).err();
        }

        let after_name = parser.position;
        parser.next_non_whitespace();
        if ArgsParser::is_args_start(parser) {
            let args = ArgsParser::parse(parser)?;
            return Ok(Expression::Function(Function { name, args }));
        }
        parser.reset(after_name);

        Ok(Expression::Property(name))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::{Expression, PropertyParser}, CqlParser};

    #[test]
    pub fn test_property_with_namespace() {
        let mut parser = CqlParser::new("gml:name = 'x'");
        assert_eq!(PropertyParser::parse(&mut parser).expect("Failed to parse"), Expression::property("gml:name"));
        assert_eq!(parser.current(), ' ');
    }

    #[test]
    pub fn test_property_nested_path() {
        let mut parser = CqlParser::new("address.city");
        assert_eq!(PropertyParser::parse(&mut parser).expect("Failed to parse"), Expression::property("address.city"));
    }

    #[test]
    pub fn test_property_rejects_digit_start() {
        let mut parser = CqlParser::new("1abc");
        assert!(PropertyParser::parse(&mut parser).is_err());
    }

    #[test]
    pub fn test_plain_identifier() {
        assert!(PropertyParser::is_plain_identifier("att_1"));
        assert!(!PropertyParser::is_plain_identifier(""));
        assert!(!PropertyParser::is_plain_identifier("my att"));
        assert!(!PropertyParser::is_plain_identifier("null"));
        assert!(!PropertyParser::is_plain_identifier("9lives"));
    }
}
