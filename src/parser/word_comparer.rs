use crate::parser::CqlParser;

/// Case-insensitive keyword matcher. A space inside the word matches any
/// run of whitespace in the input, so `IS  NOT NULL` is accepted.
#[derive(Debug, Default)]
pub struct WordComparer {
    pub length: usize,
    pub word: Vec<char>,
    any_delimiter_postfix: bool,
    eof: bool,
    call: bool,
}

impl WordComparer {
    pub fn new(word: &str) -> Self {
        let word: Vec<char> = word.to_uppercase().chars().collect();
        Self {
            length: word.len(),
            word,
            any_delimiter_postfix: false,
            eof: false,
            call: false,
        }
    }

    /// Keyword followed by a delimiter or the end of input.
    pub fn keyword(word: &str) -> Self {
        Self::new(word).with_any_delimiter_postfix().with_eof()
    }

    /// Keyword used with call syntax, `NAME (`.
    pub fn call(word: &str) -> Self {
        Self::new(word).with_call()
    }

    pub fn is_block_delimiter(ch: char) -> bool {
        ch.is_whitespace()
    }

    pub fn is_any_delimiter(ch: char) -> bool {
        matches!(ch, ',' | '(' | ')' | '\'' | '"' | '=' | '<' | '>' | '!' | '+' | '-' | '*' | '/')
            || Self::is_block_delimiter(ch)
    }

    /// Number of characters the keyword spans at the cursor, if it matches.
    pub fn matches(&self, parser: &CqlParser) -> Option<usize> {
        let mut offset = 0;
        for expected in &self.word {
            if *expected == ' ' {
                if !Self::is_block_delimiter(parser.peek(offset)) {
                    return None;
                }
                while Self::is_block_delimiter(parser.peek(offset)) {
                    offset += 1;
                }
                continue;
            }

            if parser.position + offset >= parser.length || parser.peek(offset).to_ascii_uppercase() != *expected {
                return None;
            }
            offset += 1;
        }

        if self.call {
            let mut ahead = offset;
            while Self::is_block_delimiter(parser.peek(ahead)) {
                ahead += 1;
            }
            return (parser.peek(ahead) == '(').then_some(offset);
        }

        if parser.position + offset >= parser.length {
            return self.eof.then_some(offset);
        }

        if !self.any_delimiter_postfix {
            return Some(offset);
        }

        Self::is_any_delimiter(parser.peek(offset)).then_some(offset)
    }

    pub fn compare(&self, parser: &CqlParser) -> bool {
        self.matches(parser).is_some()
    }

    /// Moves the cursor past the keyword when it matches.
    pub fn consume(&self, parser: &mut CqlParser) -> bool {
        match self.matches(parser) {
            Some(length) => {
                parser.jump(length);
                true
            }
            None => false,
        }
    }

    pub fn with_eof(mut self) -> Self { self.eof = true; self }
    pub fn with_any_delimiter_postfix(mut self) -> Self { self.any_delimiter_postfix = true; self }
    pub fn with_call(mut self) -> Self { self.call = true; self }
}

#[cfg(test)]
mod tests {
    use crate::parser::{CqlParser, WordComparer};

    #[test]
    pub fn test_keyword_case_insensitive() {
        let parser = CqlParser::new("and x");
        assert_eq!(WordComparer::keyword("AND").matches(&parser), Some(3));
    }

    #[test]
    pub fn test_keyword_requires_delimiter() {
        let parser = CqlParser::new("ANDROID = 1");
        assert!(!WordComparer::keyword("AND").compare(&parser));
    }

    #[test]
    pub fn test_keyword_at_eof() {
        let parser = CqlParser::new("null");
        assert!(WordComparer::keyword("NULL").compare(&parser));
        assert!(!WordComparer::new("NULL").with_any_delimiter_postfix().compare(&parser));
    }

    #[test]
    pub fn test_multi_word_collapses_whitespace() {
        let mut parser = CqlParser::new("IS   NOT\tNULL)");
        assert!(WordComparer::keyword("IS NOT NULL").consume(&mut parser));
        assert_eq!(parser.current(), ')');
    }

    #[test]
    pub fn test_call_requires_parenthesis() {
        let parser = CqlParser::new("bbox (geom, 1, 2, 3, 4)");
        assert_eq!(WordComparer::call("BBOX").matches(&parser), Some(4));

        let parser = CqlParser::new("bbox = 3");
        assert!(!WordComparer::call("BBOX").compare(&parser));
    }
}
