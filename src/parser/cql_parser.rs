use crate::parser::{CqlComparers, ParseError, COMPARERS};

/// Character cursor over the filter text shared by every sub-parser.
#[derive(Debug)]
pub struct CqlParser {
    pub position: usize,
    pub length: usize,
    pub text_v: Vec<char>,
    pub comparers: &'static CqlComparers,
}

impl CqlParser {
    pub fn new(text: &str) -> Self {
        let text_v: Vec<char> = text.chars().collect();
        Self {
            position: 0,
            length: text_v.len(),
            text_v,
            comparers: &COMPARERS,
        }
    }

    pub fn eof(&self) -> bool {
        self.position >= self.length
    }

    pub fn current(&self) -> char {
        self.peek(0)
    }

    pub fn peek(&self, ahead: usize) -> char {
        if self.position + ahead < self.length {
            return self.text_v[self.position + ahead];
        }

        '\0'
    }

    pub fn next(&mut self) {
        if self.position < self.length {
            self.position += 1;
        }
    }

    pub fn next_non_whitespace(&mut self) {
        while self.current().is_whitespace() {
            self.next();
        }
    }

    pub fn jump(&mut self, ahead: usize) {
        self.position = (self.position + ahead).min(self.length);
    }

    /// Rewinds or advances the cursor to an absolute position.
    pub fn reset(&mut self, position: usize) {
        self.position = position.min(self.length);
    }

    pub fn text_from_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.length);
        if start >= end {
            return String::new();
        }
        self.text_v[start..end].iter().collect()
    }

    pub fn text_from_pivot(&self, pivot: usize) -> String {
        self.text_from_range(pivot, self.position)
    }

    /// Unconsumed input.
    pub fn rest(&self) -> String {
        self.text_from_range(self.position, self.length)
    }

    /// Exact, case-sensitive match of `symbol` at the cursor.
    pub fn starts_with(&self, symbol: &str) -> bool {
        symbol.chars().enumerate().all(|(i, ch)| self.peek(i) == ch)
    }

    /// Skips whitespace and consumes `expected`, failing with `message` otherwise.
    pub fn expect(&mut self, expected: char, message: &str) -> Result<(), ParseError> {
        self.next_non_whitespace();
        if self.current() != expected {
            return ParseError::new(message, self.position, self).err();
        }
        self.next();
        Ok(())
    }

    /// Skips whitespace and consumes `expected` when present.
    pub fn accept(&mut self, expected: char) -> bool {
        let pivot = self.position;
        self.next_non_whitespace();
        if self.current() == expected {
            self.next();
            return true;
        }
        self.reset(pivot);
        false
    }

    /// Fails unless only whitespace remains.
    pub fn expect_eof(&mut self) -> Result<(), ParseError> {
        self.next_non_whitespace();
        if !self.eof() {
            return ParseError::new("Unexpected input", self.position, self).err();
        }
        Ok(())
    }
}
