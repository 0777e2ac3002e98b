use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::parser::{ast::{DistanceOp, SpatialOp, TemporalOp, WktKind}, WordComparer};

/// Keyword tables shared by every parser instance.
pub static COMPARERS: Lazy<CqlComparers> = Lazy::new(CqlComparers::new);

/// Words that cannot be used as bare property names.
pub static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut words: HashSet<&'static str> = [
        "AND", "OR", "NOT", "BETWEEN", "LIKE", "ILIKE", "IS", "NULL", "NIL", "IN",
        "INCLUDE", "EXCLUDE", "TRUE", "FALSE", "EMPTY",
    ]
    .into_iter()
    .collect();
    words.extend(TemporalOp::ALL.iter().map(TemporalOp::keyword));
    words
});

pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(word.to_ascii_uppercase().as_str())
}

#[derive(Debug)]
pub struct CqlComparers {
    pub and: WordComparer,
    pub or: WordComparer,
    pub not: WordComparer,
    pub between: WordComparer,
    pub not_between: WordComparer,
    pub like: WordComparer,
    pub not_like: WordComparer,
    pub ilike: WordComparer,
    pub not_ilike: WordComparer,
    pub is_null: WordComparer,
    pub is_not_null: WordComparer,
    pub is_nil: WordComparer,
    pub is_not_nil: WordComparer,
    pub r#in: WordComparer,
    pub not_in: WordComparer,
    pub include: WordComparer,
    pub exclude: WordComparer,
    pub b_true: WordComparer,
    pub b_false: WordComparer,
    pub empty: WordComparer,
    pub before_or_during: WordComparer,
    pub during_or_after: WordComparer,
    pub spatial: Vec<(WordComparer, SpatialOp)>,
    pub distance: Vec<(WordComparer, DistanceOp)>,
    pub temporal: Vec<(WordComparer, TemporalOp)>,
    pub temporal_calls: Vec<(WordComparer, TemporalOp)>,
    pub geometry: Vec<(WordComparer, WktKind)>,
}

impl Default for CqlComparers {
    fn default() -> Self {
        Self::new()
    }
}

impl CqlComparers {
    pub fn new() -> Self {
        Self {
            and: WordComparer::keyword("AND"),
            or: WordComparer::keyword("OR"),
            not: WordComparer::keyword("NOT"),
            between: WordComparer::keyword("BETWEEN"),
            not_between: WordComparer::keyword("NOT BETWEEN"),
            like: WordComparer::keyword("LIKE"),
            not_like: WordComparer::keyword("NOT LIKE"),
            ilike: WordComparer::keyword("ILIKE"),
            not_ilike: WordComparer::keyword("NOT ILIKE"),
            is_null: WordComparer::keyword("IS NULL"),
            is_not_null: WordComparer::keyword("IS NOT NULL"),
            is_nil: WordComparer::keyword("IS NIL"),
            is_not_nil: WordComparer::keyword("IS NOT NIL"),
            r#in: WordComparer::call("IN"),
            not_in: WordComparer::call("NOT IN"),
            include: WordComparer::keyword("INCLUDE"),
            exclude: WordComparer::keyword("EXCLUDE"),
            b_true: WordComparer::keyword("TRUE"),
            b_false: WordComparer::keyword("FALSE"),
            empty: WordComparer::keyword("EMPTY"),
            before_or_during: WordComparer::keyword("BEFORE OR DURING"),
            during_or_after: WordComparer::keyword("DURING OR AFTER"),
            spatial: SpatialOp::ALL.iter().map(|op| (WordComparer::call(op.keyword()), *op)).collect(),
            distance: DistanceOp::ALL.iter().map(|op| (WordComparer::call(op.keyword()), *op)).collect(),
            temporal: TemporalOp::ALL.iter().map(|op| (WordComparer::keyword(op.keyword()), *op)).collect(),
            temporal_calls: TemporalOp::ALL.iter().map(|op| (WordComparer::call(op.keyword()), *op)).collect(),
            geometry: WktKind::ALL.iter().map(|kind| (WordComparer::keyword(kind.keyword()), *kind)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{is_reserved_word, CqlParser, COMPARERS};

    #[test]
    pub fn test_reserved_words() {
        assert!(is_reserved_word("and"));
        assert!(is_reserved_word("During"));
        assert!(!is_reserved_word("geom"));
        assert!(!is_reserved_word("intersects"));
    }

    #[test]
    pub fn test_temporal_table_matches_infix() {
        let parser = CqlParser::new("TEQUALS 2006-01-01T00:00:00Z");
        assert!(COMPARERS.temporal.iter().any(|(c, _)| c.compare(&parser)));
    }
}
