use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    geometry::{CrsRef, Envelope, Geometry, GeometryValue},
    parser::{
        ast::{
            ArgsParser, ComparatorOp, DistanceOp, Expression, NumberParser, SpatialOp, StringParser,
            TemporalOp, TemporalParser, Value,
        },
        CqlParser, CqlWriter, ParseError,
    },
};

/// Boolean valued node of a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Include,
    Exclude,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    Comparison(Comparison),
    Between(Between),
    Like(Like),
    IsNull(Expression),
    IsNil(Expression),
    ResourceId(ResourceId),
    Spatial(SpatialBinary),
    Distance(SpatialDistance),
    Temporal(TemporalBinary),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub op: ComparatorOp,
    pub left: Expression,
    pub right: Expression,
    pub match_case: bool,
    /// The literal was written first and the other operand second.
    pub swapped: bool,
}

impl Comparison {
    pub fn new(op: ComparatorOp, left: Expression, right: Expression) -> Self {
        let swapped = left.is_literal() && !right.is_literal();
        Self { op, left, right, match_case: true, swapped }
    }

    pub fn ignoring_case(mut self) -> Self {
        self.match_case = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Between {
    pub expr: Expression,
    pub lower: Expression,
    pub upper: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub expr: Expression,
    pub pattern: String,
    pub wildcard: char,
    pub single_char: char,
    pub escape: char,
    pub match_case: bool,
}

impl Like {
    pub const DEFAULT_WILDCARD: char = '%';
    pub const DEFAULT_SINGLE_CHAR: char = '_';
    pub const DEFAULT_ESCAPE: char = '\\';

    pub fn new(expr: Expression, pattern: &str, match_case: bool) -> Self {
        Self {
            expr,
            pattern: pattern.to_string(),
            wildcard: Self::DEFAULT_WILDCARD,
            single_char: Self::DEFAULT_SINGLE_CHAR,
            escape: Self::DEFAULT_ESCAPE,
            match_case,
        }
    }

    pub fn with_markers(mut self, wildcard: char, single_char: char, escape: char) -> Self {
        self.wildcard = wildcard;
        self.single_char = single_char;
        self.escape = escape;
        self
    }

    pub fn has_default_markers(&self) -> bool {
        self.wildcard == Self::DEFAULT_WILDCARD
            && self.single_char == Self::DEFAULT_SINGLE_CHAR
            && self.escape == Self::DEFAULT_ESCAPE
    }

    /// Splits the pattern into wildcard markers and literal characters.
    pub fn tokens(&self) -> Vec<LikeToken> {
        let mut tokens = vec![];
        let mut chars = self.pattern.chars();
        while let Some(ch) = chars.next() {
            if ch == self.escape {
                if let Some(escaped) = chars.next() {
                    tokens.push(LikeToken::Char(escaped));
                }
            } else if ch == self.wildcard {
                tokens.push(LikeToken::Wildcard);
            } else if ch == self.single_char {
                tokens.push(LikeToken::SingleChar);
            } else {
                tokens.push(LikeToken::Char(ch));
            }
        }
        tokens
    }

    /// The pattern rewritten with `%`, `_` and `\`.
    pub fn default_pattern(&self) -> String {
        if self.has_default_markers() {
            return self.pattern.clone();
        }

        let mut out = String::new();
        for token in self.tokens() {
            match token {
                LikeToken::Wildcard => out.push(Self::DEFAULT_WILDCARD),
                LikeToken::SingleChar => out.push(Self::DEFAULT_SINGLE_CHAR),
                LikeToken::Char(ch) => {
                    if matches!(ch, '%' | '_' | '\\') {
                        out.push(Self::DEFAULT_ESCAPE);
                    }
                    out.push(ch);
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToken {
    Wildcard,
    SingleChar,
    Char(char),
}

/// Feature identifier filter. `id` is opaque until a FID validator looks at it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    pub id: String,
    pub version: Option<String>,
}

impl ResourceId {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string(), version: None }
    }

    /// `feature.1@v2` carries version `v2`.
    pub fn from_text(text: &str) -> Self {
        match text.rsplit_once('@') {
            Some((id, version)) if !id.is_empty() && !version.is_empty() => Self {
                id: id.to_string(),
                version: Some(version.to_string()),
            },
            _ => Self::new(text),
        }
    }

    pub fn to_text(&self) -> String {
        match &self.version {
            Some(version) => format!("{}@{}", self.id, version),
            None => self.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialBinary {
    pub op: SpatialOp,
    pub property: Expression,
    pub geometry: Expression,
    /// The geometry was written as the first operand.
    pub swapped: bool,
    /// Bounding box test only, skipping the exact relation.
    pub loose: bool,
}

impl SpatialBinary {
    /// Orders the operands so the non literal one is `property`.
    pub fn new(op: SpatialOp, first: Expression, second: Expression) -> Self {
        let swapped = first.is_literal() && !second.is_literal();
        let (property, geometry) = if swapped { (second, first) } else { (first, second) };
        Self { op, property, geometry, swapped, loose: false }
    }

    pub fn loose_bbox(property: Expression, geometry: Expression) -> Self {
        Self { loose: true, ..Self::new(SpatialOp::BBox, property, geometry) }
    }

    /// Operands in the order they were written.
    pub fn operands(&self) -> (&Expression, &Expression) {
        match self.swapped {
            true => (&self.geometry, &self.property),
            false => (&self.property, &self.geometry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialDistance {
    pub op: DistanceOp,
    pub property: Expression,
    pub geometry: Expression,
    pub distance: f64,
    pub unit: String,
    pub swapped: bool,
}

impl SpatialDistance {
    pub fn new(op: DistanceOp, first: Expression, second: Expression, distance: f64, unit: &str) -> Self {
        let swapped = first.is_literal() && !second.is_literal();
        let (property, geometry) = if swapped { (second, first) } else { (first, second) };
        Self { op, property, geometry, distance, unit: unit.to_string(), swapped }
    }

    pub fn operands(&self) -> (&Expression, &Expression) {
        match self.swapped {
            true => (&self.geometry, &self.property),
            false => (&self.property, &self.geometry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalBinary {
    pub op: TemporalOp,
    pub property: Expression,
    /// Instant or period literal.
    pub operand: Expression,
}

impl TemporalBinary {
    pub fn new(op: TemporalOp, property: Expression, operand: Expression) -> Self {
        Self { op, property, operand }
    }
}

impl Predicate {
    pub fn parse(parser: &mut CqlParser) -> Result<Predicate, ParseError> {
        Self::parse_or(parser)
    }

    fn parse_or(parser: &mut CqlParser) -> Result<Predicate, ParseError> {
        let mut items = vec![Self::parse_and(parser)?];

        loop {
            let pivot = parser.position;
            parser.next_non_whitespace();
            if !parser.comparers.or.consume(parser) {
                parser.reset(pivot);
                break;
            }
            items.push(Self::parse_and(parser)?);
        }

        Ok(Self::collapse(items, Predicate::Or))
    }

    fn parse_and(parser: &mut CqlParser) -> Result<Predicate, ParseError> {
        let mut items = vec![Self::parse_not(parser)?];

        loop {
            let pivot = parser.position;
            parser.next_non_whitespace();
            if !parser.comparers.and.consume(parser) {
                parser.reset(pivot);
                break;
            }
            items.push(Self::parse_not(parser)?);
        }

        Ok(Self::collapse(items, Predicate::And))
    }

    fn parse_not(parser: &mut CqlParser) -> Result<Predicate, ParseError> {
        parser.next_non_whitespace();
        if parser.comparers.not.consume(parser) {
            let inner = Self::parse_not(parser)?;
            return Ok(Predicate::Not(Box::new(inner)));
        }
        Self::parse_primary(parser)
    }

    fn parse_primary(parser: &mut CqlParser) -> Result<Predicate, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;
        let comparers = parser.comparers;

        if comparers.include.consume(parser) {
            return Ok(Predicate::Include);
        }
        if comparers.exclude.consume(parser) {
            return Ok(Predicate::Exclude);
        }

        if parser.current() == '(' {
            return Self::parse_group(parser);
        }

        if let Some(op) = comparers.spatial.iter().find_map(|(c, op)| c.consume(parser).then_some(*op)) {
            return Self::parse_spatial(parser, op);
        }
        if let Some(op) = comparers.distance.iter().find_map(|(c, op)| c.consume(parser).then_some(*op)) {
            return Self::parse_distance(parser, op);
        }
        if let Some(op) = comparers.temporal_calls.iter().find_map(|(c, op)| c.consume(parser).then_some(*op)) {
            return Self::parse_temporal_call(parser, op);
        }
        if comparers.r#in.consume(parser) {
            return Self::parse_resource_ids(parser, pivot);
        }

        Self::parse_comparison(parser)
    }

    /// A parenthesised filter, or failing that an expression that starts with
    /// a parenthesis, e.g. `(a + 1) > 3`.
    fn parse_group(parser: &mut CqlParser) -> Result<Predicate, ParseError> {
        let pivot = parser.position;
        parser.next();

        let group = Self::parse(parser).and_then(|inner| {
            parser.expect(')', "Expected ')'")?;
            Ok(inner)
        });

        let group_error = match group {
            Ok(inner) if Self::group_closes(parser) => return Ok(inner),
            Ok(_) => None,
            Err(err) => Some(err),
        };

        parser.reset(pivot);
        Self::parse_comparison(parser).map_err(|err| group_error.unwrap_or(err))
    }

    fn group_closes(parser: &mut CqlParser) -> bool {
        let pivot = parser.position;
        parser.next_non_whitespace();
        let closes = parser.eof()
            || parser.current() == ')'
            || parser.comparers.and.compare(parser)
            || parser.comparers.or.compare(parser);
        parser.reset(pivot);
        closes
    }

    fn parse_comparison(parser: &mut CqlParser) -> Result<Predicate, ParseError> {
        let left = Expression::parse(parser)?;
        parser.next_non_whitespace();
        let pivot = parser.position;
        let comparers = parser.comparers;

        if let Some(op) = ComparatorOp::check(parser) {
            let right = Expression::parse(parser)?;
            return Ok(Predicate::Comparison(Comparison::new(op, left, right)));
        }

        if comparers.not_between.consume(parser) {
            return Self::parse_between(parser, left).map(|p| Predicate::Not(Box::new(p)));
        }
        if comparers.between.consume(parser) {
            return Self::parse_between(parser, left);
        }

        for (comparer, match_case, negated) in [
            (&comparers.not_like, true, true),
            (&comparers.like, true, false),
            (&comparers.not_ilike, false, true),
            (&comparers.ilike, false, false),
        ] {
            if comparer.consume(parser) {
                parser.next_non_whitespace();
                if !StringParser::is_string_delimiter(parser) {
                    return ParseError::new("LIKE pattern must be a string literal", pivot, parser).err();
                }
                let pattern = StringParser::parse(parser)?;
                let like = Predicate::Like(Like::new(left, &pattern, match_case));
                return Ok(if negated { Predicate::Not(Box::new(like)) } else { like });
            }
        }

        if comparers.is_not_null.consume(parser) {
            return Ok(Predicate::Not(Box::new(Predicate::IsNull(left))));
        }
        if comparers.is_null.consume(parser) {
            return Ok(Predicate::IsNull(left));
        }
        if comparers.is_not_nil.consume(parser) {
            return Ok(Predicate::Not(Box::new(Predicate::IsNil(left))));
        }
        if comparers.is_nil.consume(parser) {
            return Ok(Predicate::IsNil(left));
        }

        if comparers.not_in.consume(parser) {
            let items = ArgsParser::parse(parser)?;
            return Self::in_list(parser, pivot, left, items, true);
        }
        if comparers.r#in.consume(parser) {
            let items = ArgsParser::parse(parser)?;
            return Self::in_list(parser, pivot, left, items, false);
        }

        if comparers.before_or_during.consume(parser) {
            let operand = Expression::Literal(TemporalParser::parse_operand(parser)?);
            return Ok(Predicate::Or(vec![
                Predicate::Temporal(TemporalBinary::new(TemporalOp::Before, left.clone(), operand.clone())),
                Predicate::Temporal(TemporalBinary::new(TemporalOp::During, left, operand)),
            ]));
        }
        if comparers.during_or_after.consume(parser) {
            let operand = Expression::Literal(TemporalParser::parse_operand(parser)?);
            return Ok(Predicate::Or(vec![
                Predicate::Temporal(TemporalBinary::new(TemporalOp::During, left.clone(), operand.clone())),
                Predicate::Temporal(TemporalBinary::new(TemporalOp::After, left, operand)),
            ]));
        }
        if let Some(op) = comparers.temporal.iter().find_map(|(c, op)| c.consume(parser).then_some(*op)) {
            let operand = Expression::Literal(TemporalParser::parse_operand(parser)?);
            return Ok(Predicate::Temporal(TemporalBinary::new(op, left, operand)));
        }

        ParseError::new("Expected a comparison operator", pivot, parser).err()
    }

    fn parse_between(parser: &mut CqlParser, expr: Expression) -> Result<Predicate, ParseError> {
        let lower = Expression::parse(parser)?;
        parser.next_non_whitespace();
        if !parser.comparers.and.consume(parser) {
            return ParseError::new("Expected AND in BETWEEN", parser.position, parser).err();
        }
        let upper = Expression::parse(parser)?;
        Ok(Predicate::Between(Between { expr, lower, upper }))
    }

    fn in_list(
        parser: &CqlParser,
        pivot: usize,
        left: Expression,
        items: Vec<Expression>,
        negated: bool,
    ) -> Result<Predicate, ParseError> {
        let op = if negated { ComparatorOp::NotEq } else { ComparatorOp::Eq };
        let mut comparisons: Vec<Predicate> = items
            .into_iter()
            .map(|item| Predicate::Comparison(Comparison::new(op, left.clone(), item)))
            .collect();

        match comparisons.len() {
            0 => ParseError::new("IN list cannot be empty", pivot, parser).err(),
            1 => Ok(comparisons.remove(0)),
            _ if negated => Ok(Predicate::And(comparisons)),
            _ => Ok(Predicate::Or(comparisons)),
        }
    }

    fn parse_resource_ids(parser: &mut CqlParser, pivot: usize) -> Result<Predicate, ParseError> {
        parser.expect('(', "Expected '('")?;
        let mut ids = vec![];

        loop {
            parser.next_non_whitespace();
            let id = if StringParser::is_string_delimiter(parser) {
                StringParser::parse(parser)?
            } else if NumberParser::is_number(parser) {
                match NumberParser::parse(parser)? {
                    Value::Integer(i) => i.to_string(),
                    _ => return ParseError::new("Feature ids must be strings or integers", pivot, parser).err(),
                }
            } else {
                return ParseError::new("Invalid feature id", pivot, parser).err();
            };
            ids.push(Predicate::ResourceId(ResourceId::from_text(&id)));

            if !parser.accept(',') {
                break;
            }
        }
        parser.expect(')', "Expected ')'")?;

        Ok(Self::collapse(ids, Predicate::Or))
    }

    fn parse_spatial(parser: &mut CqlParser, op: SpatialOp) -> Result<Predicate, ParseError> {
        parser.expect('(', "Expected '('")?;
        let first = Expression::parse(parser)?;
        parser.expect(',', "Expected ','")?;
        parser.next_non_whitespace();

        if op == SpatialOp::BBox && NumberParser::is_number(parser) {
            let pivot = parser.position;
            let min_x = NumberParser::parse_f64(parser)?;
            parser.expect(',', "Expected ','")?;
            let min_y = NumberParser::parse_f64(parser)?;
            parser.expect(',', "Expected ','")?;
            let max_x = NumberParser::parse_f64(parser)?;
            parser.expect(',', "Expected ','")?;
            let max_y = NumberParser::parse_f64(parser)?;

            let mut crs = None;
            if parser.accept(',') {
                parser.next_non_whitespace();
                let text = StringParser::parse(parser)?;
                crs = Some(CrsRef::parse(&text).ok_or_else(|| ParseError::new("Invalid CRS", pivot, parser))?);
            }
            parser.expect(')', "Expected ')'")?;

            let envelope = Geometry::Envelope(Some(Envelope::new(min_x, min_y, max_x, max_y)));
            let geometry = Expression::Literal(Value::Geometry(GeometryValue { geometry: envelope, crs }));
            return Ok(Predicate::Spatial(SpatialBinary::new(op, first, geometry)));
        }

        let second = Expression::parse(parser)?;
        parser.expect(')', "Expected ')'")?;
        Ok(Predicate::Spatial(SpatialBinary::new(op, first, second)))
    }

    fn parse_distance(parser: &mut CqlParser, op: DistanceOp) -> Result<Predicate, ParseError> {
        parser.expect('(', "Expected '('")?;
        let first = Expression::parse(parser)?;
        parser.expect(',', "Expected ','")?;
        let second = Expression::parse(parser)?;
        parser.expect(',', "Expected ','")?;
        let distance = NumberParser::parse_f64(parser)?;
        parser.expect(',', "Expected ','")?;

        parser.next_non_whitespace();
        let pivot = parser.position;
        while !parser.eof() && parser.current() != ')' {
            parser.next();
        }
        let unit = parser.text_from_pivot(pivot);
        let unit = unit.trim().trim_matches(|c| c == '\'' || c == '"').trim();
        if unit.is_empty() {
            return ParseError::new("Missing distance units", pivot, parser).err();
        }
        parser.expect(')', "Expected ')'")?;

        Ok(Predicate::Distance(SpatialDistance::new(op, first, second, distance, unit)))
    }

    fn parse_temporal_call(parser: &mut CqlParser, op: TemporalOp) -> Result<Predicate, ParseError> {
        parser.expect('(', "Expected '('")?;
        let property = Expression::parse(parser)?;
        parser.expect(',', "Expected ','")?;
        let operand = Expression::Literal(TemporalParser::parse_operand(parser)?);
        parser.expect(')', "Expected ')'")?;
        Ok(Predicate::Temporal(TemporalBinary::new(op, property, operand)))
    }

    fn collapse(mut items: Vec<Predicate>, build: fn(Vec<Predicate>) -> Predicate) -> Predicate {
        match items.len() {
            1 => items.remove(0),
            _ => build(items),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", CqlWriter::write_filter(self))
    }
}
