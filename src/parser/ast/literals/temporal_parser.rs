use chrono::{DateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::{
    ast::{Value, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND},
    CqlParser, ParseError,
};

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?Z").expect("timestamp pattern")
});

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?)?",
        r"(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?"
    ))
    .expect("duration pattern")
});

const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;
const MILLIS_PER_MONTH: i64 = 30 * MILLIS_PER_DAY;
const MILLIS_PER_YEAR: i64 = 365 * MILLIS_PER_DAY;

/// ISO-8601 instants, durations and the periods built from them.
pub struct TemporalParser;

impl TemporalParser {
    pub fn is_timestamp(parser: &CqlParser) -> bool {
        Self::timestamp_length(parser).is_some()
    }

    pub fn is_duration(parser: &CqlParser) -> bool {
        Self::duration_length(parser).is_some()
    }

    pub fn parse_timestamp(parser: &mut CqlParser) -> Result<DateTime<Utc>, ParseError> {
        let pivot = parser.position;
        let Some(length) = Self::timestamp_length(parser) else {
            return ParseError::new("Invalid timestamp", pivot, parser).err();
        };

        parser.jump(length);
        let text = parser.text_from_pivot(pivot);
        DateTime::parse_from_rfc3339(&text)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|_| ParseError::new("Invalid timestamp", pivot, parser))
    }

    /// Duration in milliseconds. Years count 365 days and months 30.
    pub fn parse_duration(parser: &mut CqlParser) -> Result<i64, ParseError> {
        let pivot = parser.position;
        let Some(length) = Self::duration_length(parser) else {
            return ParseError::new("Invalid duration", pivot, parser).err();
        };

        let text = parser.text_from_range(pivot, pivot + length);
        parser.jump(length);

        let captures = DURATION
            .captures(&text)
            .ok_or_else(|| ParseError::new("Invalid duration", pivot, parser))?;

        let units = [MILLIS_PER_YEAR, MILLIS_PER_MONTH, MILLIS_PER_WEEK, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE];
        let mut millis: i64 = 0;
        for (index, unit) in units.iter().enumerate() {
            if let Some(amount) = captures.get(index + 1) {
                let amount: i64 = amount.as_str().parse().map_err(|_| ParseError::new("Invalid duration", pivot, parser))?;
                millis = amount
                    .checked_mul(*unit)
                    .and_then(|m| millis.checked_add(m))
                    .ok_or_else(|| ParseError::new("Duration out of range", pivot, parser))?;
            }
        }

        if let Some(seconds) = captures.get(7) {
            let seconds: f64 = seconds.as_str().parse().map_err(|_| ParseError::new("Invalid duration", pivot, parser))?;
            millis = millis
                .checked_add((seconds * MILLIS_PER_SECOND as f64).round() as i64)
                .ok_or_else(|| ParseError::new("Duration out of range", pivot, parser))?;
        }

        Ok(millis)
    }

    /// Right hand side of a temporal predicate: an instant or a period written
    /// as `t1/t2`, `t1/duration` or `duration/t2`.
    pub fn parse_operand(parser: &mut CqlParser) -> Result<Value, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        if Self::is_duration(parser) {
            let duration = Self::parse_duration(parser)?;
            if parser.current() != '/' {
                return ParseError::new("A duration must be anchored to a timestamp", pivot, parser).err();
            }
            parser.next();
            let end = Self::parse_timestamp(parser)?;
            let begin = end
                .checked_sub_signed(TimeDelta::milliseconds(duration))
                .ok_or_else(|| ParseError::new("Period out of range", pivot, parser))?;
            return Self::period(begin, end, pivot, parser);
        }

        let begin = Self::parse_timestamp(parser)?;
        if parser.current() != '/' {
            return Ok(Value::Timestamp(begin));
        }
        parser.next();

        if Self::is_duration(parser) {
            let duration = Self::parse_duration(parser)?;
            let end = begin
                .checked_add_signed(TimeDelta::milliseconds(duration))
                .ok_or_else(|| ParseError::new("Period out of range", pivot, parser))?;
            return Self::period(begin, end, pivot, parser);
        }

        let end = Self::parse_timestamp(parser)?;
        Self::period(begin, end, pivot, parser)
    }

    fn period(begin: DateTime<Utc>, end: DateTime<Utc>, pivot: usize, parser: &CqlParser) -> Result<Value, ParseError> {
        if begin > end {
            return ParseError::new("Period begins after it ends", pivot, parser).err();
        }
        Ok(Value::Period { begin, end })
    }

    fn timestamp_length(parser: &CqlParser) -> Option<usize> {
        if !parser.current().is_ascii_digit() {
            return None;
        }
        let rest = parser.rest();
        let found = TIMESTAMP.find(&rest)?;
        let length = found.as_str().chars().count();
        Self::ends_literal(parser, length).then_some(length)
    }

    fn duration_length(parser: &CqlParser) -> Option<usize> {
        if !matches!(parser.current(), 'P' | 'T') {
            return None;
        }
        let rest = parser.rest();
        let found = DURATION.find(&rest)?;
        let text = found.as_str();
        if text.is_empty() || text.ends_with('P') || text.ends_with('T') {
            return None;
        }
        let length = text.chars().count();
        Self::ends_literal(parser, length).then_some(length)
    }

    fn ends_literal(parser: &CqlParser, length: usize) -> bool {
        let next = parser.peek(length);
        !(next.is_alphanumeric() || next == '_' || next == '.' || next == ':')
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::parser::{ast::{TemporalParser, Value}, CqlParser};

    #[test]
    pub fn test_parse_timestamp() {
        let mut parser = CqlParser::new("2006-11-30T01:30:00Z AND");
        let ts = TemporalParser::parse_timestamp(&mut parser).expect("Failed to parse timestamp");
        assert_eq!(ts, Utc.with_ymd_and_hms(2006, 11, 30, 1, 30, 0).unwrap());
        assert_eq!(parser.current(), ' ');
    }

    #[test]
    pub fn test_timestamp_needs_zulu() {
        let parser = CqlParser::new("2006-11-30T01:30:00");
        assert!(!TemporalParser::is_timestamp(&parser));
    }

    #[test]
    pub fn test_parse_duration() {
        let mut parser = CqlParser::new("P1DT2H3M4.005S");
        assert_eq!(TemporalParser::parse_duration(&mut parser).expect("Failed to parse duration"), 93_784_005);

        let mut parser = CqlParser::new("T1H)");
        assert_eq!(TemporalParser::parse_duration(&mut parser).expect("Failed to parse duration"), 3_600_000);
        assert_eq!(parser.current(), ')');

        let mut parser = CqlParser::new("P1Y2M");
        assert_eq!(
            TemporalParser::parse_duration(&mut parser).expect("Failed to parse duration"),
            (365 + 60) * 86_400_000
        );
    }

    #[test]
    pub fn test_duration_rejects_identifiers() {
        assert!(!TemporalParser::is_duration(&CqlParser::new("P")));
        assert!(!TemporalParser::is_duration(&CqlParser::new("PT")));
        assert!(!TemporalParser::is_duration(&CqlParser::new("P1Dx")));
        assert!(!TemporalParser::is_duration(&CqlParser::new("population")));
    }

    #[test]
    pub fn test_parse_operand_periods() {
        let begin = Utc.with_ymd_and_hms(2006, 11, 30, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2006, 12, 1, 0, 0, 0).unwrap();

        let mut parser = CqlParser::new("2006-11-30T00:00:00Z/2006-12-01T00:00:00Z");
        assert_eq!(TemporalParser::parse_operand(&mut parser).expect("Failed to parse period"), Value::Period { begin, end });

        let mut parser = CqlParser::new("2006-11-30T00:00:00Z/P1D");
        assert_eq!(TemporalParser::parse_operand(&mut parser).expect("Failed to parse period"), Value::Period { begin, end });

        let mut parser = CqlParser::new("P1D/2006-12-01T00:00:00Z");
        assert_eq!(TemporalParser::parse_operand(&mut parser).expect("Failed to parse period"), Value::Period { begin, end });
    }

    #[test]
    pub fn test_parse_operand_errors() {
        assert!(TemporalParser::parse_operand(&mut CqlParser::new("P1D")).is_err());
        assert!(TemporalParser::parse_operand(&mut CqlParser::new("P1D/P2D")).is_err());
        assert!(TemporalParser::parse_operand(&mut CqlParser::new("2006-12-01T00:00:00Z/2006-11-30T00:00:00Z")).is_err());
    }
}
