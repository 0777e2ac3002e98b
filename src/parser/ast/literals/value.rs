use chrono::{DateTime, SecondsFormat, Utc};
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::geometry::{CrsRef, Geometry, GeometryValue, WktWriter};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// A literal value appearing in a filter.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Float(NotNan<f64>),
    Text(String),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    /// Elapsed time in milliseconds.
    Duration(i64),
    /// Closed time interval, already resolved to instants.
    Period { begin: DateTime<Utc>, end: DateTime<Utc> },
    Geometry(GeometryValue),
}

impl Value {
    pub fn float(value: f64) -> Option<Value> {
        NotNan::new(value).ok().map(Value::Float)
    }

    pub fn geometry(geometry: Geometry, crs: Option<CrsRef>) -> Value {
        Value::Geometry(GeometryValue { geometry, crs })
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(f.into_inner()),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&GeometryValue> {
        match self {
            Value::Geometry(g) => Some(g),
            _ => None,
        }
    }

    pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// ISO-8601 rendering, e.g. `P1DT2H3M4.005S`.
    pub fn format_duration(millis: i64) -> String {
        let days = millis / MILLIS_PER_DAY;
        let mut rest = millis % MILLIS_PER_DAY;
        let hours = rest / MILLIS_PER_HOUR;
        rest %= MILLIS_PER_HOUR;
        let minutes = rest / MILLIS_PER_MINUTE;
        rest %= MILLIS_PER_MINUTE;
        let seconds = rest / MILLIS_PER_SECOND;
        let fraction = rest % MILLIS_PER_SECOND;

        let mut out = String::from("P");
        if days > 0 {
            out.push_str(&format!("{}D", days));
        }
        if hours > 0 || minutes > 0 || seconds > 0 || fraction > 0 || days == 0 {
            out.push('T');
            if hours > 0 {
                out.push_str(&format!("{}H", hours));
            }
            if minutes > 0 {
                out.push_str(&format!("{}M", minutes));
            }
            if fraction > 0 {
                out.push_str(&format!("{}.{:03}S", seconds, fraction));
            } else if seconds > 0 || (days == 0 && hours == 0 && minutes == 0) {
                out.push_str(&format!("{}S", seconds));
            }
        }
        out
    }

    pub fn quote_text(text: &str) -> String {
        format!("'{}'", text.replace('\'', "\\'"))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<NotNan<f64>> for Value {
    fn from(value: NotNan<f64>) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<GeometryValue> for Value {
    fn from(value: GeometryValue) -> Self {
        Value::Geometry(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{:?}", n.into_inner()),
            Value::Text(s) => write!(f, "{}", Self::quote_text(s)),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Timestamp(ts) => write!(f, "{}", Self::format_timestamp(ts)),
            Value::Duration(ms) => write!(f, "{}", Self::format_duration(*ms)),
            Value::Period { begin, end } => {
                write!(f, "{}/{}", Self::format_timestamp(begin), Self::format_timestamp(end))
            }
            Value::Geometry(g) => match g.crs.as_ref().and_then(CrsRef::srid) {
                Some(srid) => write!(f, "SRID={};{}", srid, WktWriter::write(&g.geometry)),
                None => write!(f, "{}", WktWriter::write(&g.geometry)),
            },
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(_) => write!(f, "Integer({})", self),
            Value::Float(_) => write!(f, "Float({})", self),
            Value::Text(_) => write!(f, "Text({})", self),
            Value::Boolean(_) => write!(f, "Boolean({})", self),
            Value::Timestamp(_) => write!(f, "Timestamp({})", self),
            Value::Duration(ms) => write!(f, "Duration({}ms)", ms),
            Value::Period { .. } => write!(f, "Period({})", self),
            Value::Geometry(g) => match &g.crs {
                Some(crs) => write!(f, "Geometry({} @ {})", WktWriter::write(&g.geometry), crs),
                None => write!(f, "Geometry({})", WktWriter::write(&g.geometry)),
            },
        }
    }
}
