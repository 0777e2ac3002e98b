use serde::{Deserialize, Serialize};

use crate::parser::ast::Value;

/// Coarse classification of the values an attribute holds.
///
/// This mirrors the variants of [`Value`] and is what the schema reports
/// when a property path is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Boolean flag
    Bool,
    /// Integer number
    Int,
    /// Floating-point number
    Float,
    /// Character data
    String,
    /// Instant in time
    Timestamp,
    /// Elapsed time
    Duration,
    /// Any geometry shape
    Geometry,
}

impl AttributeKind {
    /// Classify a literal value.
    pub fn of_value(v: &Value) -> AttributeKind {
        match v {
            Value::Boolean(_) => AttributeKind::Bool,
            Value::Integer(_) => AttributeKind::Int,
            Value::Float(_) => AttributeKind::Float,
            Value::Text(_) => AttributeKind::String,
            Value::Timestamp(_) | Value::Period { .. } => AttributeKind::Timestamp,
            Value::Duration(_) => AttributeKind::Duration,
            Value::Geometry(_) => AttributeKind::Geometry,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, AttributeKind::Int | AttributeKind::Float)
    }

    pub fn is_geometry(&self) -> bool {
        matches!(self, AttributeKind::Geometry)
    }
}
