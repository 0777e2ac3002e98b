use std::fmt::Display;

use crate::geometry::CrsRef;

/// Raised while moving geometry literals into the CRS of their attribute.
/// `predicate` is the CQL text of the offending predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum AdaptError {
    NoTransformPath { source: CrsRef, target: CrsRef, predicate: String },
    UnanchoredGeometry { predicate: String },
}

impl Display for AdaptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdaptError::NoTransformPath { source, target, predicate } => write!(
                f,
                "AdaptError: no transform path from {} to {} in '{}'",
                source, target, predicate
            ),
            AdaptError::UnanchoredGeometry { predicate } => {
                write!(f, "AdaptError: geometry literal without CRS in '{}'", predicate)
            }
        }
    }
}

impl std::error::Error for AdaptError {}

/// A spatial predicate whose property is not a geometry attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub property: String,
    pub predicate: String,
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ValidationFailure: '{}' is not a geometry attribute in '{}'",
            self.property, self.predicate
        )
    }
}

impl std::error::Error for ValidationFailure {}
