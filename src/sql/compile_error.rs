use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A predicate, operator or operand shape the dialect cannot express.
    Unsupported(String),
    /// An identifier filter with no configured FID column.
    MissingFidColumn,
    /// A literal that has no SQL rendering in the position it appears.
    InvalidLiteral(String),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Unsupported(what) => write!(f, "CompileError: unsupported {}", what),
            CompileError::MissingFidColumn => write!(f, "CompileError: identifier filter without a FID column"),
            CompileError::InvalidLiteral(what) => write!(f, "CompileError: invalid literal {}", what),
        }
    }
}

impl std::error::Error for CompileError {}
