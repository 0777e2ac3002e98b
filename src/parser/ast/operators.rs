use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parser::CqlParser;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparatorOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq
}

impl fmt::Display for ComparatorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparatorOp::Eq => write!(f, "="),
            ComparatorOp::NotEq => write!(f, "<>"),
            ComparatorOp::Lt => write!(f, "<"),
            ComparatorOp::LtEq => write!(f, "<="),
            ComparatorOp::Gt => write!(f, ">"),
            ComparatorOp::GtEq => write!(f, ">="),
        }
    }
}

impl fmt::Debug for ComparatorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComparatorOp({})", self)
    }
}

impl ComparatorOp {
    /// Consumes a comparison operator at the cursor. Two character operators
    /// are tried first so `<=` is never read as `<`.
    pub fn check(parser: &mut CqlParser) -> Option<ComparatorOp> {
        let table = [
            ("<>", ComparatorOp::NotEq),
            ("!=", ComparatorOp::NotEq),
            ("<=", ComparatorOp::LtEq),
            (">=", ComparatorOp::GtEq),
            ("=", ComparatorOp::Eq),
            ("<", ComparatorOp::Lt),
            (">", ComparatorOp::Gt),
        ];

        for (symbol, op) in table {
            if parser.starts_with(symbol) {
                parser.jump(symbol.len());
                return Some(op);
            }
        }

        None
    }

    /// Operator obtained by exchanging the two operands.
    pub fn flipped(&self) -> ComparatorOp {
        match self {
            ComparatorOp::Lt => ComparatorOp::Gt,
            ComparatorOp::LtEq => ComparatorOp::GtEq,
            ComparatorOp::Gt => ComparatorOp::Lt,
            ComparatorOp::GtEq => ComparatorOp::LtEq,
            other => *other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div
}

impl ArithmeticOp {
    pub fn symbol(&self) -> char {
        match self {
            ArithmeticOp::Add => '+',
            ArithmeticOp::Sub => '-',
            ArithmeticOp::Mul => '*',
            ArithmeticOp::Div => '/',
        }
    }

    pub fn from_symbol(ch: char) -> Option<ArithmeticOp> {
        match ch {
            '+' => Some(ArithmeticOp::Add),
            '-' => Some(ArithmeticOp::Sub),
            '*' => Some(ArithmeticOp::Mul),
            '/' => Some(ArithmeticOp::Div),
            _ => None,
        }
    }
}

/// Binary spatial relations between a property and a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpatialOp {
    BBox,
    Intersects,
    Contains,
    Within,
    Touches,
    Crosses,
    Overlaps,
    Disjoint,
    Equals,
}

impl SpatialOp {
    pub const ALL: [SpatialOp; 9] = [
        SpatialOp::BBox,
        SpatialOp::Intersects,
        SpatialOp::Contains,
        SpatialOp::Within,
        SpatialOp::Touches,
        SpatialOp::Crosses,
        SpatialOp::Overlaps,
        SpatialOp::Disjoint,
        SpatialOp::Equals,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            SpatialOp::BBox => "BBOX",
            SpatialOp::Intersects => "INTERSECTS",
            SpatialOp::Contains => "CONTAINS",
            SpatialOp::Within => "WITHIN",
            SpatialOp::Touches => "TOUCHES",
            SpatialOp::Crosses => "CROSSES",
            SpatialOp::Overlaps => "OVERLAPS",
            SpatialOp::Disjoint => "DISJOINT",
            SpatialOp::Equals => "EQUALS",
        }
    }

    /// The relation seen from the other operand.
    pub fn converse(&self) -> SpatialOp {
        match self {
            SpatialOp::Contains => SpatialOp::Within,
            SpatialOp::Within => SpatialOp::Contains,
            other => *other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceOp {
    DWithin,
    Beyond,
}

impl DistanceOp {
    pub const ALL: [DistanceOp; 2] = [DistanceOp::DWithin, DistanceOp::Beyond];

    pub fn keyword(&self) -> &'static str {
        match self {
            DistanceOp::DWithin => "DWITHIN",
            DistanceOp::Beyond => "BEYOND",
        }
    }
}

/// Allen interval relations between a temporal property and an instant or
/// period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemporalOp {
    After,
    Before,
    Begins,
    BegunBy,
    TContains,
    During,
    EndedBy,
    Ends,
    Meets,
    MetBy,
    TOverlaps,
    OverlappedBy,
    TEquals,
    AnyInteracts,
}

impl TemporalOp {
    pub const ALL: [TemporalOp; 14] = [
        TemporalOp::After,
        TemporalOp::Before,
        TemporalOp::Begins,
        TemporalOp::BegunBy,
        TemporalOp::TContains,
        TemporalOp::During,
        TemporalOp::EndedBy,
        TemporalOp::Ends,
        TemporalOp::Meets,
        TemporalOp::MetBy,
        TemporalOp::TOverlaps,
        TemporalOp::OverlappedBy,
        TemporalOp::TEquals,
        TemporalOp::AnyInteracts,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            TemporalOp::After => "AFTER",
            TemporalOp::Before => "BEFORE",
            TemporalOp::Begins => "BEGINS",
            TemporalOp::BegunBy => "BEGUNBY",
            TemporalOp::TContains => "TCONTAINS",
            TemporalOp::During => "DURING",
            TemporalOp::EndedBy => "ENDEDBY",
            TemporalOp::Ends => "ENDS",
            TemporalOp::Meets => "MEETS",
            TemporalOp::MetBy => "METBY",
            TemporalOp::TOverlaps => "TOVERLAPS",
            TemporalOp::OverlappedBy => "OVERLAPPEDBY",
            TemporalOp::TEquals => "TEQUALS",
            TemporalOp::AnyInteracts => "ANYINTERACTS",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::ComparatorOp, CqlParser};

    #[test]
    fn test_check_prefers_two_char_operators() {
        let mut parser = CqlParser::new("<= 3");
        assert_eq!(ComparatorOp::check(&mut parser), Some(ComparatorOp::LtEq));
        assert_eq!(parser.position, 2);
    }

    #[test]
    fn test_check_bang_equal() {
        let mut parser = CqlParser::new("!= 3");
        assert_eq!(ComparatorOp::check(&mut parser), Some(ComparatorOp::NotEq));
    }

    #[test]
    fn test_check_none() {
        let mut parser = CqlParser::new("LIKE 'a'");
        assert_eq!(ComparatorOp::check(&mut parser), None);
        assert_eq!(parser.position, 0);
    }
}
