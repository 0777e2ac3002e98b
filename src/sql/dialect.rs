use crate::{
    parser::ast::{DistanceOp, SpatialOp},
    sql::CompileError,
};

/// Per-backend extension point of the SQL compiler.
///
/// The compiler renders everything dialect independent itself and calls into
/// the dialect for names, case folding and the spatial operators. Operands
/// arrive already rendered; `geometry` is whatever [`SqlDialect::geometry_literal`]
/// produced or a column.
pub trait SqlDialect: Send + Sync {
    fn name(&self) -> &'static str;

    fn quote_name(&self, name: &str) -> String;

    fn upper(&self, sql: &str) -> String {
        format!("UPPER({})", sql)
    }

    /// Wildcards in `pattern` are escaped with a backslash.
    fn like(&self, expr: &str, pattern: &str, match_case: bool) -> String {
        if match_case {
            format!("{} LIKE {} ESCAPE '\\'", expr, pattern)
        } else {
            format!("{} LIKE {} ESCAPE '\\'", self.upper(expr), self.upper(pattern))
        }
    }

    /// Geometry construction from WKT. `wkt` is a quoted literal or a
    /// placeholder.
    fn geometry_literal(&self, _wkt: &str, _srid: i64) -> Result<String, CompileError> {
        Err(CompileError::Unsupported(format!("geometry literals in the {} dialect", self.name())))
    }

    /// `swapped` is true when the geometry was written before the property,
    /// `loose` asks for the bounding box test alone.
    fn spatial(
        &self,
        op: SpatialOp,
        _property: &str,
        _geometry: &str,
        _swapped: bool,
        _loose: bool,
    ) -> Result<String, CompileError> {
        Err(CompileError::Unsupported(format!("{} in the {} dialect", op.keyword(), self.name())))
    }

    fn distance(
        &self,
        op: DistanceOp,
        _property: &str,
        _geometry: &str,
        _distance: f64,
        _swapped: bool,
    ) -> Result<String, CompileError> {
        Err(CompileError::Unsupported(format!("{} in the {} dialect", op.keyword(), self.name())))
    }
}

/// Plain SQL without spatial support. Names are only quoted when they are
/// not simple identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl GenericDialect {
    fn is_simple(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
            _ => false,
        }
    }
}

impl SqlDialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn quote_name(&self, name: &str) -> String {
        match Self::is_simple(name) {
            true => name.to_string(),
            false => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::ast::SpatialOp,
        sql::{CompileError, GenericDialect, SqlDialect},
    };

    #[test]
    fn test_generic_quote_name() {
        assert_eq!(GenericDialect.quote_name("att1"), "att1");
        assert_eq!(GenericDialect.quote_name("road name"), "\"road name\"");
        assert_eq!(GenericDialect.quote_name("1st"), "\"1st\"");
    }

    #[test]
    fn test_generic_case_insensitive_like() {
        assert_eq!(GenericDialect.like("name", "'a%'", false), "UPPER(name) LIKE UPPER('a%') ESCAPE '\\'");
        assert_eq!(GenericDialect.like("name", "'a%'", true), "name LIKE 'a%' ESCAPE '\\'");
    }

    #[test]
    fn test_generic_has_no_spatial() {
        match GenericDialect.spatial(SpatialOp::Intersects, "geom", "g", false, false) {
            Err(CompileError::Unsupported(msg)) => assert_eq!(msg, "INTERSECTS in the generic dialect"),
            _ => panic!(),
        }
        assert!(GenericDialect.geometry_literal("'POINT (1 1)'", 4326).is_err());
    }
}
