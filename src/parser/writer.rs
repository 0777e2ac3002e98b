use crate::{
    geometry::Geometry,
    parser::{
        ast::{Expression, Predicate, PropertyParser, SpatialBinary, SpatialOp, TemporalParser, Value},
        CqlParser,
    },
};

/// Canonical CQL text for filters and expressions. Output re-parses to an
/// equal tree; spacing, quoting and parentheses are normalised.
pub struct CqlWriter;

impl CqlWriter {
    pub fn write_filter(predicate: &Predicate) -> String {
        let mut out = String::new();
        Self::filter(predicate, &mut out);
        out
    }

    pub fn write_expression(expression: &Expression) -> String {
        let mut out = String::new();
        Self::expression(expression, &mut out);
        out
    }

    fn filter(predicate: &Predicate, out: &mut String) {
        match predicate {
            Predicate::Include => out.push_str("INCLUDE"),
            Predicate::Exclude => out.push_str("EXCLUDE"),
            Predicate::And(items) if items.is_empty() => out.push_str("INCLUDE"),
            Predicate::Or(items) if items.is_empty() => out.push_str("EXCLUDE"),
            Predicate::And(items) => Self::junction(items, " AND ", out),
            Predicate::Or(items) if items.iter().all(|p| matches!(p, Predicate::ResourceId(_))) => {
                Self::resource_ids(items, out)
            }
            Predicate::Or(items) => Self::junction(items, " OR ", out),
            Predicate::Not(inner) => match inner.as_ref() {
                Predicate::IsNull(expr) => {
                    Self::expression(expr, out);
                    out.push_str(" IS NOT NULL");
                }
                Predicate::IsNil(expr) => {
                    Self::expression(expr, out);
                    out.push_str(" IS NOT NIL");
                }
                other => {
                    out.push_str("NOT (");
                    Self::filter(other, out);
                    out.push(')');
                }
            },
            Predicate::Comparison(cmp) => {
                Self::expression(&cmp.left, out);
                out.push_str(&format!(" {} ", cmp.op));
                Self::expression(&cmp.right, out);
            }
            Predicate::Between(between) => {
                Self::expression(&between.expr, out);
                out.push_str(" BETWEEN ");
                Self::expression(&between.lower, out);
                out.push_str(" AND ");
                Self::expression(&between.upper, out);
            }
            Predicate::Like(like) => {
                Self::expression(&like.expr, out);
                out.push_str(if like.match_case { " LIKE " } else { " ILIKE " });
                out.push_str(&Value::quote_text(&like.default_pattern()));
            }
            Predicate::IsNull(expr) => {
                Self::expression(expr, out);
                out.push_str(" IS NULL");
            }
            Predicate::IsNil(expr) => {
                Self::expression(expr, out);
                out.push_str(" IS NIL");
            }
            Predicate::ResourceId(_) => Self::resource_ids(std::slice::from_ref(predicate), out),
            Predicate::Spatial(spatial) => Self::spatial(spatial, out),
            Predicate::Distance(distance) => {
                let (first, second) = distance.operands();
                out.push_str(distance.op.keyword());
                out.push('(');
                Self::expression(first, out);
                out.push_str(", ");
                Self::expression(second, out);
                out.push_str(&format!(", {}, {})", distance.distance, distance.unit));
            }
            Predicate::Temporal(temporal) => {
                Self::expression(&temporal.property, out);
                out.push_str(&format!(" {} ", temporal.op.keyword()));
                Self::expression(&temporal.operand, out);
            }
        }
    }

    fn junction(items: &[Predicate], separator: &str, out: &mut String) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            match item {
                Predicate::And(_) | Predicate::Or(_) => {
                    out.push('(');
                    Self::filter(item, out);
                    out.push(')');
                }
                _ => Self::filter(item, out),
            }
        }
    }

    fn resource_ids(items: &[Predicate], out: &mut String) {
        let ids: Vec<String> = items
            .iter()
            .filter_map(|p| match p {
                Predicate::ResourceId(rid) => Some(Value::quote_text(&rid.to_text())),
                _ => None,
            })
            .collect();
        out.push_str(&format!("IN ({})", ids.join(", ")));
    }

    fn spatial(spatial: &SpatialBinary, out: &mut String) {
        let envelope = match (&spatial.geometry, spatial.op, spatial.swapped) {
            (Expression::Literal(Value::Geometry(value)), SpatialOp::BBox, false) => match &value.geometry {
                Geometry::Envelope(Some(envelope)) => Some((envelope, &value.crs)),
                _ => None,
            },
            _ => None,
        };

        out.push_str(spatial.op.keyword());
        out.push('(');
        if let Some((envelope, crs)) = envelope {
            Self::expression(&spatial.property, out);
            out.push_str(&format!(
                ", {}, {}, {}, {}",
                envelope.min_x, envelope.min_y, envelope.max_x, envelope.max_y
            ));
            if let Some(crs) = crs {
                out.push_str(&format!(", {}", Value::quote_text(&crs.to_string())));
            }
            out.push(')');
            return;
        }

        let (first, second) = spatial.operands();
        Self::expression(first, out);
        out.push_str(", ");
        Self::expression(second, out);
        out.push(')');
    }

    fn expression(expression: &Expression, out: &mut String) {
        match expression {
            Expression::Property(path) => Self::property(path, out),
            Expression::Literal(value) => out.push_str(&value.to_string()),
            Expression::Arithmetic { op, left, right } => {
                Self::operand(left, out);
                out.push_str(&format!(" {} ", op.symbol()));
                Self::operand(right, out);
            }
            Expression::Function(fun) => {
                out.push_str(&fun.name);
                out.push('(');
                for (i, arg) in fun.args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    Self::expression(arg, out);
                }
                out.push(')');
            }
        }
    }

    fn operand(expression: &Expression, out: &mut String) {
        if let Expression::Arithmetic { .. } = expression {
            out.push('(');
            Self::expression(expression, out);
            out.push(')');
            return;
        }
        Self::expression(expression, out);
    }

    fn property(path: &str, out: &mut String) {
        if PropertyParser::is_plain_identifier(path) && !Self::reads_as_literal(path) {
            out.push_str(path);
            return;
        }
        out.push('"');
        out.push_str(&path.replace('"', "\\\""));
        out.push('"');
    }

    /// Bare names the factor parser would take for a duration.
    fn reads_as_literal(path: &str) -> bool {
        TemporalParser::is_duration(&CqlParser::new(path))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        geometry::CrsRef,
        parser::{
            ast::{builders::*, Like, Predicate},
            parse_filter, CqlWriter,
        },
    };

    fn round_trip(text: &str) {
        let parsed = parse_filter(text).expect("Failed to parse filter");
        let written = CqlWriter::write_filter(&parsed);
        let reparsed = parse_filter(&written).unwrap_or_else(|e| panic!("{} -> {}: {}", text, written, e));
        assert_eq!(parsed, reparsed, "{} -> {}", text, written);
    }

    #[test]
    pub fn test_write_end_to_end_example() {
        let filter = and(vec![eq(property("att1"), literal(15)), eq(property("att2"), literal(30))]);
        assert_eq!(CqlWriter::write_filter(&filter), "att1 = 15 AND att2 = 30");
    }

    #[test]
    pub fn test_write_nested_junctions() {
        let filter = and(vec![
            or(vec![eq(property("a"), literal(1)), eq(property("b"), literal(2))]),
            not(is_null(property("c"))),
        ]);
        assert_eq!(CqlWriter::write_filter(&filter), "(a = 1 OR b = 2) AND c IS NOT NULL");
    }

    #[test]
    pub fn test_write_quotes_awkward_properties() {
        assert_eq!(CqlWriter::write_filter(&is_null(property("my att"))), "\"my att\" IS NULL");
        assert_eq!(CqlWriter::write_filter(&is_null(property("and"))), "\"and\" IS NULL");
        assert_eq!(CqlWriter::write_filter(&is_null(property("P1D"))), "\"P1D\" IS NULL");
        assert_eq!(CqlWriter::write_filter(&bbox(property(""), envelope(0.0, 0.0, 1.0, 1.0, None))), "BBOX(\"\", 0, 0, 1, 1)");
    }

    #[test]
    pub fn test_write_bbox_with_crs() {
        let filter = bbox(property("geom"), envelope(-10.0, -20.0, 10.0, 20.0, Some(CrsRef::epsg(4326))));
        assert_eq!(CqlWriter::write_filter(&filter), "BBOX(geom, -10, -20, 10, 20, 'EPSG:4326')");
    }

    #[test]
    pub fn test_write_custom_like_markers() {
        let filter = Predicate::Like(Like::new(property("name"), "a*b?", false).with_markers('*', '?', '!'));
        assert_eq!(CqlWriter::write_filter(&filter), "name ILIKE 'a%b_'");
    }

    #[test]
    pub fn test_write_resource_ids_collapse() {
        let filter = or(vec![resource_id("a.1"), resource_id("a.2")]);
        assert_eq!(CqlWriter::write_filter(&filter), "IN ('a.1', 'a.2')");
    }

    #[test]
    pub fn test_round_trip() {
        for text in [
            "att1 = 15 AND att2 = 30",
            "a = 1 OR (b <> 2 AND NOT (c < 3.5))",
            "(a + 1) * 2 >= -4",
            "a - (1 - 2) = 0",
            "name LIKE 'it\\'s%'",
            "name NOT ILIKE 'x_y'",
            "att BETWEEN 1 AND 2",
            "att NOT BETWEEN 1 AND 2",
            "att IS NOT NULL OR att IS NIL",
            "att IN ('a', 'b', 'c')",
            "IN ('river.1@3', 'river.2')",
            "INCLUDE",
            "EXCLUDE",
            "BBOX(geom, -10, -20, 10, 20)",
            "BBOX(geom, -10, -20, 10, 20, 'EPSG:3857')",
            "INTERSECTS(geom, SRID=4326;POLYGON((0 0, 1 0, 1 1, 0 0)))",
            "WITHIN(POINT(1 2), geom)",
            "DISJOINT(\"\", MULTIPOINT((1 2), (3 4)))",
            "DWITHIN(geom, POINT(0 0), 10, meters)",
            "BEYOND(LINESTRING(0 0, 1 1), geom, 2.5, feet)",
            "CROSSES(geom, GEOMETRYCOLLECTION(POINT(1 1), LINESTRING EMPTY))",
            "EQUALS(geom, ENVELOPE(1, 2, 3, 4))",
            "date AFTER 2006-11-30T01:30:00Z",
            "date DURING 2006-11-30T00:00:00Z/P1DT2H",
            "date TEQUALS 2006-11-30T00:00:00.250Z",
            "flag = TRUE AND area(geom) > 1e10",
            "elapsed > P1D",
            "BBOX(geom, 0, 0, 1e20, 1e20)",
            "INTERSECTS(geom, POINT(1e20 0))",
            "DWITHIN(geom, POINT(0 0), 1e20, m)",
            "d TEQUALS 2006-11-30T00:00:00.123456Z",
        ] {
            round_trip(text);
        }
    }
}
