use crate::{
    parser::ast::{DistanceOp, SpatialOp},
    sql::{CompileError, SqlDialect},
};

/// PostgreSQL with the PostGIS extension.
///
/// Exact relations are guarded by an `&&` index test. `Disjoint` cannot use
/// the index and is written as a negated intersection.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgisDialect;

impl PostgisDialect {
    fn function(op: SpatialOp) -> &'static str {
        match op {
            SpatialOp::BBox | SpatialOp::Intersects | SpatialOp::Disjoint => "ST_Intersects",
            SpatialOp::Contains => "ST_Contains",
            SpatialOp::Within => "ST_Within",
            SpatialOp::Touches => "ST_Touches",
            SpatialOp::Crosses => "ST_Crosses",
            SpatialOp::Overlaps => "ST_Overlaps",
            SpatialOp::Equals => "ST_Equals",
        }
    }
}

impl SqlDialect for PostgisDialect {
    fn name(&self) -> &'static str {
        "postgis"
    }

    fn quote_name(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    // Backslash is already the LIKE escape character in PostgreSQL.
    fn like(&self, expr: &str, pattern: &str, match_case: bool) -> String {
        let op = if match_case { "LIKE" } else { "ILIKE" };
        format!("{} {} {}", expr, op, pattern)
    }

    fn geometry_literal(&self, wkt: &str, srid: i64) -> Result<String, CompileError> {
        Ok(format!("ST_GeomFromText({}, {})", wkt, srid))
    }

    fn spatial(
        &self,
        op: SpatialOp,
        property: &str,
        geometry: &str,
        swapped: bool,
        loose: bool,
    ) -> Result<String, CompileError> {
        let overlap = format!("{} && {}", property, geometry);
        if op == SpatialOp::BBox && loose {
            return Ok(overlap);
        }

        // the exact test always reads property first
        let op = if swapped { op.converse() } else { op };
        let exact = format!("{}({}, {})", Self::function(op), property, geometry);
        if op == SpatialOp::Disjoint {
            return Ok(format!("NOT ({})", exact));
        }
        Ok(format!("{} AND {}", overlap, exact))
    }

    fn distance(
        &self,
        op: DistanceOp,
        property: &str,
        geometry: &str,
        distance: f64,
        swapped: bool,
    ) -> Result<String, CompileError> {
        let within = matches!((op, swapped), (DistanceOp::DWithin, false) | (DistanceOp::Beyond, true));
        Ok(match within {
            true => format!("ST_DWithin({}, {}, {})", property, geometry, distance),
            false => format!("ST_Distance({}, {}) > {}", property, geometry, distance),
        })
    }
}
