//! Programmatic construction of filters, equivalent to what the parser
//! produces: `and(vec![eq(property("att"), literal(15)), ...])`.

use crate::{
    geometry::{CrsRef, Envelope, Geometry, GeometryValue},
    parser::ast::{
        ArithmeticOp, Between, ComparatorOp, Comparison, DistanceOp, Expression, Function, Like, Predicate,
        ResourceId, SpatialBinary, SpatialDistance, SpatialOp, TemporalBinary, TemporalOp, Value,
    },
};

pub fn property(path: &str) -> Expression {
    Expression::property(path)
}

pub fn literal(value: impl Into<Value>) -> Expression {
    Expression::literal(value)
}

pub fn function(name: &str, args: Vec<Expression>) -> Expression {
    Expression::Function(Function::new(name, args))
}

pub fn geometry(geometry: Geometry, crs: Option<CrsRef>) -> Expression {
    Expression::Literal(Value::Geometry(GeometryValue { geometry, crs }))
}

/// Envelope literal from corner coordinates.
pub fn envelope(min_x: f64, min_y: f64, max_x: f64, max_y: f64, crs: Option<CrsRef>) -> Expression {
    geometry(Geometry::Envelope(Some(Envelope::new(min_x, min_y, max_x, max_y))), crs)
}

pub fn add(left: Expression, right: Expression) -> Expression {
    Expression::arithmetic(ArithmeticOp::Add, left, right)
}

pub fn sub(left: Expression, right: Expression) -> Expression {
    Expression::arithmetic(ArithmeticOp::Sub, left, right)
}

pub fn mul(left: Expression, right: Expression) -> Expression {
    Expression::arithmetic(ArithmeticOp::Mul, left, right)
}

pub fn div(left: Expression, right: Expression) -> Expression {
    Expression::arithmetic(ArithmeticOp::Div, left, right)
}

pub fn and(items: Vec<Predicate>) -> Predicate {
    Predicate::And(items)
}

pub fn or(items: Vec<Predicate>) -> Predicate {
    Predicate::Or(items)
}

pub fn not(inner: Predicate) -> Predicate {
    Predicate::Not(Box::new(inner))
}

pub fn compare(op: ComparatorOp, left: Expression, right: Expression) -> Predicate {
    Predicate::Comparison(Comparison::new(op, left, right))
}

pub fn eq(left: Expression, right: Expression) -> Predicate {
    compare(ComparatorOp::Eq, left, right)
}

pub fn not_eq(left: Expression, right: Expression) -> Predicate {
    compare(ComparatorOp::NotEq, left, right)
}

pub fn lt(left: Expression, right: Expression) -> Predicate {
    compare(ComparatorOp::Lt, left, right)
}

pub fn lte(left: Expression, right: Expression) -> Predicate {
    compare(ComparatorOp::LtEq, left, right)
}

pub fn gt(left: Expression, right: Expression) -> Predicate {
    compare(ComparatorOp::Gt, left, right)
}

pub fn gte(left: Expression, right: Expression) -> Predicate {
    compare(ComparatorOp::GtEq, left, right)
}

pub fn between(expr: Expression, lower: Expression, upper: Expression) -> Predicate {
    Predicate::Between(Between { expr, lower, upper })
}

pub fn like(expr: Expression, pattern: &str) -> Predicate {
    Predicate::Like(Like::new(expr, pattern, true))
}

pub fn ilike(expr: Expression, pattern: &str) -> Predicate {
    Predicate::Like(Like::new(expr, pattern, false))
}

pub fn is_null(expr: Expression) -> Predicate {
    Predicate::IsNull(expr)
}

pub fn is_nil(expr: Expression) -> Predicate {
    Predicate::IsNil(expr)
}

pub fn resource_id(id: &str) -> Predicate {
    Predicate::ResourceId(ResourceId::new(id))
}

pub fn spatial(op: SpatialOp, first: Expression, second: Expression) -> Predicate {
    Predicate::Spatial(SpatialBinary::new(op, first, second))
}

pub fn bbox(first: Expression, second: Expression) -> Predicate {
    spatial(SpatialOp::BBox, first, second)
}

pub fn loose_bbox(property: Expression, geometry: Expression) -> Predicate {
    Predicate::Spatial(SpatialBinary::loose_bbox(property, geometry))
}

pub fn intersects(first: Expression, second: Expression) -> Predicate {
    spatial(SpatialOp::Intersects, first, second)
}

pub fn within(first: Expression, second: Expression) -> Predicate {
    spatial(SpatialOp::Within, first, second)
}

pub fn contains(first: Expression, second: Expression) -> Predicate {
    spatial(SpatialOp::Contains, first, second)
}

pub fn disjoint(first: Expression, second: Expression) -> Predicate {
    spatial(SpatialOp::Disjoint, first, second)
}

pub fn dwithin(first: Expression, second: Expression, distance: f64, unit: &str) -> Predicate {
    Predicate::Distance(SpatialDistance::new(DistanceOp::DWithin, first, second, distance, unit))
}

pub fn beyond(first: Expression, second: Expression, distance: f64, unit: &str) -> Predicate {
    Predicate::Distance(SpatialDistance::new(DistanceOp::Beyond, first, second, distance, unit))
}

pub fn temporal(op: TemporalOp, property: Expression, operand: Expression) -> Predicate {
    Predicate::Temporal(TemporalBinary::new(op, property, operand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_filter;

    #[test]
    pub fn test_builders_match_parser() {
        let built = and(vec![eq(property("att1"), literal(15)), eq(property("att2"), literal(30))]);
        assert_eq!(parse_filter("att1 = 15 AND att2 = 30").expect("Failed to parse"), built);
    }

    #[test]
    pub fn test_builders_normalise_spatial_operands() {
        let built = within(envelope(0.0, 0.0, 1.0, 1.0, None), property("geom"));
        match built {
            Predicate::Spatial(spatial) => {
                assert!(spatial.swapped);
                assert_eq!(spatial.property, property("geom"));
            }
            _ => panic!(),
        }
    }
}
