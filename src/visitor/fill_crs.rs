use std::{borrow::Cow, convert::Infallible};

use crate::{
    geometry::{CrsRef, GeometryValue},
    parser::ast::{Expression, Predicate, Value},
    visitor::{apply, walk_expression, FilterVisitor},
};

/// Anchors every geometry literal that has no CRS to a default one.
/// Anchored literals are never touched.
pub struct FillCrsVisitor {
    crs: CrsRef,
}

impl FillCrsVisitor {
    pub fn new(crs: CrsRef) -> Self {
        Self { crs }
    }

    pub fn fill<'a>(&mut self, predicate: &'a Predicate) -> Cow<'a, Predicate> {
        apply(self, predicate)
    }
}

impl FilterVisitor for FillCrsVisitor {
    type Error = Infallible;

    fn visit_expression<'a>(&mut self, expression: &'a Expression) -> Result<Cow<'a, Expression>, Infallible> {
        match expression {
            Expression::Literal(Value::Geometry(value)) if !value.is_anchored() => Ok(Cow::Owned(Expression::Literal(
                Value::Geometry(GeometryValue::with_crs(value.geometry.clone(), self.crs.clone())),
            ))),
            _ => walk_expression(self, expression),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use crate::{
        geometry::{CrsRef, Geometry},
        parser::ast::builders::*,
        visitor::FillCrsVisitor,
    };

    #[test]
    fn test_fill_unanchored() {
        let filter = bbox(property("geom"), envelope(0.0, 0.0, 1.0, 1.0, None));
        let filled = FillCrsVisitor::new(CrsRef::epsg(4326)).fill(&filter).into_owned();
        assert_eq!(filled, bbox(property("geom"), envelope(0.0, 0.0, 1.0, 1.0, Some(CrsRef::epsg(4326)))));
    }

    #[test]
    fn test_fill_keeps_anchored() {
        let filter = intersects(property("geom"), geometry(Geometry::Point(None), Some(CrsRef::epsg(3857))));
        assert!(matches!(FillCrsVisitor::new(CrsRef::epsg(4326)).fill(&filter), Cow::Borrowed(_)));
    }
}
