use std::borrow::Cow;

use tracing::{debug, trace};

use crate::{
    geometry::{CrsRef, CrsRegistry, GeometryValue},
    parser::ast::{Expression, Predicate, SpatialBinary, SpatialDistance, Value},
    schema::AttributeResolver,
    visitor::{walk_predicate, AdaptError, FillCrsVisitor, FilterVisitor},
};

/// Reprojects geometry literals of spatial predicates into the CRS of the
/// attribute they are compared against.
///
/// With a default CRS, unanchored literals are first anchored through
/// [`FillCrsVisitor`]. Literals that stay unanchored are left alone, or
/// rejected in strict mode.
pub struct CrsAdaptor<'s> {
    schema: &'s dyn AttributeResolver,
    registry: &'s dyn CrsRegistry,
    default_crs: Option<CrsRef>,
    strict: bool,
}

impl<'s> CrsAdaptor<'s> {
    pub fn new(schema: &'s dyn AttributeResolver, registry: &'s dyn CrsRegistry) -> Self {
        Self { schema, registry, default_crs: None, strict: false }
    }

    pub fn with_default_crs(mut self, crs: CrsRef) -> Self {
        self.default_crs = Some(crs);
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn adapt<'a>(&mut self, predicate: &'a Predicate) -> Result<Cow<'a, Predicate>, AdaptError> {
        let filled = match &self.default_crs {
            Some(crs) => FillCrsVisitor::new(crs.clone()).fill(predicate),
            None => Cow::Borrowed(predicate),
        };

        match filled {
            Cow::Borrowed(predicate) => self.visit_predicate(predicate),
            Cow::Owned(predicate) => self.visit_predicate(&predicate).map(|p| Cow::Owned(p.into_owned())),
        }
    }

    /// Target CRS for a property operand, when it is a geometry attribute
    /// with a declared reference system.
    fn target_crs(&self, property: &Expression) -> Option<CrsRef> {
        let path = property.as_property()?;
        let info = self.schema.resolve(path)?;
        if !info.kind.is_geometry() {
            return None;
        }
        info.crs
    }

    /// The literal moved into `property`'s CRS, `None` when nothing changes.
    fn reproject(
        &self,
        predicate: &Predicate,
        property: &Expression,
        geometry: &Expression,
    ) -> Result<Option<GeometryValue>, AdaptError> {
        let Some(Value::Geometry(value)) = geometry.as_literal() else {
            return Ok(None);
        };

        let Some(target) = self.target_crs(property) else {
            return Ok(None);
        };

        let Some(source) = &value.crs else {
            if self.strict {
                return Err(AdaptError::UnanchoredGeometry { predicate: predicate.to_string() });
            }
            trace!(predicate = %predicate, "unanchored geometry left as is");
            return Ok(None);
        };
        if source.same_crs(&target) {
            return Ok(None);
        }

        debug!(source = %source, target = %target, "reprojecting geometry literal");
        value
            .reproject(&target, self.registry)
            .map(Some)
            .map_err(|err| AdaptError::NoTransformPath {
                source: err.source,
                target: err.target,
                predicate: predicate.to_string(),
            })
    }
}

impl FilterVisitor for CrsAdaptor<'_> {
    type Error = AdaptError;

    fn visit_predicate<'a>(&mut self, predicate: &'a Predicate) -> Result<Cow<'a, Predicate>, AdaptError> {
        match predicate {
            Predicate::Spatial(spatial) => {
                Ok(match self.reproject(predicate, &spatial.property, &spatial.geometry)? {
                    Some(value) => Cow::Owned(Predicate::Spatial(SpatialBinary {
                        op: spatial.op,
                        property: spatial.property.clone(),
                        geometry: Expression::Literal(Value::Geometry(value)),
                        swapped: spatial.swapped,
                        loose: spatial.loose,
                    })),
                    None => Cow::Borrowed(predicate),
                })
            }
            Predicate::Distance(distance) => {
                Ok(match self.reproject(predicate, &distance.property, &distance.geometry)? {
                    Some(value) => Cow::Owned(Predicate::Distance(SpatialDistance {
                        op: distance.op,
                        property: distance.property.clone(),
                        geometry: Expression::Literal(Value::Geometry(value)),
                        distance: distance.distance,
                        unit: distance.unit.clone(),
                        swapped: distance.swapped,
                    })),
                    None => Cow::Borrowed(predicate),
                })
            }
            _ => walk_predicate(self, predicate),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use crate::{
        geometry::{transform::fixtures::ScalingRegistry, Coord, CrsRef, Geometry},
        parser::ast::{builders::*, Predicate},
        schema::{AttributeInfo, AttributeKind, FeatureSchema},
        visitor::{AdaptError, CrsAdaptor},
    };

    fn schema() -> FeatureSchema {
        FeatureSchema::new("roads")
            .with_attribute("name", AttributeInfo::new(AttributeKind::String))
            .with_attribute("geom", AttributeInfo::geometry(Some(CrsRef::epsg(3857))))
    }

    fn point(x: f64, y: f64, crs: Option<CrsRef>) -> crate::parser::ast::Expression {
        geometry(Geometry::Point(Some(Coord::new(x, y))), crs)
    }

    #[test]
    fn test_reprojects_into_attribute_crs() {
        let schema = schema();
        let mut adaptor = CrsAdaptor::new(&schema, &ScalingRegistry);
        let filter = intersects(property("geom"), point(1.0, 2.0, Some(CrsRef::epsg(4326))));

        let adapted = adaptor.adapt(&filter).expect("Failed to adapt").into_owned();
        assert_eq!(adapted, intersects(property("geom"), point(1000.0, 2000.0, Some(CrsRef::epsg(3857)))));
    }

    #[test]
    fn test_same_crs_is_untouched() {
        let schema = schema();
        let mut adaptor = CrsAdaptor::new(&schema, &ScalingRegistry);
        let filter = and(vec![
            eq(property("name"), literal("A1")),
            intersects(property("geom"), point(1.0, 2.0, Some(CrsRef::epsg(3857).with_name("Pseudo-Mercator")))),
        ]);

        match adaptor.adapt(&filter).expect("Failed to adapt") {
            Cow::Borrowed(same) => assert!(std::ptr::eq(same, &filter)),
            Cow::Owned(_) => panic!(),
        }
    }

    #[test]
    fn test_default_geometry_and_swapped_operands() {
        let schema = schema();
        let mut adaptor = CrsAdaptor::new(&schema, &ScalingRegistry);
        let filter = within(point(1.0, 1.0, Some(CrsRef::epsg(4326))), property(""));

        match adaptor.adapt(&filter).expect("Failed to adapt").into_owned() {
            Predicate::Spatial(spatial) => {
                assert!(spatial.swapped);
                assert_eq!(spatial.geometry, point(1000.0, 1000.0, Some(CrsRef::epsg(3857))));
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_preserves_loose_bbox() {
        let schema = schema();
        let mut adaptor = CrsAdaptor::new(&schema, &ScalingRegistry);
        let filter = loose_bbox(property("geom"), envelope(0.0, 0.0, 1.0, 1.0, Some(CrsRef::epsg(4326))));

        match adaptor.adapt(&filter).expect("Failed to adapt").into_owned() {
            Predicate::Spatial(spatial) => {
                assert!(spatial.loose);
                assert_eq!(spatial.geometry, envelope(0.0, 0.0, 1000.0, 1000.0, Some(CrsRef::epsg(3857))));
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_fill_then_reproject() {
        let schema = schema();
        let mut adaptor = CrsAdaptor::new(&schema, &ScalingRegistry).with_default_crs(CrsRef::epsg(4326));
        let filter = dwithin(property("geom"), point(1.0, 2.0, None), 10.0, "m");

        let adapted = adaptor.adapt(&filter).expect("Failed to adapt").into_owned();
        assert_eq!(adapted, dwithin(property("geom"), point(1000.0, 2000.0, Some(CrsRef::epsg(3857))), 10.0, "m"));
    }

    #[test]
    fn test_unanchored_literal() {
        let schema = schema();
        let filter = intersects(property("geom"), point(1.0, 2.0, None));

        let mut lenient = CrsAdaptor::new(&schema, &ScalingRegistry);
        assert!(matches!(lenient.adapt(&filter), Ok(Cow::Borrowed(_))));

        let mut strict = CrsAdaptor::new(&schema, &ScalingRegistry).strict();
        assert!(matches!(strict.adapt(&filter), Err(AdaptError::UnanchoredGeometry { .. })));
    }

    #[test]
    fn test_no_transform_path_names_both_crs() {
        let schema = schema();
        let mut adaptor = CrsAdaptor::new(&schema, &ScalingRegistry);
        let filter = or(vec![
            eq(property("name"), literal("x")),
            intersects(property("geom"), point(1.0, 2.0, Some(CrsRef::epsg(27700)))),
        ]);

        match adaptor.adapt(&filter) {
            Err(AdaptError::NoTransformPath { source, target, predicate }) => {
                assert_eq!(source, CrsRef::epsg(27700));
                assert_eq!(target, CrsRef::epsg(3857));
                assert!(predicate.starts_with("INTERSECTS(geom"));
            }
            other => panic!("{:?}", other),
        }
    }
}
