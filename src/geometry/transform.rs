use std::{fmt::{self, Display}, sync::Arc};

use crate::geometry::{Coord, CrsRef, Geometry, GeometryValue};

/// A resolved math transform between two reference systems.
pub trait CoordinateTransform: Send + Sync {
    fn apply(&self, coord: Coord) -> Coord;
}

impl<F> CoordinateTransform for F
where
    F: Fn(Coord) -> Coord + Send + Sync,
{
    fn apply(&self, coord: Coord) -> Coord {
        self(coord)
    }
}

/// Raised by a registry that has no path between two systems.
#[derive(Debug, Clone, PartialEq)]
pub struct NoTransformPath {
    pub source: CrsRef,
    pub target: CrsRef,
}

impl Display for NoTransformPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no transform path from {} to {}", self.source, self.target)
    }
}

impl std::error::Error for NoTransformPath {}

/// Process wide CRS/reprojection capability. Implementations are read-only
/// from the point of view of this crate and may be shared across threads.
pub trait CrsRegistry: Send + Sync {
    fn find_transform(&self, source: &CrsRef, target: &CrsRef) -> Result<Arc<dyn CoordinateTransform>, NoTransformPath>;

    fn transform(&self, geometry: &Geometry, transform: &dyn CoordinateTransform) -> Geometry {
        geometry.map_coords(&|c| transform.apply(c))
    }
}

impl GeometryValue {
    /// Reprojects an anchored literal into `target`. Unanchored literals and
    /// literals already in `target` are returned as-is.
    pub fn reproject(&self, target: &CrsRef, registry: &dyn CrsRegistry) -> Result<GeometryValue, NoTransformPath> {
        let Some(source) = &self.crs else {
            return Ok(self.clone());
        };
        if source.same_crs(target) {
            return Ok(self.clone());
        }

        let transform = registry.find_transform(source, target)?;
        Ok(GeometryValue::with_crs(registry.transform(&self.geometry, transform.as_ref()), target.clone()))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use crate::geometry::{Coord, CoordinateTransform, CrsRef, CrsRegistry, NoTransformPath};

    /// Knows a single fake path EPSG:4326 <-> EPSG:3857 that scales by 1000.
    pub struct ScalingRegistry;

    impl CrsRegistry for ScalingRegistry {
        fn find_transform(&self, source: &CrsRef, target: &CrsRef) -> Result<Arc<dyn CoordinateTransform>, NoTransformPath> {
            match (source.srid(), target.srid()) {
                (Some(4326), Some(3857)) => Ok(Arc::new(|c: Coord| Coord::new(c.x * 1000.0, c.y * 1000.0))),
                (Some(3857), Some(4326)) => Ok(Arc::new(|c: Coord| Coord::new(c.x / 1000.0, c.y / 1000.0))),
                _ => Err(NoTransformPath { source: source.clone(), target: target.clone() }),
            }
        }
    }
}
