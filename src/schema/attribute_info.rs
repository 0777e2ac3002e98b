use serde::{Deserialize, Serialize};

use crate::{geometry::CrsRef, schema::AttributeKind};

/// What the schema knows about a single attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub kind: AttributeKind,
    #[serde(default)]
    pub nullable: bool,
    /// Reference system of geometry valued attributes.
    #[serde(default)]
    pub crs: Option<CrsRef>,
    /// SRID the backing column is stored with, when it differs from `crs`
    /// or `crs` is not EPSG based.
    #[serde(default)]
    pub native_srid: Option<i64>,
}

impl AttributeInfo {
    pub fn new(kind: AttributeKind) -> Self {
        Self { kind, nullable: true, crs: None, native_srid: None }
    }

    pub fn geometry(crs: Option<CrsRef>) -> Self {
        Self { kind: AttributeKind::Geometry, nullable: true, crs, native_srid: None }
    }

    pub fn with_native_srid(mut self, srid: i64) -> Self {
        self.native_srid = Some(srid);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Native SRID when declared, otherwise the one implied by `crs`.
    pub fn srid(&self) -> Option<i64> {
        self.native_srid.or_else(|| self.crs.as_ref().and_then(CrsRef::srid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srid_prefers_native() {
        let info = AttributeInfo::geometry(Some(CrsRef::epsg(4326))).with_native_srid(900913);
        assert_eq!(info.srid(), Some(900913));
    }

    #[test]
    fn test_srid_from_crs() {
        let info = AttributeInfo::geometry(Some(CrsRef::epsg(3857)));
        assert_eq!(info.srid(), Some(3857));
        assert_eq!(AttributeInfo::new(AttributeKind::Int).srid(), None);
    }
}
