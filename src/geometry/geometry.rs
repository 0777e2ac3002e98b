use serde::{Deserialize, Serialize};

use crate::geometry::CrsRef;

/// A single 2D position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis aligned extent, always stored as min/max pairs regardless of the
/// order the literal was written in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Smallest envelope covering every coordinate, `None` when empty.
    pub fn covering(coords: impl IntoIterator<Item = Coord>) -> Option<Self> {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut env = Envelope { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };
        for c in iter {
            env.min_x = env.min_x.min(c.x);
            env.min_y = env.min_y.min(c.y);
            env.max_x = env.max_x.max(c.x);
            env.max_y = env.max_y.max(c.y);
        }
        Some(env)
    }

    /// Closed exterior ring, counter-clockwise from the lower left corner.
    pub fn to_ring(&self) -> Vec<Coord> {
        vec![
            Coord::new(self.min_x, self.min_y),
            Coord::new(self.max_x, self.min_y),
            Coord::new(self.max_x, self.max_y),
            Coord::new(self.min_x, self.max_y),
            Coord::new(self.min_x, self.min_y),
        ]
    }
}

/// Geometry shapes accepted as literals. Every kind has an empty form:
/// `Point(None)`, an empty coordinate list, or `Envelope(None)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Option<Coord>),
    LineString(Vec<Coord>),
    Polygon(Vec<Vec<Coord>>),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
    GeometryCollection(Vec<Geometry>),
    Envelope(Option<Envelope>),
}

impl Geometry {
    pub fn geometry_type(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "POINT",
            Geometry::LineString(_) => "LINESTRING",
            Geometry::Polygon(_) => "POLYGON",
            Geometry::MultiPoint(_) => "MULTIPOINT",
            Geometry::MultiLineString(_) => "MULTILINESTRING",
            Geometry::MultiPolygon(_) => "MULTIPOLYGON",
            Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
            Geometry::Envelope(_) => "ENVELOPE",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(p) => p.is_none(),
            Geometry::LineString(c) | Geometry::MultiPoint(c) => c.is_empty(),
            Geometry::Polygon(r) | Geometry::MultiLineString(r) => r.is_empty(),
            Geometry::MultiPolygon(p) => p.is_empty(),
            Geometry::GeometryCollection(g) => g.is_empty(),
            Geometry::Envelope(e) => e.is_none(),
        }
    }

    /// Every coordinate in document order.
    pub fn coords(&self) -> Vec<Coord> {
        let mut out = vec![];
        self.collect_coords(&mut out);
        out
    }

    fn collect_coords(&self, out: &mut Vec<Coord>) {
        match self {
            Geometry::Point(p) => out.extend(p.iter().copied()),
            Geometry::LineString(c) | Geometry::MultiPoint(c) => out.extend(c.iter().copied()),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                rings.iter().for_each(|r| out.extend(r.iter().copied()))
            }
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .flat_map(|p| p.iter())
                .for_each(|r| out.extend(r.iter().copied())),
            Geometry::GeometryCollection(members) => members.iter().for_each(|g| g.collect_coords(out)),
            Geometry::Envelope(e) => out.extend(e.iter().flat_map(|e| e.to_ring().into_iter().take(4))),
        }
    }

    pub fn envelope(&self) -> Option<Envelope> {
        Envelope::covering(self.coords())
    }

    /// Rebuilds the geometry with every coordinate passed through `f`.
    /// Envelopes are re-derived from their transformed corners.
    pub fn map_coords(&self, f: &dyn Fn(Coord) -> Coord) -> Geometry {
        let line = |c: &Vec<Coord>| c.iter().map(|c| f(*c)).collect::<Vec<_>>();
        let rings = |r: &Vec<Vec<Coord>>| r.iter().map(line).collect::<Vec<_>>();
        match self {
            Geometry::Point(p) => Geometry::Point(p.map(f)),
            Geometry::LineString(c) => Geometry::LineString(line(c)),
            Geometry::MultiPoint(c) => Geometry::MultiPoint(line(c)),
            Geometry::Polygon(r) => Geometry::Polygon(rings(r)),
            Geometry::MultiLineString(r) => Geometry::MultiLineString(rings(r)),
            Geometry::MultiPolygon(p) => Geometry::MultiPolygon(p.iter().map(rings).collect()),
            Geometry::GeometryCollection(g) => {
                Geometry::GeometryCollection(g.iter().map(|g| g.map_coords(f)).collect())
            }
            Geometry::Envelope(e) => Geometry::Envelope(
                e.and_then(|e| Envelope::covering(e.to_ring().into_iter().take(4).map(f))),
            ),
        }
    }

    /// The same shape with envelopes expanded into polygons, the form SQL
    /// backends understand.
    pub fn to_standard(&self) -> Geometry {
        match self {
            Geometry::Envelope(Some(e)) => Geometry::Polygon(vec![e.to_ring()]),
            Geometry::Envelope(None) => Geometry::Polygon(vec![]),
            Geometry::GeometryCollection(g) => Geometry::GeometryCollection(g.iter().map(Geometry::to_standard).collect()),
            other => other.clone(),
        }
    }
}

/// A geometry literal together with the reference system it is expressed in.
/// `crs == None` means the literal is unanchored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryValue {
    pub geometry: Geometry,
    pub crs: Option<CrsRef>,
}

impl GeometryValue {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry, crs: None }
    }

    pub fn with_crs(geometry: Geometry, crs: CrsRef) -> Self {
        Self { geometry, crs: Some(crs) }
    }

    pub fn is_anchored(&self) -> bool {
        self.crs.is_some()
    }
}
