use crate::geometry::{Coord, Geometry};

/// Well-known-text rendering.
///
/// `Geometry::Envelope` is written with the CQL `ENVELOPE(minx, maxx, maxy, miny)`
/// syntax; use [`Geometry::to_standard`] first when the consumer only speaks
/// OGC WKT.
pub struct WktWriter;

impl WktWriter {
    pub fn write(geometry: &Geometry) -> String {
        let mut out = String::new();
        Self::write_into(geometry, &mut out);
        out
    }

    fn write_into(geometry: &Geometry, out: &mut String) {
        out.push_str(geometry.geometry_type());
        if geometry.is_empty() {
            out.push_str(" EMPTY");
            return;
        }
        out.push(' ');

        match geometry {
            Geometry::Point(Some(c)) => {
                out.push('(');
                Self::coord(c, out);
                out.push(')');
            }
            Geometry::Point(None) => {}
            Geometry::LineString(coords) => Self::coords(coords, out),
            Geometry::Polygon(rings) => Self::rings(rings, out),
            Geometry::MultiPoint(points) => {
                out.push('(');
                for (i, c) in points.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push('(');
                    Self::coord(c, out);
                    out.push(')');
                }
                out.push(')');
            }
            Geometry::MultiLineString(lines) => Self::rings(lines, out),
            Geometry::MultiPolygon(polygons) => {
                out.push('(');
                for (i, p) in polygons.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    Self::rings(p, out);
                }
                out.push(')');
            }
            Geometry::GeometryCollection(members) => {
                out.push('(');
                for (i, g) in members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    Self::write_into(g, out);
                }
                out.push(')');
            }
            Geometry::Envelope(Some(e)) => {
                out.push_str(&format!("({}, {}, {}, {})", e.min_x, e.max_x, e.max_y, e.min_y));
            }
            Geometry::Envelope(None) => {}
        }
    }

    fn coord(c: &Coord, out: &mut String) {
        out.push_str(&format!("{} {}", c.x, c.y));
    }

    fn coords(coords: &[Coord], out: &mut String) {
        out.push('(');
        for (i, c) in coords.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            Self::coord(c, out);
        }
        out.push(')');
    }

    fn rings(rings: &[Vec<Coord>], out: &mut String) {
        out.push('(');
        for (i, r) in rings.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            Self::coords(r, out);
        }
        out.push(')');
    }
}
