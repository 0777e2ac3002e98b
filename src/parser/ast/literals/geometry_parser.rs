use crate::{
    geometry::{Coord, CrsRef, Envelope, Geometry, GeometryValue},
    parser::{ast::NumberParser, CqlParser, ParseError, WordComparer},
};

/// WKT keywords recognised in geometry literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WktKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    Envelope,
}

impl WktKind {
    pub const ALL: [WktKind; 8] = [
        WktKind::Point,
        WktKind::LineString,
        WktKind::Polygon,
        WktKind::MultiPoint,
        WktKind::MultiLineString,
        WktKind::MultiPolygon,
        WktKind::GeometryCollection,
        WktKind::Envelope,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            WktKind::Point => "POINT",
            WktKind::LineString => "LINESTRING",
            WktKind::Polygon => "POLYGON",
            WktKind::MultiPoint => "MULTIPOINT",
            WktKind::MultiLineString => "MULTILINESTRING",
            WktKind::MultiPolygon => "MULTIPOLYGON",
            WktKind::GeometryCollection => "GEOMETRYCOLLECTION",
            WktKind::Envelope => "ENVELOPE",
        }
    }

    pub fn empty(&self) -> Geometry {
        match self {
            WktKind::Point => Geometry::Point(None),
            WktKind::LineString => Geometry::LineString(vec![]),
            WktKind::Polygon => Geometry::Polygon(vec![]),
            WktKind::MultiPoint => Geometry::MultiPoint(vec![]),
            WktKind::MultiLineString => Geometry::MultiLineString(vec![]),
            WktKind::MultiPolygon => Geometry::MultiPolygon(vec![]),
            WktKind::GeometryCollection => Geometry::GeometryCollection(vec![]),
            WktKind::Envelope => Geometry::Envelope(None),
        }
    }
}

pub struct GeometryParser;

impl GeometryParser {
    /// A WKT keyword followed by `(` or `EMPTY`, optionally behind an
    /// `SRID=n;` prefix. A bare `point` is left to the property parser.
    pub fn is_geometry(parser: &CqlParser) -> bool {
        if Self::has_srid_prefix(parser) {
            return true;
        }

        let Some(length) = Self::keyword_length(parser) else {
            return false;
        };

        let mut ahead = length;
        while WordComparer::is_block_delimiter(parser.peek(ahead)) {
            ahead += 1;
        }
        if parser.peek(ahead) == '(' {
            return true;
        }

        let empty: String = (0..5).map(|i| parser.peek(ahead + i).to_ascii_uppercase()).collect();
        let after = parser.peek(ahead + 5);
        empty == "EMPTY" && (after == '\0' || WordComparer::is_any_delimiter(after))
    }

    pub fn parse(parser: &mut CqlParser) -> Result<GeometryValue, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        let mut crs = None;
        if Self::has_srid_prefix(parser) {
            parser.jump(5);
            let start = parser.position;
            while parser.current().is_ascii_digit() {
                parser.next();
            }
            let srid: i64 = parser
                .text_from_pivot(start)
                .parse()
                .map_err(|_| ParseError::new("Invalid SRID", pivot, parser))?;
            if parser.current() != ';' {
                return ParseError::new("Expected ';' after SRID", pivot, parser).err();
            }
            parser.next();
            crs = Some(CrsRef::epsg(srid));
        }

        let geometry = Self::parse_geometry(parser)?;
        Ok(GeometryValue { geometry, crs })
    }

    pub fn parse_geometry(parser: &mut CqlParser) -> Result<Geometry, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        let comparers = parser.comparers;
        let Some(kind) = comparers
            .geometry
            .iter()
            .find_map(|(comparer, kind)| comparer.consume(parser).then_some(*kind))
        else {
            return ParseError::new("Invalid geometry", pivot, parser).err();
        };

        parser.next_non_whitespace();
        if comparers.empty.consume(parser) {
            return Ok(kind.empty());
        }

        let geometry = match kind {
            WktKind::Point => {
                parser.expect('(', "Expected '(' after POINT")?;
                let coord = Self::parse_coord(parser)?;
                parser.expect(')', "Expected ')'")?;
                Geometry::Point(Some(coord))
            }
            WktKind::LineString => Geometry::LineString(Self::parse_coords(parser)?),
            WktKind::Polygon => Geometry::Polygon(Self::parse_rings(parser)?),
            WktKind::MultiPoint => Geometry::MultiPoint(Self::parse_points(parser)?),
            WktKind::MultiLineString => Geometry::MultiLineString(Self::parse_rings(parser)?),
            WktKind::MultiPolygon => {
                let polygons = Self::parse_list(parser, Self::parse_rings)?;
                Geometry::MultiPolygon(polygons)
            }
            WktKind::GeometryCollection => {
                let members = Self::parse_list(parser, Self::parse_geometry)?;
                Geometry::GeometryCollection(members)
            }
            WktKind::Envelope => {
                parser.expect('(', "Expected '(' after ENVELOPE")?;
                let min_x = NumberParser::parse_f64(parser)?;
                parser.expect(',', "Expected ','")?;
                let max_x = NumberParser::parse_f64(parser)?;
                parser.expect(',', "Expected ','")?;
                let max_y = NumberParser::parse_f64(parser)?;
                parser.expect(',', "Expected ','")?;
                let min_y = NumberParser::parse_f64(parser)?;
                parser.expect(')', "Expected ')'")?;
                Geometry::Envelope(Some(Envelope::new(min_x, min_y, max_x, max_y)))
            }
        };

        Ok(geometry)
    }

    /// `x y`, a trailing z ordinate is accepted and dropped.
    fn parse_coord(parser: &mut CqlParser) -> Result<Coord, ParseError> {
        let x = NumberParser::parse_f64(parser)?;
        let y = NumberParser::parse_f64(parser)?;

        let pivot = parser.position;
        parser.next_non_whitespace();
        if NumberParser::is_number(parser) {
            NumberParser::parse_f64(parser)?;
        } else {
            parser.reset(pivot);
        }

        Ok(Coord::new(x, y))
    }

    fn parse_coords(parser: &mut CqlParser) -> Result<Vec<Coord>, ParseError> {
        Self::parse_list(parser, Self::parse_coord)
    }

    fn parse_rings(parser: &mut CqlParser) -> Result<Vec<Vec<Coord>>, ParseError> {
        Self::parse_list(parser, Self::parse_coords)
    }

    /// Accepts both `MULTIPOINT (1 2, 3 4)` and `MULTIPOINT ((1 2), (3 4))`.
    fn parse_points(parser: &mut CqlParser) -> Result<Vec<Coord>, ParseError> {
        Self::parse_list(parser, |parser| {
            if parser.accept('(') {
                let coord = Self::parse_coord(parser)?;
                parser.expect(')', "Expected ')'")?;
                return Ok(coord);
            }
            Self::parse_coord(parser)
        })
    }

    fn parse_list<T>(
        parser: &mut CqlParser,
        item: impl Fn(&mut CqlParser) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        parser.expect('(', "Expected '('")?;
        let mut items = vec![item(parser)?];
        while parser.accept(',') {
            items.push(item(parser)?);
        }
        parser.expect(')', "Expected ')'")?;
        Ok(items)
    }

    fn has_srid_prefix(parser: &CqlParser) -> bool {
        let prefix: String = (0..5).map(|i| parser.peek(i).to_ascii_uppercase()).collect();
        prefix == "SRID=" && parser.peek(5).is_ascii_digit()
    }

    fn keyword_length(parser: &CqlParser) -> Option<usize> {
        parser.comparers.geometry.iter().find_map(|(comparer, _)| comparer.matches(parser))
    }
}
