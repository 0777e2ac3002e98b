pub mod geometry;
pub use geometry::{CrsRef, CrsRegistry, Geometry, GeometryValue};

pub mod schema;
pub use schema::{AttributeInfo, AttributeKind, AttributeResolver, FeatureSchema};

pub mod parser;
pub use parser::{parse_expression, parse_filter, write_expression, write_filter, ParseError};

pub mod visitor;
pub use visitor::{collect_properties, simplify, CrsAdaptor, FilterVisitor, Simplifier, SpatialValidity};

pub mod sql;
pub use sql::{CompilerConfig, GenericDialect, PostgisDialect, SqlCompiler, SqlDialect, SqlFragment};

pub mod error;
pub use error::GeofilterError;
