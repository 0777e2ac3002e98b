pub mod value;
pub use value::*;

pub mod string_parser;
pub use string_parser::StringParser;

pub mod number_parser;
pub use number_parser::NumberParser;

pub mod bool_parser;
pub use bool_parser::BoolParser;

pub mod temporal_parser;
pub use temporal_parser::TemporalParser;

pub mod geometry_parser;
pub use geometry_parser::{GeometryParser, WktKind};
