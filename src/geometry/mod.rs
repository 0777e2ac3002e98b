pub mod geometry;
pub use geometry::*;

pub mod crs;
pub use crs::*;

pub mod wkt;
pub use wkt::*;

pub mod transform;
pub use transform::*;
