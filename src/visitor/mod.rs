pub mod filter_visitor;
pub use filter_visitor::*;

pub mod visitor_error;
pub use visitor_error::*;

pub mod literal_resolver;
pub use literal_resolver::*;

pub mod fid_validator;
pub use fid_validator::*;

pub mod simplifier;
pub use simplifier::*;

pub mod fill_crs;
pub use fill_crs::*;

pub mod crs_adaptor;
pub use crs_adaptor::*;

pub mod spatial_validity;
pub use spatial_validity::*;

pub mod property_collector;
pub use property_collector::*;
