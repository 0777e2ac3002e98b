pub mod attribute_kind;
pub use attribute_kind::*;

pub mod attribute_info;
pub use attribute_info::*;

pub mod feature_schema;
pub use feature_schema::*;

/// Read-only view of an attribute-type schema.
pub trait AttributeResolver {
    /// Given a property path, return what is known about the attribute.
    /// The empty path designates the default geometry.
    fn resolve(&self, path: &str) -> Option<AttributeInfo>;

    /// Column holding feature identifiers, if the backing store has one.
    fn fid_column(&self) -> Option<String> {
        None
    }

    /// Name of the attribute the empty path stands for.
    fn default_geometry(&self) -> Option<String> {
        None
    }
}
