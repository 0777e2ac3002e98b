use std::{fmt::{self, Display}, fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::{AttributeInfo, AttributeResolver};

/// Attribute-type schema of a feature type.
///
/// The `fields` map keeps declaration order; the first geometry attribute is
/// the default geometry unless `default_geometry` names another one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub name: String,
    /// Map of attribute name -> attribute metadata
    #[serde(default)]
    pub fields: IndexMap<String, AttributeInfo>,
    #[serde(default)]
    pub default_geometry: Option<String>,
    /// Column holding feature identifiers, used by identifier filters.
    #[serde(default)]
    pub fid_column: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    Io(String),
    Json(String),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Io(msg) => write!(f, "SchemaError: cannot read schema: {}", msg),
            SchemaError::Json(msg) => write!(f, "SchemaError: invalid schema document: {}", msg),
        }
    }
}

impl std::error::Error for SchemaError {}

impl FeatureSchema {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), ..Default::default() }
    }

    pub fn with_attribute(mut self, name: &str, info: AttributeInfo) -> Self {
        self.fields.insert(name.to_string(), info);
        self
    }

    pub fn with_default_geometry(mut self, name: &str) -> Self {
        self.default_geometry = Some(name.to_string());
        self
    }

    pub fn with_fid_column(mut self, name: &str) -> Self {
        self.fid_column = Some(name.to_string());
        self
    }

    /// Return the `AttributeInfo` for an attribute name if present.
    pub fn get(&self, name: &str) -> Option<&AttributeInfo> {
        self.fields.get(name)
    }

    /// Name of the default geometry attribute.
    pub fn default_geometry_name(&self) -> Option<&str> {
        if let Some(name) = &self.default_geometry {
            return Some(name.as_str());
        }
        self.fields
            .iter()
            .find(|(_, info)| info.kind.is_geometry())
            .map(|(name, _)| name.as_str())
    }

    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(text).map_err(|e| SchemaError::Json(e.to_string()))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| SchemaError::Io(e.to_string()))?;
        Self::from_json(&text)
    }
}

impl AttributeResolver for FeatureSchema {
    fn resolve(&self, path: &str) -> Option<AttributeInfo> {
        if path.is_empty() {
            return self.default_geometry_name().and_then(|name| self.get(name)).cloned();
        }

        if let Some(info) = self.get(path) {
            return Some(info.clone());
        }

        // namespace qualified names, e.g. `gml:the_geom`
        let (_, local) = path.rsplit_once(':')?;
        self.get(local).cloned()
    }

    fn fid_column(&self) -> Option<String> {
        self.fid_column.clone()
    }

    fn default_geometry(&self) -> Option<String> {
        self.default_geometry_name().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use crate::{geometry::CrsRef, schema::{AttributeInfo, AttributeKind, AttributeResolver, FeatureSchema}};

    fn roads() -> FeatureSchema {
        FeatureSchema::new("roads")
            .with_attribute("name", AttributeInfo::new(AttributeKind::String))
            .with_attribute("lanes", AttributeInfo::new(AttributeKind::Int))
            .with_attribute("geom", AttributeInfo::geometry(Some(CrsRef::epsg(4326))))
    }

    #[test]
    fn test_resolve_default_geometry() {
        let schema = roads();
        let info = schema.resolve("").expect("default geometry");
        assert_eq!(info.kind, AttributeKind::Geometry);
        assert_eq!(schema.default_geometry_name(), Some("geom"));
    }

    #[test]
    fn test_resolve_namespaced() {
        let schema = roads();
        assert_eq!(schema.resolve("topp:lanes").map(|i| i.kind), Some(AttributeKind::Int));
        assert!(schema.resolve("topp:missing").is_none());
        assert!(schema.resolve("missing").is_none());
    }

    #[test]
    fn test_from_json() {
        let doc = json!({
            "name": "parcels",
            "fields": {
                "owner": { "kind": "String" },
                "shape": { "kind": "Geometry", "crs": { "authority": "EPSG", "code": "3857", "name": null }, "native_srid": 3857 }
            },
            "fid_column": "gid"
        });
        let schema = FeatureSchema::from_json(&doc.to_string()).expect("Failed to parse schema");
        assert_eq!(schema.fid_column(), Some("gid".to_string()));
        assert_eq!(schema.resolve("shape").and_then(|i| i.srid()), Some(3857));
        assert!(!schema.get("owner").expect("owner").nullable);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(FeatureSchema::from_json("{ \"fields\": 3 }").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let schema = roads();
        write!(file, "{}", serde_json::to_string(&schema).expect("Failed to serialize")).expect("Failed to write");

        let loaded = FeatureSchema::load_from_file(file.path()).expect("Failed to load schema");
        assert_eq!(loaded, schema);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = FeatureSchema::load_from_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().starts_with("SchemaError: cannot read schema"));
    }
}
