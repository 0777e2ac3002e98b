use serde::Deserialize;

/// Knobs of the SQL compiler.
///
/// - `loose_bbox` turns every `BBOX` into a bounding-box overlap test only.
/// - `default_srid` is embedded in geometry literals when the attribute has
///   no native SRID.
/// - `fid_column` overrides the identifier column reported by the schema.
/// - `prepared` emits `?` placeholders and collects the literal values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub loose_bbox: bool,
    pub default_srid: Option<i64>,
    pub fid_column: Option<String>,
    pub prepared: bool,
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: a config with loose bbox enabled.
    pub fn loose() -> Self {
        Self { loose_bbox: true, ..Self::default() }
    }

    /// Convenience: a config that binds literals as parameters.
    pub fn prepared() -> Self {
        Self { prepared: true, ..Self::default() }
    }

    pub fn with_default_srid(mut self, srid: i64) -> Self {
        self.default_srid = Some(srid);
        self
    }

    pub fn with_fid_column(mut self, column: &str) -> Self {
        self.fid_column = Some(column.to_string());
        self
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::sql::CompilerConfig;

    #[test]
    fn test_from_json_partial() {
        let doc = json!({ "loose_bbox": true, "default_srid": 4326 });
        let config = CompilerConfig::from_json(&doc.to_string()).expect("Failed to load config");
        assert_eq!(config, CompilerConfig::loose().with_default_srid(4326));
        assert!(!config.prepared);
        assert!(config.fid_column.is_none());
    }

    #[test]
    fn test_from_json_rejects_wrong_types() {
        assert!(CompilerConfig::from_json(r#"{ "loose_bbox": "yes" }"#).is_err());
    }
}
