use crate::{
    geometry::{CrsRef, GeometryValue},
    parser::ast::Value,
    schema::AttributeResolver,
    sql::{CompileError, CompilerConfig},
};

/// Per-compilation state: the collaborators the compiler reads from and the
/// parameters collected so far.
pub struct CompileContext<'s> {
    pub schema: &'s dyn AttributeResolver,
    pub config: &'s CompilerConfig,
    params: Vec<Value>,
}

impl<'s> CompileContext<'s> {
    pub fn new(schema: &'s dyn AttributeResolver, config: &'s CompilerConfig) -> Self {
        Self { schema, config, params: vec![] }
    }

    /// Column name of a property path. The empty path maps onto the default
    /// geometry and namespace prefixes are dropped.
    pub fn column(&self, path: &str) -> Result<String, CompileError> {
        if path.is_empty() {
            return self
                .schema
                .default_geometry()
                .ok_or_else(|| CompileError::Unsupported("default geometry reference without a default geometry".into()));
        }
        let local = path.rsplit_once(':').map_or(path, |(_, local)| local);
        Ok(local.to_string())
    }

    pub fn fid_column(&self) -> Result<String, CompileError> {
        self.config
            .fid_column
            .clone()
            .or_else(|| self.schema.fid_column())
            .ok_or(CompileError::MissingFidColumn)
    }

    /// SRID a geometry literal compared against `path` is emitted with: the
    /// attribute's native SRID, then the configured default, then the
    /// literal's own reference system.
    pub fn srid_for(&self, path: Option<&str>, literal: &GeometryValue) -> Option<i64> {
        path.and_then(|p| self.schema.resolve(p))
            .and_then(|info| info.srid())
            .or(self.config.default_srid)
            .or_else(|| literal.crs.as_ref().and_then(CrsRef::srid))
    }

    /// Renders a scalar literal inline, or as a placeholder in prepared mode.
    pub fn bind(&mut self, value: &Value) -> Result<String, CompileError> {
        let inline = Self::inline(value)?;
        if !self.config.prepared {
            return Ok(inline);
        }
        self.params.push(value.clone());
        Ok("?".to_string())
    }

    /// Drains the values bound so far.
    pub fn take_params(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.params)
    }

    fn inline(value: &Value) -> Result<String, CompileError> {
        match value {
            Value::Integer(i) => Ok(i.to_string()),
            Value::Float(n) => Ok(format!("{:?}", n.into_inner())),
            Value::Text(s) => Ok(Self::quote(s)),
            Value::Boolean(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Value::Timestamp(ts) => Ok(Self::quote(&Value::format_timestamp(ts))),
            Value::Duration(_) | Value::Period { .. } | Value::Geometry(_) => {
                Err(CompileError::InvalidLiteral(format!("{:?} outside a temporal or spatial operator", value)))
            }
        }
    }

    /// Standard SQL string literal, `'` doubled.
    pub fn quote(text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        geometry::{Coord, CrsRef, Geometry, GeometryValue},
        parser::ast::Value,
        schema::{AttributeInfo, AttributeKind, FeatureSchema},
        sql::{CompileContext, CompileError, CompilerConfig},
    };

    fn schema() -> FeatureSchema {
        FeatureSchema::new("roads")
            .with_attribute("name", AttributeInfo::new(AttributeKind::String))
            .with_attribute("geom", AttributeInfo::geometry(Some(CrsRef::epsg(4326))).with_native_srid(4269))
            .with_attribute("plain", AttributeInfo::geometry(None))
    }

    #[test]
    fn test_quote_doubles_single_quotes() {
        assert_eq!(CompileContext::quote("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn test_column_names() {
        let schema = schema();
        let config = CompilerConfig::new();
        let ctx = CompileContext::new(&schema, &config);
        assert_eq!(ctx.column("").expect("Failed to resolve"), "geom");
        assert_eq!(ctx.column("topp:name").expect("Failed to resolve"), "name");

        let empty = FeatureSchema::new("empty");
        let ctx = CompileContext::new(&empty, &config);
        assert!(matches!(ctx.column(""), Err(CompileError::Unsupported(_))));
    }

    #[test]
    fn test_srid_fallback_order() {
        let schema = schema();
        let literal = GeometryValue::with_crs(Geometry::Point(Some(Coord::new(0.0, 0.0))), CrsRef::epsg(3857));

        let config = CompilerConfig::new();
        let ctx = CompileContext::new(&schema, &config);
        assert_eq!(ctx.srid_for(Some("geom"), &literal), Some(4269));
        assert_eq!(ctx.srid_for(Some("plain"), &literal), Some(3857));

        let config = CompilerConfig::new().with_default_srid(900913);
        let ctx = CompileContext::new(&schema, &config);
        assert_eq!(ctx.srid_for(Some("plain"), &literal), Some(900913));
        assert_eq!(ctx.srid_for(None, &GeometryValue::new(Geometry::Point(None))), Some(900913));
    }

    #[test]
    fn test_bind_prepared_collects_params() {
        let schema = schema();
        let config = CompilerConfig::prepared();
        let mut ctx = CompileContext::new(&schema, &config);
        assert_eq!(ctx.bind(&Value::from("x")).expect("Failed to bind"), "?");
        assert_eq!(ctx.bind(&Value::from(3)).expect("Failed to bind"), "?");
        assert_eq!(ctx.take_params(), vec![Value::from("x"), Value::from(3)]);
    }

    #[test]
    fn test_bind_rejects_duration() {
        let schema = schema();
        let config = CompilerConfig::new();
        let mut ctx = CompileContext::new(&schema, &config);
        assert!(matches!(ctx.bind(&Value::Duration(1000)), Err(CompileError::InvalidLiteral(_))));
    }
}
