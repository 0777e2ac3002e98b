use std::fmt::Display;

use crate::{
    parser::ParseError,
    schema::SchemaError,
    sql::CompileError,
    visitor::{AdaptError, ValidationFailure},
};

/// Any failure along the text to SQL pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum GeofilterError {
    Parse(ParseError),
    Adapt(AdaptError),
    Validation(ValidationFailure),
    Compile(CompileError),
    Schema(SchemaError),
}

impl Display for GeofilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeofilterError::Parse(err) => write!(f, "{}", err),
            GeofilterError::Adapt(err) => write!(f, "{}", err),
            GeofilterError::Validation(err) => write!(f, "{}", err),
            GeofilterError::Compile(err) => write!(f, "{}", err),
            GeofilterError::Schema(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GeofilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeofilterError::Parse(err) => Some(err),
            GeofilterError::Adapt(err) => Some(err),
            GeofilterError::Validation(err) => Some(err),
            GeofilterError::Compile(err) => Some(err),
            GeofilterError::Schema(err) => Some(err),
        }
    }
}

impl From<ParseError> for GeofilterError {
    fn from(err: ParseError) -> Self {
        GeofilterError::Parse(err)
    }
}

impl From<AdaptError> for GeofilterError {
    fn from(err: AdaptError) -> Self {
        GeofilterError::Adapt(err)
    }
}

impl From<ValidationFailure> for GeofilterError {
    fn from(err: ValidationFailure) -> Self {
        GeofilterError::Validation(err)
    }
}

impl From<CompileError> for GeofilterError {
    fn from(err: CompileError) -> Self {
        GeofilterError::Compile(err)
    }
}

impl From<SchemaError> for GeofilterError {
    fn from(err: SchemaError) -> Self {
        GeofilterError::Schema(err)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::GeofilterError,
        geometry::transform::fixtures::ScalingRegistry,
        parser::parse_filter,
        schema::{AttributeInfo, AttributeKind, FeatureSchema},
        sql::{GenericDialect, SqlCompiler, SqlFragment},
        visitor::{CrsAdaptor, SpatialValidity},
    };

    fn pipeline(text: &str, schema: &FeatureSchema) -> Result<SqlFragment, GeofilterError> {
        let filter = parse_filter(text)?;
        SpatialValidity::new(schema).ensure_valid(&filter)?;
        let adapted = CrsAdaptor::new(schema, &ScalingRegistry).adapt(&filter)?;
        Ok(SqlCompiler::new(GenericDialect).compile(&adapted, schema)?)
    }

    fn schema() -> FeatureSchema {
        FeatureSchema::new("t").with_attribute("a", AttributeInfo::new(AttributeKind::Int))
    }

    #[test]
    fn test_pipeline_propagates_each_stage() {
        let schema = schema();
        assert_eq!(pipeline("a = 1", &schema).expect("Failed to compile").sql, "a = 1");
        assert!(matches!(pipeline("a = ", &schema), Err(GeofilterError::Parse(_))));
        assert!(matches!(pipeline("INTERSECTS(a, POINT(1 1))", &schema), Err(GeofilterError::Validation(_))));
        assert!(matches!(pipeline("IN ('t.1')", &schema), Err(GeofilterError::Compile(_))));
    }

    #[test]
    fn test_display_delegates() {
        let err = GeofilterError::from(crate::sql::CompileError::MissingFidColumn);
        assert_eq!(err.to_string(), "CompileError: identifier filter without a FID column");
    }
}
