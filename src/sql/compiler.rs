use tracing::{debug, trace};

use crate::{
    geometry::WktWriter,
    parser::ast::{
        ArithmeticOp, Expression, Like, LikeToken, Predicate, ResourceId, SpatialBinary, SpatialDistance, SpatialOp,
        TemporalBinary, TemporalOp, Value,
    },
    schema::AttributeResolver,
    sql::{CompileContext, CompileError, CompilerConfig, SqlDialect, SqlFragment},
};

/// Compiles filters into SQL `WHERE` fragments for one dialect.
pub struct SqlCompiler<D: SqlDialect> {
    dialect: D,
    config: CompilerConfig,
}

impl<D: SqlDialect> SqlCompiler<D> {
    pub fn new(dialect: D) -> Self {
        Self { dialect, config: CompilerConfig::default() }
    }

    pub fn with_config(dialect: D, config: CompilerConfig) -> Self {
        Self { dialect, config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn compile(&self, predicate: &Predicate, schema: &dyn AttributeResolver) -> Result<SqlFragment, CompileError> {
        let mut ctx = CompileContext::new(schema, &self.config);
        compile(predicate, &self.dialect, &mut ctx)
    }
}

/// Compiles `predicate` with the collaborators in `ctx`. Parameters bound
/// while compiling are drained from the context into the fragment.
pub fn compile(
    predicate: &Predicate,
    dialect: &dyn SqlDialect,
    ctx: &mut CompileContext,
) -> Result<SqlFragment, CompileError> {
    debug!(dialect = dialect.name(), filter = %predicate, "compiling filter");
    let mut encoder = FilterEncoder { dialect, ctx: &mut *ctx };
    let sql = encoder.predicate(predicate)?;
    debug!(sql = %sql, "compiled filter");
    Ok(SqlFragment::new(sql, ctx.take_params()))
}

struct FilterEncoder<'c, 's> {
    dialect: &'c dyn SqlDialect,
    ctx: &'c mut CompileContext<'s>,
}

impl FilterEncoder<'_, '_> {
    fn predicate(&mut self, predicate: &Predicate) -> Result<String, CompileError> {
        match predicate {
            Predicate::Include => Ok("1 = 1".to_string()),
            Predicate::Exclude => Ok("0 = 1".to_string()),
            Predicate::And(items) => self.junction(items, " AND ", "1 = 1"),
            Predicate::Or(items) if items.len() > 1 && items.iter().all(|p| matches!(p, Predicate::ResourceId(_))) => {
                self.resource_ids(items)
            }
            Predicate::Or(items) => self.junction(items, " OR ", "0 = 1"),
            Predicate::Not(inner) => match inner.as_ref() {
                Predicate::IsNull(expr) | Predicate::IsNil(expr) => Ok(format!("{} IS NOT NULL", self.expression(expr)?)),
                other => Ok(format!("NOT ({})", self.predicate(other)?)),
            },
            Predicate::Comparison(cmp) => {
                let mut left = self.expression(&cmp.left)?;
                let mut right = self.expression(&cmp.right)?;
                if !cmp.match_case {
                    left = self.dialect.upper(&left);
                    right = self.dialect.upper(&right);
                }
                Ok(format!("{} {} {}", left, cmp.op, right))
            }
            Predicate::Between(between) => Ok(format!(
                "{} BETWEEN {} AND {}",
                self.expression(&between.expr)?,
                self.expression(&between.lower)?,
                self.expression(&between.upper)?
            )),
            Predicate::Like(like) => self.like(like),
            Predicate::IsNull(expr) | Predicate::IsNil(expr) => Ok(format!("{} IS NULL", self.expression(expr)?)),
            Predicate::ResourceId(rid) => {
                let column = self.dialect.quote_name(&self.ctx.fid_column()?);
                Ok(format!("{} = {}", column, self.resource_id(rid)?))
            }
            Predicate::Spatial(spatial) => self.spatial(spatial),
            Predicate::Distance(distance) => self.distance(distance),
            Predicate::Temporal(temporal) => self.temporal(temporal),
        }
    }

    fn junction(&mut self, items: &[Predicate], keyword: &str, empty: &str) -> Result<String, CompileError> {
        if items.is_empty() {
            return Ok(empty.to_string());
        }

        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            let sql = self.predicate(item)?;
            match item {
                Predicate::And(_) | Predicate::Or(_) if items.len() > 1 => parts.push(format!("({})", sql)),
                _ => parts.push(sql),
            }
        }
        Ok(parts.join(keyword))
    }

    fn resource_ids(&mut self, items: &[Predicate]) -> Result<String, CompileError> {
        let column = self.dialect.quote_name(&self.ctx.fid_column()?);
        let mut ids = vec![];
        for item in items {
            if let Predicate::ResourceId(rid) = item {
                ids.push(self.resource_id(rid)?);
            }
        }
        Ok(format!("{} IN ({})", column, ids.join(", ")))
    }

    fn resource_id(&mut self, rid: &ResourceId) -> Result<String, CompileError> {
        if let Some(version) = &rid.version {
            trace!(id = %rid.id, version = %version, "feature version ignored");
        }
        self.ctx.bind(&Value::Text(rid.id.clone()))
    }

    fn like(&mut self, like: &Like) -> Result<String, CompileError> {
        let mut pattern = String::new();
        for token in like.tokens() {
            match token {
                LikeToken::Wildcard => pattern.push('%'),
                LikeToken::SingleChar => pattern.push('_'),
                LikeToken::Char(ch) => {
                    if matches!(ch, '%' | '_' | '\\') {
                        pattern.push('\\');
                    }
                    pattern.push(ch);
                }
            }
        }

        let expr = self.expression(&like.expr)?;
        let pattern = self.ctx.bind(&Value::Text(pattern))?;
        Ok(self.dialect.like(&expr, &pattern, like.match_case))
    }

    fn spatial(&mut self, spatial: &SpatialBinary) -> Result<String, CompileError> {
        let property = self.expression(&spatial.property)?;
        let geometry = self.geometry_operand(&spatial.geometry, spatial.property.as_property())?;
        let loose = spatial.op == SpatialOp::BBox && (spatial.loose || self.ctx.config.loose_bbox);
        self.dialect.spatial(spatial.op, &property, &geometry, spatial.swapped, loose)
    }

    fn distance(&mut self, distance: &SpatialDistance) -> Result<String, CompileError> {
        let property = self.expression(&distance.property)?;
        let geometry = self.geometry_operand(&distance.geometry, distance.property.as_property())?;
        self.dialect.distance(distance.op, &property, &geometry, distance.distance, distance.swapped)
    }

    /// Geometry literals are written as a construction call carrying the SRID
    /// of the attribute they are compared with.
    fn geometry_operand(&mut self, expr: &Expression, path: Option<&str>) -> Result<String, CompileError> {
        match expr {
            Expression::Literal(Value::Geometry(value)) => {
                let Some(srid) = self.ctx.srid_for(path, value) else {
                    return Err(CompileError::InvalidLiteral(format!(
                        "geometry {} without an SRID",
                        WktWriter::write(&value.geometry)
                    )));
                };
                let wkt = WktWriter::write(&value.geometry.to_standard());
                let wkt = self.ctx.bind(&Value::Text(wkt))?;
                self.dialect.geometry_literal(&wkt, srid)
            }
            other => self.expression(other),
        }
    }

    fn temporal(&mut self, temporal: &TemporalBinary) -> Result<String, CompileError> {
        let property = self.expression(&temporal.property)?;
        let unsupported = || CompileError::Unsupported(format!("{} with operand {}", temporal.op.keyword(), temporal.operand));

        match temporal.operand.as_literal() {
            Some(instant @ Value::Timestamp(_)) => {
                let op = match temporal.op {
                    TemporalOp::After => ">",
                    TemporalOp::Before => "<",
                    TemporalOp::TEquals | TemporalOp::BegunBy | TemporalOp::EndedBy | TemporalOp::TContains => "=",
                    _ => return Err(unsupported()),
                };
                Ok(format!("{} {} {}", property, op, self.ctx.bind(instant)?))
            }
            Some(Value::Period { begin, end }) => match temporal.op {
                TemporalOp::After => Ok(format!("{} > {}", property, self.ctx.bind(&Value::Timestamp(*end))?)),
                TemporalOp::Before => Ok(format!("{} < {}", property, self.ctx.bind(&Value::Timestamp(*begin))?)),
                TemporalOp::Begins => Ok(format!("{} = {}", property, self.ctx.bind(&Value::Timestamp(*begin))?)),
                TemporalOp::Ends => Ok(format!("{} = {}", property, self.ctx.bind(&Value::Timestamp(*end))?)),
                TemporalOp::During => {
                    let begin = self.ctx.bind(&Value::Timestamp(*begin))?;
                    let end = self.ctx.bind(&Value::Timestamp(*end))?;
                    Ok(format!("{} > {} AND {} < {}", property, begin, property, end))
                }
                _ => Err(unsupported()),
            },
            _ => Err(unsupported()),
        }
    }

    fn expression(&mut self, expression: &Expression) -> Result<String, CompileError> {
        match expression {
            Expression::Property(path) => Ok(self.dialect.quote_name(&self.ctx.column(path)?)),
            Expression::Literal(Value::Geometry(_)) => self.geometry_operand(expression, None),
            Expression::Literal(value) => self.ctx.bind(value),
            Expression::Arithmetic { op, left, right } => {
                let left = self.operand(left)?;
                let right = self.operand(right)?;
                Ok(format!("{} {} {}", left, ArithmeticOp::symbol(op), right))
            }
            Expression::Function(fun) => {
                let args = fun.args.iter().map(|arg| self.expression(arg)).collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{}({})", fun.name, args.join(", ")))
            }
        }
    }

    fn operand(&mut self, expression: &Expression) -> Result<String, CompileError> {
        let sql = self.expression(expression)?;
        match expression {
            Expression::Arithmetic { .. } => Ok(format!("({})", sql)),
            _ => Ok(sql),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::{ast::{builders::*, Like, Predicate, Value}, parse_filter},
        schema::{AttributeInfo, AttributeKind, FeatureSchema},
        sql::{CompileError, CompilerConfig, GenericDialect, SqlCompiler},
    };

    fn schema() -> FeatureSchema {
        FeatureSchema::new("people")
            .with_attribute("name", AttributeInfo::new(AttributeKind::String))
            .with_attribute("age", AttributeInfo::new(AttributeKind::Int))
            .with_attribute("born", AttributeInfo::new(AttributeKind::Timestamp))
    }

    fn sql(text: &str) -> String {
        let filter = parse_filter(text).expect("Failed to parse");
        SqlCompiler::new(GenericDialect).compile(&filter, &schema()).expect("Failed to compile").sql
    }

    #[test]
    pub fn test_include_exclude() {
        assert_eq!(sql("INCLUDE"), "1 = 1");
        assert_eq!(sql("EXCLUDE"), "0 = 1");
        let compiler = SqlCompiler::new(GenericDialect);
        assert_eq!(compiler.compile(&and(vec![]), &schema()).expect("Failed to compile").sql, "1 = 1");
        assert_eq!(compiler.compile(&or(vec![]), &schema()).expect("Failed to compile").sql, "0 = 1");
    }

    #[test]
    pub fn test_nested_junctions_are_grouped() {
        assert_eq!(sql("age > 3 AND (name = 'a' OR name = 'b')"), "age > 3 AND (name = 'a' OR name = 'b')");
        assert_eq!(sql("NOT (age <> 3)"), "NOT (age <> 3)");
    }

    #[test]
    pub fn test_comparison_operators_and_arithmetic() {
        assert_eq!(sql("age >= 18"), "age >= 18");
        assert_eq!(sql("10 < age"), "10 < age");
        assert_eq!(sql("(age + 1) * 2 = 10.5"), "(age + 1) * 2 = 10.5");
        assert_eq!(sql("name = 'O\\'Brien'"), "name = 'O''Brien'");
        assert_eq!(sql("strlen(name) > 3"), "strlen(name) > 3");
    }

    #[test]
    pub fn test_between_and_null() {
        assert_eq!(sql("age BETWEEN 1 AND 10"), "age BETWEEN 1 AND 10");
        assert_eq!(sql("age NOT BETWEEN 1 AND 10"), "NOT (age BETWEEN 1 AND 10)");
        assert_eq!(sql("name IS NULL"), "name IS NULL");
        assert_eq!(sql("name IS NOT NULL"), "name IS NOT NULL");
        assert_eq!(sql("name IS NOT NIL"), "name IS NOT NULL");
    }

    #[test]
    pub fn test_like_translation() {
        assert_eq!(sql("name LIKE 'Jo%n_'"), "name LIKE 'Jo%n_' ESCAPE '\\'");
        assert_eq!(sql("name ILIKE 'jo%'"), "UPPER(name) LIKE UPPER('jo%') ESCAPE '\\'");
        let custom = Predicate::Like(Like::new(property("name"), "50!% *", true).with_markers('*', '.', '!'));
        let compiled = SqlCompiler::new(GenericDialect).compile(&custom, &schema()).expect("Failed to compile");
        assert_eq!(compiled.sql, "name LIKE '50\\% %' ESCAPE '\\'");
    }

    #[test]
    pub fn test_temporal_mapping() {
        assert_eq!(sql("born AFTER 2006-11-30T01:30:00Z"), "born > '2006-11-30T01:30:00Z'");
        assert_eq!(sql("born BEFORE 2006-11-30T01:30:00Z"), "born < '2006-11-30T01:30:00Z'");
        assert_eq!(sql("born TEQUALS 2006-11-30T01:30:00Z"), "born = '2006-11-30T01:30:00Z'");
        assert_eq!(
            sql("born DURING 2006-11-30T00:00:00Z/2006-12-31T00:00:00Z"),
            "born > '2006-11-30T00:00:00Z' AND born < '2006-12-31T00:00:00Z'"
        );
        assert_eq!(sql("born BEGINS 2006-11-30T00:00:00Z/P1D"), "born = '2006-11-30T00:00:00Z'");
        assert_eq!(sql("born ENDS 2006-11-30T00:00:00Z/P1D"), "born = '2006-12-01T00:00:00Z'");
    }

    #[test]
    pub fn test_temporal_unsupported() {
        let filter = parse_filter("born MEETS 2006-11-30T01:30:00Z").expect("Failed to parse");
        match SqlCompiler::new(GenericDialect).compile(&filter, &schema()) {
            Err(CompileError::Unsupported(msg)) => assert!(msg.starts_with("MEETS")),
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_resource_ids() {
        let filter = parse_filter("IN ('people.1', 'people.2@v3')").expect("Failed to parse");
        let compiler = SqlCompiler::with_config(GenericDialect, CompilerConfig::new().with_fid_column("fid"));
        let compiled = compiler.compile(&filter, &schema()).expect("Failed to compile");
        assert_eq!(compiled.sql, "fid IN ('people.1', 'people.2')");

        let single = SqlCompiler::new(GenericDialect)
            .compile(&resource_id("people.1"), &schema().with_fid_column("pk"))
            .expect("Failed to compile");
        assert_eq!(single.sql, "pk = 'people.1'");
    }

    #[test]
    pub fn test_resource_id_without_column() {
        match SqlCompiler::new(GenericDialect).compile(&resource_id("people.1"), &schema()) {
            Err(CompileError::MissingFidColumn) => {}
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_prepared_mode_binds_literals() {
        let filter = parse_filter("name = 'x' AND age BETWEEN 1 AND 10").expect("Failed to parse");
        let compiler = SqlCompiler::with_config(GenericDialect, CompilerConfig::prepared());
        let compiled = compiler.compile(&filter, &schema()).expect("Failed to compile");
        assert_eq!(compiled.sql, "name = ? AND age BETWEEN ? AND ?");
        assert_eq!(compiled.params, vec![Value::from("x"), Value::Integer(1), Value::Integer(10)]);
    }

    #[test]
    pub fn test_spatial_needs_a_spatial_dialect() {
        let filter = parse_filter("BBOX(geom, 0, 0, 1, 1)").expect("Failed to parse");
        assert!(SqlCompiler::new(GenericDialect).compile(&filter, &schema()).is_err());
    }
}
