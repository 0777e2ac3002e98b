use std::borrow::Cow;

use crate::{
    parser::ast::{Expression, Predicate},
    schema::AttributeResolver,
    visitor::{walk_predicate, FilterVisitor, ValidationFailure},
};

/// Checks that spatial predicates target geometry attributes. The empty
/// property, the default geometry, is always accepted. Never rewrites.
pub struct SpatialValidity<'s> {
    schema: &'s dyn AttributeResolver,
}

impl<'s> SpatialValidity<'s> {
    pub fn new(schema: &'s dyn AttributeResolver) -> Self {
        Self { schema }
    }

    pub fn is_valid(&self, predicate: &Predicate) -> bool {
        self.ensure_valid(predicate).is_ok()
    }

    /// Stops at the first offending predicate.
    pub fn ensure_valid(&self, predicate: &Predicate) -> Result<(), ValidationFailure> {
        let mut visitor = SpatialValidityVisitor { schema: self.schema };
        visitor.visit_predicate(predicate).map(|_| ())
    }
}

struct SpatialValidityVisitor<'s> {
    schema: &'s dyn AttributeResolver,
}

impl SpatialValidityVisitor<'_> {
    fn check(&self, predicate: &Predicate, property: &Expression) -> Result<(), ValidationFailure> {
        let valid = match property {
            Expression::Property(path) if path.is_empty() => true,
            Expression::Property(path) => self.schema.resolve(path).is_some_and(|info| info.kind.is_geometry()),
            _ => false,
        };

        if valid {
            return Ok(());
        }
        Err(ValidationFailure { property: property.to_string(), predicate: predicate.to_string() })
    }
}

impl FilterVisitor for SpatialValidityVisitor<'_> {
    type Error = ValidationFailure;

    fn visit_predicate<'a>(&mut self, predicate: &'a Predicate) -> Result<Cow<'a, Predicate>, ValidationFailure> {
        match predicate {
            Predicate::Spatial(spatial) => self.check(predicate, &spatial.property)?,
            Predicate::Distance(distance) => self.check(predicate, &distance.property)?,
            _ => return walk_predicate(self, predicate),
        }
        Ok(Cow::Borrowed(predicate))
    }
}
