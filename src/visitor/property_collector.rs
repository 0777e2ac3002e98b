use std::{borrow::Cow, convert::Infallible};

use indexmap::IndexSet;

use crate::{
    parser::ast::{Expression, Predicate},
    visitor::{apply, walk_expression, walk_predicate, FilterVisitor},
};

/// Pseudo-property reported for identifier filters.
pub const FEATURE_ID_PROPERTY: &str = "@id";

/// Gathers every attribute path a filter depends on, in first-seen order.
#[derive(Debug, Default)]
pub struct PropertyCollector {
    properties: IndexSet<String>,
}

impl PropertyCollector {
    pub fn into_inner(self) -> IndexSet<String> {
        self.properties
    }
}

impl FilterVisitor for PropertyCollector {
    type Error = Infallible;

    fn visit_predicate<'a>(&mut self, predicate: &'a Predicate) -> Result<Cow<'a, Predicate>, Infallible> {
        if let Predicate::ResourceId(_) = predicate {
            self.properties.insert(FEATURE_ID_PROPERTY.to_string());
        }
        walk_predicate(self, predicate)
    }

    fn visit_expression<'a>(&mut self, expression: &'a Expression) -> Result<Cow<'a, Expression>, Infallible> {
        if let Expression::Property(path) = expression {
            if !path.is_empty() {
                self.properties.insert(path.clone());
            }
        }
        walk_expression(self, expression)
    }
}

pub fn collect_properties(predicate: &Predicate) -> IndexSet<String> {
    let mut collector = PropertyCollector::default();
    let _ = apply(&mut collector, predicate);
    collector.into_inner()
}
