use std::fmt::{self, Display};

use crate::parser::ast::Value;

/// Compiled `WHERE` clause body and the values bound to its placeholders,
/// in placeholder order. `params` is empty unless compiled in prepared mode.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlFragment {
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }
}

impl Display for SqlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}
