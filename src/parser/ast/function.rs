use serde::{Deserialize, Serialize};

use crate::parser::ast::Expression;

/// Generic `name(args)` call. Spatial and temporal operator names never
/// reach this node, they parse to predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub args: Vec<Expression>,
}

impl Function {
    pub fn new(name: &str, args: Vec<Expression>) -> Self {
        Self { name: name.to_string(), args }
    }
}
