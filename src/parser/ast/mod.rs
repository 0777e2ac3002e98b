pub mod literals;
pub use literals::*;

pub mod operators;
pub use operators::*;

pub mod function;
pub use function::*;

pub mod expression;
pub use expression::*;

pub mod predicate;
pub use predicate::*;

pub mod args_parser;
pub use args_parser::*;

pub mod property_parser;
pub use property_parser::*;

pub mod builders;
