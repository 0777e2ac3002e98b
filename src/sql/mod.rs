pub mod compiler_config;
pub use compiler_config::*;

pub mod compile_error;
pub use compile_error::*;

pub mod sql_fragment;
pub use sql_fragment::*;

pub mod compile_context;
pub use compile_context::*;

pub mod dialect;
pub use dialect::*;

pub mod postgis_dialect;
pub use postgis_dialect::*;

pub mod compiler;
pub use compiler::*;
