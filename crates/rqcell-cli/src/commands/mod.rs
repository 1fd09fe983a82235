//! Command implementations
//!
//! Each command exposes an `execute` function taking its parsed arguments
//! (and the global `--config` path where it needs configuration).

pub mod config;
pub mod key;
pub mod query;
pub mod transform;
pub(crate) mod utils;

pub use config::execute as config_execute;
pub use key::execute as key_execute;
pub use query::execute as query_execute;
pub use transform::execute as transform_execute;
