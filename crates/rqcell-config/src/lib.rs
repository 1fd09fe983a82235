//! Configuration for rqcell
//!
//! `rqcell.toml` (or the `rqcell` field of `package.json`):
//!
//! ```toml
//! [transform]
//! import_source = "@rwjsexperiments/react"
//! wrapper = "withRQCell"
//! extensions = ["js", "jsx", "ts", "tsx", "mjs"]
//!
//! [client]
//! uri = "/graphql"
//! stale_time_ms = 0
//! cache_time_ms = 300000
//! ```

mod discovery;
mod error;
mod settings;
mod validation;

pub use discovery::{
    CONFIG_FILE, ConfigDiscovery, ConfigSource, ENV_PREFIX, PACKAGE_JSON_FIELD, load_layered,
};
pub use error::{ConfigError, Result};
pub use settings::{
    ClientSettings, DEFAULT_CACHE_TIME_MS, DEFAULT_IMPORT_SOURCE, DEFAULT_URI, DEFAULT_WRAPPER, RqCellConfig,
    TransformSettings,
};
