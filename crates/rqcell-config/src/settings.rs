//! Configuration types and their defaults

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_IMPORT_SOURCE: &str = "@rwjsexperiments/react";
pub const DEFAULT_WRAPPER: &str = "withRQCell";
pub const DEFAULT_URI: &str = "/graphql";
pub const DEFAULT_CACHE_TIME_MS: u64 = 5 * 60 * 1000;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RqCellConfig {
    pub transform: TransformSettings,
    pub client: ClientSettings,
}

impl RqCellConfig {
    /// Render the configuration as TOML, the format of `rqcell.toml`
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Settings for the Cell source transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    /// Module the wrapper is imported from
    pub import_source: String,
    /// Name of the higher-order wrapper
    pub wrapper: String,
    /// File extensions considered for transformation, without the dot
    pub extensions: Vec<String>,
    /// Emit single-quoted strings in injected code
    pub single_quote: bool,
    /// Path segments that are never transformed
    pub exclude: Vec<String>,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            import_source: DEFAULT_IMPORT_SOURCE.to_string(),
            wrapper: DEFAULT_WRAPPER.to_string(),
            extensions: ["js", "jsx", "ts", "tsx", "mjs"]
                .into_iter()
                .map(String::from)
                .collect(),
            single_quote: true,
            exclude: vec!["node_modules".to_string()],
        }
    }
}

impl TransformSettings {
    /// True when `ext` (with or without a leading dot) is handled
    pub fn handles_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.') == ext)
    }
}

/// Settings for the GraphQL client used at runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// GraphQL endpoint
    pub uri: String,
    /// Headers sent with every request
    pub headers: IndexMap<String, String>,
    /// How long fetched data counts as fresh, in milliseconds
    pub stale_time_ms: u64,
    /// How long an unused cache entry is kept, in milliseconds
    pub cache_time_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            headers: IndexMap::new(),
            stale_time_ms: 0,
            cache_time_ms: DEFAULT_CACHE_TIME_MS,
        }
    }
}

impl ClientSettings {
    pub fn stale_time(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.stale_time_ms)
    }

    pub fn cache_time(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.cache_time_ms)
    }
}
