//! File-based config discovery and layering
//!
//! Sources, lowest priority first: built-in defaults, the config file, then
//! `RQCELL_`-prefixed environment variables (`__` separates nesting levels,
//! e.g. `RQCELL_CLIENT__URI`).

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::settings::RqCellConfig;

pub const CONFIG_FILE: &str = "rqcell.toml";
pub const PACKAGE_JSON_FIELD: &str = "rqcell";
pub const ENV_PREFIX: &str = "RQCELL_";

/// Where a configuration was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Toml(PathBuf),
    PackageJson(PathBuf),
}

impl ConfigSource {
    /// Classify an explicit path by its file name
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.file_name().is_some_and(|n| n == "package.json") {
            ConfigSource::PackageJson(path)
        } else {
            ConfigSource::Toml(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Toml(path) | ConfigSource::PackageJson(path) => path,
        }
    }
}

/// Searches a project root for rqcell configuration
///
/// ```no_run
/// use rqcell_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// println!("{}", config.client.uri);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. rqcell.toml
    /// 2. package.json (rqcell field)
    pub fn find(&self) -> Option<ConfigSource> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(ConfigSource::Toml(toml_path));
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed: Value = serde_json::from_str(&content).ok()?;
        match parsed.get(PACKAGE_JSON_FIELD) {
            Some(field) if !field.is_null() => Some(ConfigSource::PackageJson(pkg_path)),
            _ => None,
        }
    }

    /// Load the discovered config, falling back to defaults when no file exists
    pub fn load(&self) -> Result<RqCellConfig> {
        let source = self.find();
        match &source {
            Some(source) => debug!(path = %source.path().display(), "using config file"),
            None => debug!(root = %self.root.display(), "no config file, using defaults"),
        }
        load_layered(source.as_ref())
    }

    /// Load config from an explicit file; a missing file is an error
    pub fn load_from(path: impl AsRef<Path>) -> Result<RqCellConfig> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        load_layered(Some(&ConfigSource::from_path(path)))
    }
}

/// Layer defaults, an optional file and the environment, then validate
pub fn load_layered(source: Option<&ConfigSource>) -> Result<RqCellConfig> {
    let mut figment = Figment::from(Serialized::defaults(RqCellConfig::default()));

    match source {
        Some(ConfigSource::Toml(path)) => {
            // Surface syntax errors with the file path before figment sees them
            let content = fs::read_to_string(path)?;
            toml::from_str::<toml::Value>(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;
            figment = figment.merge(Toml::string(&content));
        }
        Some(ConfigSource::PackageJson(path)) => {
            figment = figment.merge(Serialized::defaults(package_json_section(path)?));
        }
        None => {}
    }

    let config: RqCellConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    config.validate()?;
    Ok(config)
}

fn package_json_section(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match parsed.get(PACKAGE_JSON_FIELD) {
        Some(Value::Object(section)) => Ok(Value::Object(section.clone())),
        Some(_) => Err(ConfigError::invalid(
            PACKAGE_JSON_FIELD,
            "the 'rqcell' field of package.json must be an object",
        )),
        None => Err(ConfigError::invalid(
            PACKAGE_JSON_FIELD,
            "add an 'rqcell' field to your package.json",
        )),
    }
}
