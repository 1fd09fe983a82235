//! Shared helpers for command implementations

use std::path::{Path, PathBuf};

use rqcell_config::{ConfigDiscovery, ConfigSource, RqCellConfig};
use rqcell_runtime::QueryDocument;
use tracing::debug;

use crate::error::{Result, ResultExt};

pub fn get_cwd() -> Result<PathBuf> {
    Ok(std::env::current_dir()?)
}

/// Load the configuration from `--config`, or discover it in the working
/// directory. Returns where it came from, `None` for built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<(RqCellConfig, Option<ConfigSource>)> {
    match explicit {
        Some(path) => {
            debug!(path = %path.display(), "loading explicit config");
            let config = ConfigDiscovery::load_from(path)?;
            Ok((config, Some(ConfigSource::from_path(path))))
        }
        None => {
            let discovery = ConfigDiscovery::new(get_cwd()?);
            let source = discovery.find();
            let config = discovery.load()?;
            Ok((config, source))
        }
    }
}

/// Read and parse a GraphQL document file
pub fn read_document(path: &Path) -> Result<QueryDocument> {
    let source = std::fs::read_to_string(path).with_path(path)?;
    QueryDocument::parse(source).context(format!("Reading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use tempfile::TempDir;

    #[test]
    fn test_read_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("posts.graphql");
        std::fs::write(&path, "query FindPosts { posts { id } }").unwrap();
        let document = read_document(&path).unwrap();
        assert_eq!(document.operation_name(), Some("FindPosts"));
    }

    #[test]
    fn test_read_document_missing() {
        let err = read_document(Path::new("/definitely/missing.graphql")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_read_document_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.graphql");
        std::fs::write(&path, "type Post { id: ID }").unwrap();
        let err = read_document(&path).unwrap_err();
        assert!(err.to_string().starts_with("Reading "));
    }

    #[test]
    fn test_load_explicit_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rqcell.toml");
        std::fs::write(&path, "[client]\nuri = \"http://localhost:8911/graphql\"\n").unwrap();
        let (config, source) = load_config(Some(&path)).unwrap();
        assert_eq!(config.client.uri, "http://localhost:8911/graphql");
        assert_eq!(source, Some(ConfigSource::Toml(path)));
    }
}
