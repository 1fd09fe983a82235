//! Schema validation (no filesystem checks)

use rqcell_gen::is_identifier;

use crate::error::{ConfigError, Result};
use crate::settings::RqCellConfig;

impl RqCellConfig {
    /// Reject values the transform or the client cannot work with
    pub fn validate(&self) -> Result<()> {
        let transform = &self.transform;

        if transform.import_source.trim().is_empty() {
            return Err(ConfigError::invalid(
                "transform.import_source",
                "import source must not be empty",
            ));
        }

        if !is_identifier(&transform.wrapper) {
            return Err(ConfigError::invalid(
                "transform.wrapper",
                format!("'{}' is not a valid JavaScript identifier", transform.wrapper),
            ));
        }

        if transform.extensions.is_empty() {
            return Err(ConfigError::invalid(
                "transform.extensions",
                "at least one file extension is required",
            ));
        }

        if self.client.uri.trim().is_empty() {
            return Err(ConfigError::invalid("client.uri", "GraphQL URI must not be empty"));
        }

        Ok(())
    }
}
