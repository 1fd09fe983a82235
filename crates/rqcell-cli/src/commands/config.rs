//! Config command implementation

use std::path::Path;

use crate::cli::ConfigArgs;
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::ui;

/// Load and validate the configuration; print it as TOML with `--show`
pub async fn execute(args: ConfigArgs, config: Option<&Path>) -> Result<()> {
    let (config, source) = utils::load_config(config)?;

    match &source {
        Some(source) => ui::success(&format!(
            "Configuration is valid ({})",
            source.path().display()
        )),
        None => ui::info("No rqcell.toml or package.json `rqcell` field found, using defaults"),
    }

    if args.show {
        let rendered = config
            .to_toml()
            .map_err(|e| CliError::Custom(format!("Failed to render configuration: {e}")))?;
        print!("{rendered}");
    }
    Ok(())
}
