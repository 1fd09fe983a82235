//! Query command implementation

use std::path::Path;
use std::sync::Arc;

use rqcell_runtime::{CellProvider, QueryOptions, StaticTokenAuth};
use tracing::info;

use crate::cli::QueryArgs;
use crate::commands::utils;
use crate::error::{CliError, Result};

/// Run the document once against the configured endpoint and print the
/// normalized result. A failed operation still prints its result before
/// exiting with an error.
pub async fn execute(args: QueryArgs, config: Option<&Path>) -> Result<()> {
    let (config, _) = utils::load_config(config)?;
    ensure_absolute(&config.client.uri)?;
    let document = utils::read_document(&args.document)?;

    let mut provider = CellProvider::from_settings(&config.client);
    if let Some(token) = args.token {
        provider = provider.with_auth(Arc::new(StaticTokenAuth::new(
            args.auth_provider,
            Some(token),
        )));
    }
    let client = provider.client()?;

    let options = QueryOptions::with_variables(args.variables.unwrap_or_default());
    let query = client.query(&document, options);
    info!(key = %query.key(), uri = %config.client.uri, "running query");

    let result = query.observe().await;
    println!("{}", serde_json::to_string_pretty(&result.to_json())?);

    match result.error {
        Some(err) => Err(CliError::QueryFailed(err.to_string())),
        None => Ok(()),
    }
}

/// The default `/graphql` only makes sense relative to a web page
fn ensure_absolute(uri: &str) -> Result<()> {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return Ok(());
    }
    Err(CliError::Custom(format!(
        "GraphQL endpoint '{uri}' is not an absolute URL\n\n\
         Hint: set `client.uri` in rqcell.toml or RQCELL_CLIENT__URI to an http(s):// address"
    )))
}
