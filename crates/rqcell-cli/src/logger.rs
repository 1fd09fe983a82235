//! Logging setup
//!
//! Logs go to stderr so stdout stays clean for transformed code, keys and
//! query results.
//!
//! ```rust,no_run
//! use rqcell_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("Transforming cells");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: [&str; 6] = [
    "rqcell_cli",
    "rqcell_config",
    "rqcell_gen",
    "rqcell_plugin",
    "rqcell_runtime",
    "rqcell_transform",
];

/// Filter directives setting every rqcell crate to `level`
pub fn crate_directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Pick the filter for the given flags.
///
/// 1. `--verbose`: debug for rqcell crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG` when set
/// 4. otherwise info for rqcell crates
pub fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(crate_directives("debug"))
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(crate_directives("info")))
    }
}

/// Install the global subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && crate::ui::should_use_color())
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_directives() {
        let directives = crate_directives("debug");
        assert!(directives.starts_with("rqcell_cli=debug,"));
        assert!(directives.contains("rqcell_runtime=debug"));
        assert_eq!(directives.split(',').count(), CRATES.len());
    }

    #[test]
    fn test_filters_build() {
        assert!(!build_filter(false, true).to_string().contains("rqcell"));
        assert!(build_filter(true, false).to_string().contains("rqcell_transform=debug"));
    }
}
