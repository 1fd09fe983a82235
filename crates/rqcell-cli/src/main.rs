//! rqcell CLI entry point

use clap::Parser;
use miette::Result;
use rqcell_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let config = args.config.as_deref();
    let result = match args.command {
        cli::Command::Transform(transform_args) => {
            commands::transform_execute(transform_args, config).await
        }
        cli::Command::Key(key_args) => commands::key_execute(key_args).await,
        cli::Command::Config(config_args) => commands::config_execute(config_args, config).await,
        cli::Command::Query(query_args) => commands::query_execute(query_args, config).await,
    };

    result.map_err(error::cli_error_to_miette)
}
