//! majorbracket CLI entry point.

use clap::Parser;

use majorbracket::cli::{handle_error, run, Cli, CliContext};
use majorbracket::infrastructure::config::ConfigLoader;
use majorbracket::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            handle_error(&err, cli.json, None);
            std::process::exit(2);
        }
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    let mut ctx = match CliContext::new(config) {
        Ok(ctx) => ctx,
        Err(err) => {
            handle_error(&err, cli.json, None);
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli.command, &mut ctx, cli.json).await {
        tracing::error!(error = %err, "command failed");
        handle_error(&err, cli.json, Some(&mut ctx.auth));
        std::process::exit(1);
    }
}
