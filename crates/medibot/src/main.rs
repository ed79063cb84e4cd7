// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Medibot - a WhatsApp health-question chatbot.
//!
//! This is the binary entry point.

mod check;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use medibot_config::{ConfigError, MedibotConfig};

/// Medibot - a WhatsApp health-question chatbot.
#[derive(Parser, Debug)]
#[command(name = "medibot", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this TOML file instead of the default locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server (default).
    Serve,
    /// Validate configuration and check every collaborator.
    Check {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

fn load(path: Option<&PathBuf>) -> Result<MedibotConfig, Vec<ConfigError>> {
    match path {
        Some(path) => medibot_config::load_and_validate_path(path),
        None => medibot_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            medibot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Check { plain } => match check::run_check(&config, plain).await {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(2),
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("medibot: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::parse_from(["medibot"]);
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["medibot", "check", "--plain", "--config", "/tmp/m.toml"]);
        assert!(matches!(cli.command, Some(Commands::Check { plain: true })));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.toml")));
    }
}
