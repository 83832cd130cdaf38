//! Canopy CLI
//!
//! Checks and dumps the content model of a Canopy site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Canopy.
#[derive(Parser)]
#[command(
    name = "canopy",
    version,
    about = "Content ingestion and list pages for static sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "canopy.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Parse all content and report errors and warnings
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Write the resolved content model as JSON
    Dump {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    canopy::init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { strict } => {
            canopy::cmd::check::run(&cli.config, strict)?;
        }
        Commands::Dump { output } => {
            canopy::cmd::dump::run(&cli.config, output.as_deref())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["canopy", "check", "--strict"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("canopy.toml"));
        match cli.command {
            Commands::Check { strict } => {
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_dump_command_parsing() {
        let args = ["canopy", "dump", "--output", "site.json"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Dump { output } => {
                assert_eq!(output, Some(std::path::PathBuf::from("site.json")));
            }
            _ => panic!("Expected Dump command"),
        }
    }

    #[test]
    fn test_cli_dump_defaults_to_stdout() {
        let cli = Cli::parse_from(["canopy", "dump"]);
        assert!(matches!(cli.command, Commands::Dump { output: None }));
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["canopy", "-vvv", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let args = ["canopy", "--config", "site.toml", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, std::path::PathBuf::from("site.toml"));
    }
}
