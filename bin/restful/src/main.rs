//! Restful CLI
//!
//! Generates a static, REST-shaped JSON API from a blog's content.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use restful::cmd::Inputs;

/// Command-line interface for restful.
#[derive(Parser)]
#[command(
    name = "restful",
    version,
    about = "Generate a static JSON API for a blog"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "_config.yml")]
    config: PathBuf,

    /// Layer RESTFUL__* environment variables over the configuration file
    #[arg(long)]
    env: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate the API and write it to the output directory
    Build {
        /// Content dump (YAML or JSON)
        #[arg(long, default_value = "content.yml")]
        content: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "public")]
        output: PathBuf,
        /// Derive categories and tags from the posts
        #[arg(long)]
        derive_terms: bool,
        /// Remove a previously generated api/ directory first
        #[arg(long)]
        clean: bool,
    },
    /// Validate configuration and content
    Check {
        /// Content dump (YAML or JSON)
        #[arg(long, default_value = "content.yml")]
        content: PathBuf,
        /// Derive categories and tags from the posts
        #[arg(long)]
        derive_terms: bool,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    restful::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            content,
            output,
            derive_terms,
            clean,
        } => {
            let inputs = Inputs {
                derive_terms,
                env: cli.env,
                ..Inputs::new(cli.config, content)
            };
            restful::cmd::build::run(&inputs, &output, clean)?;
        }
        Commands::Check {
            content,
            derive_terms,
            strict,
        } => {
            let inputs = Inputs {
                derive_terms,
                env: cli.env,
                ..Inputs::new(cli.config, content)
            };
            restful::cmd::check::run(&inputs, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["restful", "build", "--output", "dist"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, PathBuf::from("_config.yml"));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.env);

        match cli.command {
            Commands::Build {
                content,
                output,
                derive_terms,
                clean,
            } => {
                assert_eq!(content, PathBuf::from("content.yml"));
                assert_eq!(output, PathBuf::from("dist"));
                assert!(!derive_terms);
                assert!(!clean);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_flags() {
        let args = [
            "restful",
            "--env",
            "build",
            "--content",
            "dump.json",
            "--derive-terms",
            "--clean",
        ];
        let cli = Cli::parse_from(args);
        assert!(cli.env);

        match cli.command {
            Commands::Build {
                content,
                derive_terms,
                clean,
                ..
            } => {
                assert_eq!(content, PathBuf::from("dump.json"));
                assert!(derive_terms);
                assert!(clean);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["restful", "check", "--strict"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check { strict, .. } => {
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["restful", "-vvv", "build"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let args = ["restful", "--config", "site.toml", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
    }
}
