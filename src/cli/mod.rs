//! CLI module for the package gateway
//!
//! Provides subcommands:
//! - `serve`: HTTP API server
//! - `generate`: build one package and print the outcome as JSON

pub mod generate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Maze Package Gateway - personalized training packages as zip archives
#[derive(Parser)]
#[command(name = "maze-package-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Generate a single package locally
    Generate(generate::GenerateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["maze-package-gateway", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "maze-package-gateway",
            "generate",
            "--maze-rooms",
            "5",
            "--training-steps",
            "100000",
        ])
        .unwrap();

        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.maze_rooms, 5);
        assert_eq!(args.training_steps, 100_000);
        assert!(args.algorithm.is_none());
    }

    #[test]
    fn test_generate_requires_training_steps() {
        assert!(
            Cli::try_parse_from(["maze-package-gateway", "generate", "--maze-rooms", "5"])
                .is_err()
        );
    }
}
