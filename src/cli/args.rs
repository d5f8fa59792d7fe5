//! CLI argument definitions using clap
//!
//! Commands:
//! - product-catalog serve [--config <path>]
//! - product-catalog seed [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Product catalog HTTP service
#[derive(Parser, Debug)]
#[command(name = "product-catalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Replace the stored catalog with the sample products
    Seed {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The requested command, `serve` when none is given
    pub fn command(self) -> Command {
        self.command.unwrap_or(Command::Serve { config: None })
    }
}
