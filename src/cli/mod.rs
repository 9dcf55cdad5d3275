//! Command-line interface for Haul
//!
//! Provides the main CLI structure using clap with the `start` subcommand
//! that runs the development server.

mod start;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

pub use start::{StartCommand, StartOptions};

/// Haul - a development server for React Native projects
#[derive(Parser, Debug)]
#[command(name = "haul")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the development server
    Start(StartCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        print_banner();

        match &self.command {
            Commands::Start(cmd) => cmd.execute().await,
        }
    }
}

/// Print the Haul banner
fn print_banner() {
    eprintln!(
        "\n{} {} {}\n",
        "⚡".cyan(),
        "Haul".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
