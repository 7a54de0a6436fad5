//! CLI - Command-line argument parsing
//!
//! Defines the `claim-assess` command structure using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Normalize fraud prediction responses into claim assessments
#[derive(Parser, Debug)]
#[command(name = "claim-assess")]
#[command(about = "Normalize insurance-fraud prediction responses", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to config/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess a single prediction response
    Assess {
        /// JSON body returned by the prediction endpoint
        #[arg(long)]
        response: PathBuf,

        /// JSON object of the submitted claim fields
        #[arg(long)]
        submission: Option<PathBuf>,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Assess JSON lines of {"response": ..., "submission": ...}
    Batch {
        /// Input file, one claim per line
        #[arg(long)]
        input: PathBuf,
    },
}
