//! Root CLI structure for scramble-rs

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::sample::SampleArgs;
use crate::commands::simulate::SimulateArgs;

#[derive(Parser)]
#[command(name = "scramble-rs")]
#[command(about = "Simulate scramble and revert animations over scene documents", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the state machine over a scene and print node positions per tick
    Simulate(SimulateArgs),

    /// Draw target poses without moving anything
    Sample(SampleArgs),

    /// Check a scene document and its configuration
    Validate {
        /// Path to the scene document (YAML or JSON)
        scene: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
