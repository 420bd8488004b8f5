//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Learnboard CLI
#[derive(Parser, Debug)]
#[command(name = "learnctl")]
#[command(about = "Learnboard - learner XP, projects, skills and audits", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Directory holding the query result dumps (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (overrides $LEARNCTL_CONFIG and defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Show the full dashboard report
    Report {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show total XP and the monthly timeline
    Xp,

    /// Show pass/fail counts and recent projects
    Projects,

    /// Show top skills
    Skills,

    /// Show audit ratio and counts
    Audit,

    /// Show the effective configuration
    Config,
}
