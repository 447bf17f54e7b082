//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for goform using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// goform - IFRC GO PER form session tool
#[derive(Parser, Debug)]
#[command(name = "goform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "goform.toml", env = "GOFORM_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GOFORM_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch reference data and any saved draft into a session file
    Fetch(commands::fetch::FetchArgs),

    /// Validate a session file offline and print the error tree
    Check(commands::check::CheckArgs),

    /// Validate a session file and send it to the GO server
    Submit(commands::submit::SubmitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
