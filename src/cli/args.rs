//! Command-line argument parsing for MedFlow
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::store::PatientSortField;
use crate::types::Urgency;

/// MedFlow - simulated hospital operations dashboard
#[derive(Parser, Debug)]
#[command(name = "medflow")]
#[command(version)]
#[command(about = "Simulated hospital operations: patient flow, beds and routing", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed data file (overrides the configured one)
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only warnings and errors are logged)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the store with auto-refresh and print the dashboard on every change
    Watch {
        /// Stop after this many seconds
        #[arg(long, default_value_t = 120)]
        duration: u64,

        /// Refresh period in seconds (overrides config)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Run one refresh and print the result
    Refresh,

    /// Print the current snapshot
    Snapshot {
        /// Only patients matching this text
        #[arg(long)]
        search: Option<String>,

        /// Sort patients by id, name, age, urgency, wait-time, department or status
        #[arg(long)]
        sort: Option<PatientSortField>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Admit a patient
    Admit {
        #[arg(long)]
        name: String,

        #[arg(long)]
        age: u8,

        /// urgent, high, medium or low
        #[arg(long)]
        urgency: Urgency,

        /// Department id, e.g. cardiology
        #[arg(long)]
        department: String,
    },

    /// Classify a presentation with the keyword triage rules
    Triage {
        /// Presentation text
        #[arg(value_name = "TEXT", required_unless_present = "sample")]
        text: Option<String>,

        /// Use one of the seeded sample texts (1-based)
        #[arg(long, conflicts_with = "text")]
        sample: Option<usize>,
    },

    /// Show current and predicted wait per department
    Predict,

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default tracing filter when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "medflow=info",
            Verbosity::Verbose => "medflow=debug",
            Verbosity::VeryVerbose => "debug",
        }
    }
}
