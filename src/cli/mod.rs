//! CLI Module
//!
//! Command-line interface for running the delta filter over WAV files.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DeltaDsp - noise sharpening audio filter
#[derive(Parser, Debug)]
#[command(name = "deltadsp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print the resolved format when the filter negotiates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sharpen a WAV file
    #[command(name = "process")]
    Process {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Delta gain in percent (0-200)
        #[arg(short, long)]
        gain: Option<u32>,

        /// JSON settings file (gain_percent, silent)
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },

    /// Show the format a WAV file resolves to
    #[command(name = "info")]
    Info {
        /// Input WAV file
        input: PathBuf,
    },

    /// List the supported sample formats
    #[command(name = "formats")]
    Formats,
}
