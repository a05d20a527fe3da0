// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The core scan logic has no command-line surface of its own; these are
// the entry points of the terminal frontend that drives it.
// =============================================================================

use clap::{Parser, Subcommand};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "phishshield",
    version = "0.1.0",
    about = "Scan URLs for phishing with the PhishShield detection service",
    long_about = "phishshield checks URLs against a PhishShield classification service and keeps \
                  a bounded recent-activity history plus running statistics for the session."
)]
pub struct Cli {
    /// Base URL of the PhishShield API
    ///
    /// All endpoints (predict_url, history, extension_stats) are resolved
    /// relative to this.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8000")]
    pub api: String,

    /// Enable debug-level diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands (check, interactive)
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a single URL and exit
    ///
    /// Exit code 0 = safe, 1 = phishing detected, 2 = error
    ///
    /// Example: phishshield check https://example.com
    Check {
        /// The URL to classify (e.g. https://example.com)
        ///
        /// This is a positional argument (required, no flag needed)
        url: String,

        /// Output the verdict as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: type URLs to check them, browse history and
    /// statistics
    ///
    /// Example: phishshield interactive --api http://scanner.local:8000
    Interactive,
}
