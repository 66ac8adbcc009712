// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "viewfinder")]
#[command(about = "Scan-to-action session core for QR camera screens")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a scripted scan session and print each transition
    Simulate {
        /// Decoded payload to feed through the session
        payload: String,

        /// Feed the detection without geometry (permissive path)
        #[arg(long)]
        no_bounds: bool,

        /// Actually launch URL payloads with the system handler
        #[arg(long)]
        open: bool,

        /// Path to a JSON scan configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Classify a payload and print the derived icon lookup URI
    Classify {
        /// Decoded payload to classify
        payload: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=viewfinder=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            payload,
            no_bounds,
            open,
            config,
        } => cli::simulate(payload, no_bounds, open, config),
        Commands::Classify { payload } => cli::classify(&payload),
    }
}
