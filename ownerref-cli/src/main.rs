//! ownerref — add owner references to rendered chart manifests.
//!
//! # Usage
//!
//! ```text
//! ownerref init --api-version <V> --kind <K> --name <N> --uid <UID> [--controller]
//! ownerref inject <DIR> [--config <FILE>] [--json | --out-dir <DIR>]
//! ownerref config-path
//! ```
//!
//! Diagnostics go to stderr and honour `RUST_LOG` (default `info`).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{config_path::ConfigPathArgs, init::InitArgs, inject::InjectArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ownerref",
    version,
    about = "Attach Kubernetes owner references to rendered manifests",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a config with the owner reference to inject.
    Init(InitArgs),

    /// Add the configured owner references to every manifest under a directory.
    Inject(InjectArgs),

    /// Print the default config file location.
    ConfigPath(ConfigPathArgs),
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Inject(args) => args.run(),
        Commands::ConfigPath(args) => args.run(),
    }
}
