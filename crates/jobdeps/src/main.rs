//! Jobdeps CLI binary.

use anyhow::Result;
use jobdeps::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the jobdeps CLI.
///
/// Uses tokio's current_thread runtime; the only I/O is reading two files.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Can be controlled via RUST_LOG environment variable
    // Example: RUST_LOG=jobdeps=debug cargo run -- jobs.json layers
    // Rejected snapshot entries are reported by the command itself, so the
    // default filter stays above warn.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobdeps=error")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting jobdeps CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Jobdeps CLI completed successfully");
    Ok(())
}
