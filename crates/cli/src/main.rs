//! watchrun - run a command when files change

use anyhow::Result;
use clap::Parser;
use cli_lib::{args::Cli, session};
use tracing_subscriber::EnvFilter;
use watchrun_core::resolve;

/// Diagnostics go to stderr; stdout is reserved for change notices and command output
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let inputs = cli.inputs()?;
    let resolved = resolve(inputs)?;

    session::run(resolved).await
}
