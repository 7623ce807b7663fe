//! Entry point for the junitfork worker binary.
//! Rebuilds the listeners handed off by the controller.

use clap::Parser;
use junitfork_worker::{Args, run};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    run(&args)?;
    Ok(())
}
