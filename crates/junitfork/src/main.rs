//! Entry point for the junitfork controller binary.
//! Loads listener configuration and writes the handoff document read by the
//! forked worker.

use junitfork::config::Config;
use junitfork::{logging, run};

fn main() -> anyhow::Result<()> {
    logging::init();
    let config = Config::load()?;
    run(&config)?;
    Ok(())
}
