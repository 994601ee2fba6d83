//! `ownerref config-path` — print where `inject` looks for its config.

use anyhow::{Context, Result};
use clap::Args;

use ownerref_core::config;

/// Arguments for `ownerref config-path`.
#[derive(Args, Debug)]
pub struct ConfigPathArgs {}

impl ConfigPathArgs {
    pub fn run(self) -> Result<()> {
        let path = config::default_config_path().context("could not determine config directory")?;
        println!("{}", path.display());
        Ok(())
    }
}
