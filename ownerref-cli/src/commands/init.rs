//! `ownerref init --api-version <V> --kind <K> --name <N> --uid <UID> [--controller]`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use ownerref_core::{
    config::{self, InjectConfig},
    types::{controller_reference, owner_reference},
};

/// Write a config holding a single owner reference.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// API version of the owner, e.g. "app.example.com/v1".
    #[arg(long)]
    pub api_version: String,

    /// Kind of the owner, e.g. "MyApp".
    #[arg(long)]
    pub kind: String,

    /// Name of the owner object.
    #[arg(long)]
    pub name: String,

    /// UID of the owner object.
    #[arg(long)]
    pub uid: String,

    /// Mark the owner as the managing controller (sets controller and
    /// blockOwnerDeletion).
    #[arg(long)]
    pub controller: bool,

    /// Where to write the config (defaults to `ownerref config-path`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Replace an existing config file.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => config::default_config_path().context("could not determine config directory")?,
        };
        if path.exists() && !self.force {
            bail!("config already exists at {} (use --force to replace it)", path.display());
        }

        let reference = if self.controller {
            controller_reference(self.api_version, self.kind, self.name, self.uid)
        } else {
            owner_reference(self.api_version, self.kind, self.name, self.uid)
        };
        let cfg = InjectConfig::new(vec![reference]);
        config::save_config_at(&path, &cfg)
            .with_context(|| format!("failed to write config to {}", path.display()))?;

        println!("✓ Wrote config to {}", path.display());
        Ok(())
    }
}
