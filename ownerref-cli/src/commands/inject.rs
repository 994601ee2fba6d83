//! `ownerref inject <dir>` — annotate a directory of rendered manifests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use ownerref_core::config;
use ownerref_renderer::{OwnerRefEngine, RenderEngine, RenderedDir, RenderedFiles};

/// Arguments for `ownerref inject`.
#[derive(Args, Debug)]
pub struct InjectArgs {
    /// Directory of rendered files, e.g. from `helm template --output-dir`.
    pub dir: PathBuf,

    /// Config file with the owner references (defaults to `ownerref config-path`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit a JSON object of file name → manifest text.
    #[arg(long, conflicts_with = "out_dir")]
    pub json: bool,

    /// Write annotated files under this directory instead of printing them.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

impl InjectArgs {
    pub fn run(self) -> Result<()> {
        let cfg = match &self.config {
            Some(path) => config::load_config_at(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => config::load_config()
                .context("failed to load the default config (create one with `ownerref init`)")?,
        };
        if cfg.owner_references.is_empty() {
            tracing::warn!("no owner references configured");
        }

        let engine = OwnerRefEngine::from_config(RenderedDir, cfg);
        let files = engine
            .render(self.dir.as_path(), &())
            .with_context(|| format!("inject failed for '{}'", self.dir.display()))?;

        if let Some(out_dir) = &self.out_dir {
            write_files(out_dir, &files)?;
            println!("✓ {} manifest(s) written to {}", files.len(), out_dir.display());
        } else if self.json {
            println!("{}", serde_json::to_string_pretty(&files)?);
        } else {
            print_files(&files);
        }
        Ok(())
    }
}

/// Same shape as `helm template` output.
fn print_files(files: &RenderedFiles) {
    for (name, text) in files {
        println!("---");
        println!("# Source: {name}");
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }
}

fn write_files(out_dir: &Path, files: &RenderedFiles) -> Result<()> {
    for (name, text) in files {
        let path = out_dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }
        std::fs::write(&path, text).with_context(|| format!("could not write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote manifest");
    }
    Ok(())
}
