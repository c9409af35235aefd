//! `rootforge supervise` — Write an s6 supervision tree.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use rootforge_common::types::Services;
use rootforge_core::supervision::{HostFileSystem, SupervisionContext};

/// Arguments for the `supervise` command.
#[derive(Args, Debug)]
pub struct SuperviseArgs {
    /// Image root; the tree is written to `<root>/sv`.
    #[arg(long)]
    pub root: PathBuf,

    /// JSON object mapping service names to commands.
    #[arg(long)]
    pub services: PathBuf,
}

/// Executes the `supervise` command.
///
/// # Errors
///
/// Returns an error if the service map cannot be read or any service
/// cannot be written.
pub fn execute(args: &SuperviseArgs) -> anyhow::Result<()> {
    let services = Services::from_json_file(&args.services)
        .with_context(|| format!("reading services from {}", args.services.display()))?;

    let fs = HostFileSystem::new(&args.root);
    let span = tracing::info_span!("supervise", root = %fs.root().display());
    let ctx = SupervisionContext::new(fs, span);
    ctx.write_supervision_tree(&services)
        .context("writing supervision tree")?;

    tracing::info!(services = services.len(), root = %args.root.display(), "supervision tree written");
    Ok(())
}
