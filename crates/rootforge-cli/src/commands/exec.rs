//! `rootforge exec` — Run a command, optionally inside the image root.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use rootforge_common::config::RootforgeConfig;
use rootforge_core::exec::{Executor, with_exec_config};

/// Arguments for the `exec` command.
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Working directory; the image root when `--chroot` is given.
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Switch the root to the working directory before running.
    #[arg(long)]
    pub chroot: bool,

    /// Use `proot` emulation instead of a privileged `chroot`.
    #[arg(long)]
    pub proot: bool,

    /// Skip host checks for the root-switch tool and privileges.
    #[arg(long)]
    pub skip_preflight: bool,

    /// Command to execute.
    #[arg(trailing_var_arg = true, required = true)]
    pub command: Vec<String>,
}

/// Executes the `exec` command.
///
/// # Errors
///
/// Returns an error if preflight checks fail or the command fails.
pub fn execute(args: ExecArgs, mut config: RootforgeConfig) -> anyhow::Result<()> {
    if let Some(dir) = args.work_dir {
        config.work_dir = dir;
    }
    if args.proot {
        config.exec.use_root_emulation = true;
    }

    let span = tracing::info_span!("exec", work_dir = %config.work_dir.display());
    let executor = Executor::new(config.work_dir, span, [with_exec_config(config.exec)])?;

    if !args.chroot {
        return executor.execute(args.command.as_slice()).context("command failed");
    }
    if !args.skip_preflight {
        let tool = executor.preflight()?;
        tracing::debug!(tool = %tool.display(), "root switch tool");
    }
    executor
        .execute_chroot(args.command.as_slice())
        .context("command failed inside image root")
}
