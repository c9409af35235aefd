//! CLI command definitions and dispatch.

pub mod exec;
pub mod supervise;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rootforge_common::config::RootforgeConfig;

/// Runs commands inside image roots and writes s6 supervision trees.
#[derive(Parser, Debug)]
#[command(name = rootforge_common::constants::APP_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// JSON configuration file.
    #[arg(long, global = true, env = "ROOTFORGE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command, optionally inside the image root.
    Exec(exec::ExecArgs),
    /// Write an s6 supervision tree from a JSON service map.
    Supervise(supervise::SuperviseArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if loading the configuration or running the command
/// fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Exec(args) => exec::execute(args, config),
        Command::Supervise(args) => supervise::execute(&args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RootforgeConfig> {
    path.map_or_else(
        || Ok(RootforgeConfig::default()),
        |p| {
            RootforgeConfig::load(p)
                .with_context(|| format!("loading configuration from {}", p.display()))
        },
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn exec_keeps_trailing_arguments_verbatim() {
        let cli = Cli::try_parse_from([
            "rootforge", "exec", "--chroot", "--proot", "--work-dir", "/img", "--", "apk", "add", "-q",
        ])
        .unwrap();
        let Command::Exec(args) = cli.command else {
            unreachable!("parsed as exec");
        };
        assert!(args.chroot && args.proot);
        assert_eq!(args.work_dir, Some(PathBuf::from("/img")));
        assert_eq!(args.command, vec!["apk", "add", "-q"]);
    }

    #[test]
    fn supervise_requires_root_and_services() {
        assert!(Cli::try_parse_from(["rootforge", "supervise", "--root", "/img"]).is_err());
    }

    #[test]
    fn missing_config_flag_uses_defaults() {
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg, RootforgeConfig::default());
    }
}
