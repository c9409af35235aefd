//! Executor: runs commands in the current root or inside the image root.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use rootforge_common::config::ExecConfig;
use rootforge_common::error::{Result, RootforgeError};
use tracing::Span;

use super::backend::{HostProcessBackend, ProcessBackend, command_line};
use super::preflight;

/// Construction-time configuration step applied by [`Executor::new`].
///
/// Options run in order; the first error aborts construction.
pub type ExecutorOption = Box<dyn FnOnce(&mut Executor) -> Result<()>>;

/// Runs commands with a fixed working directory, optionally switching the
/// root into that directory first.
#[derive(Debug)]
pub struct Executor {
    working_dir: PathBuf,
    span: Span,
    use_root_emulation: bool,
    proot_binary: PathBuf,
    chroot_binary: PathBuf,
    backend: Box<dyn ProcessBackend>,
}

impl Executor {
    /// Creates an executor backed by [`HostProcessBackend`], then applies
    /// each option in order.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by an option; no executor is
    /// returned in that case.
    pub fn new(
        working_dir: impl Into<PathBuf>,
        span: Span,
        options: impl IntoIterator<Item = ExecutorOption>,
    ) -> Result<Self> {
        let defaults = ExecConfig::default();
        let mut executor = Self {
            working_dir: working_dir.into(),
            span,
            use_root_emulation: defaults.use_root_emulation,
            proot_binary: defaults.proot_binary,
            chroot_binary: defaults.chroot_binary,
            backend: Box::new(HostProcessBackend::new()),
        };
        for option in options {
            option(&mut executor)?;
        }
        Ok(executor)
    }

    /// Replaces the process backend. No validation is performed.
    pub fn set_backend(&mut self, backend: impl ProcessBackend + 'static) {
        self.backend = Box::new(backend);
    }

    /// Switches between `proot` emulation and a privileged `chroot`.
    pub const fn set_use_root_emulation(&mut self, enabled: bool) {
        self.use_root_emulation = enabled;
    }

    /// Whether [`Self::execute_chroot`] goes through `proot`.
    #[must_use]
    pub const fn use_root_emulation(&self) -> bool {
        self.use_root_emulation
    }

    /// Working directory, and root for [`Self::execute_chroot`].
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Runs `argv` in the current root with the working directory set.
    ///
    /// # Errors
    ///
    /// Returns the backend's error unchanged.
    pub fn execute<S: AsRef<OsStr>>(&self, argv: &[S]) -> Result<()> {
        let argv = to_os_strings(argv);
        tracing::info!(parent: &self.span, command = %command_line(&argv), "running");
        self.backend.run(&self.span, &self.working_dir, &argv)
    }

    /// Runs `argv` with the root switched to the working directory.
    ///
    /// With root emulation enabled the command becomes
    /// `proot -S <root> argv...`; otherwise `chroot <root> argv...`, where
    /// `<root>` is the working directory made absolute.
    ///
    /// # Errors
    ///
    /// Returns [`RootforgeError::EmptyCommand`] for an empty `argv`, and the
    /// backend's error unchanged otherwise.
    pub fn execute_chroot<S: AsRef<OsStr>>(&self, argv: &[S]) -> Result<()> {
        if argv.is_empty() {
            return Err(RootforgeError::EmptyCommand);
        }
        let wrapped = self.root_switch_argv(argv)?;
        tracing::info!(
            parent: &self.span,
            root = %self.working_dir.display(),
            emulated = self.use_root_emulation,
            command = %command_line(&wrapped),
            "running in image root"
        );
        self.backend.run(&self.span, &self.working_dir, &wrapped)
    }

    /// Checks that the configured root-switch tool is usable on this host,
    /// returning its resolved path.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool is missing, or if a privileged `chroot`
    /// is configured and the process is not running as root.
    pub fn preflight(&self) -> Result<PathBuf> {
        if self.use_root_emulation {
            return preflight::resolve_tool(&self.proot_binary);
        }
        let tool = preflight::resolve_tool(&self.chroot_binary)?;
        preflight::ensure_privileged()?;
        Ok(tool)
    }

    /// Composes the root-switch command line. The root is made absolute
    /// because the backend also runs the tool from inside the working
    /// directory, where a relative root would resolve a second time.
    fn root_switch_argv<S: AsRef<OsStr>>(&self, argv: &[S]) -> Result<Vec<OsString>> {
        let root = std::path::absolute(&self.working_dir).map_err(|e| RootforgeError::Io {
            path: self.working_dir.clone(),
            source: e,
        })?;
        let mut wrapped = Vec::with_capacity(argv.len() + 3);
        if self.use_root_emulation {
            wrapped.push(self.proot_binary.clone().into_os_string());
            wrapped.push(OsString::from("-S"));
        } else {
            wrapped.push(self.chroot_binary.clone().into_os_string());
        }
        wrapped.push(root.into_os_string());
        wrapped.extend(argv.iter().map(|a| a.as_ref().to_os_string()));
        Ok(wrapped)
    }
}

/// Option installing a specific process backend.
#[must_use]
pub fn with_backend(backend: impl ProcessBackend + 'static) -> ExecutorOption {
    Box::new(move |executor: &mut Executor| {
        executor.set_backend(backend);
        Ok(())
    })
}

/// Option selecting `proot` emulation (`true`) or `chroot` (`false`).
#[must_use]
pub fn with_root_emulation(enabled: bool) -> ExecutorOption {
    Box::new(move |executor: &mut Executor| {
        executor.use_root_emulation = enabled;
        Ok(())
    })
}

/// Option applying an [`ExecConfig`].
///
/// Rejects empty tool paths.
#[must_use]
pub fn with_exec_config(config: ExecConfig) -> ExecutorOption {
    Box::new(move |executor: &mut Executor| {
        for (name, tool) in [("proot_binary", &config.proot_binary), ("chroot_binary", &config.chroot_binary)] {
            if tool.as_os_str().is_empty() {
                return Err(RootforgeError::Config {
                    message: format!("{name} must not be empty"),
                });
            }
        }
        executor.use_root_emulation = config.use_root_emulation;
        executor.proot_binary = config.proot_binary;
        executor.chroot_binary = config.chroot_binary;
        Ok(())
    })
}

fn to_os_strings<S: AsRef<OsStr>>(argv: &[S]) -> Vec<OsString> {
    argv.iter().map(|a| a.as_ref().to_os_string()).collect()
}
