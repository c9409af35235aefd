//! Writes `sv/<name>/run` entries through a [`FileSystem`].

use std::io::Write;
use std::path::{Path, PathBuf};

use rootforge_common::constants::{
    RUN_FILE, RUN_FILE_MODE, RUN_SCRIPT_SHEBANG, SUPERVISION_DIR, SUPERVISION_DIR_MODE,
};
use rootforge_common::error::{Result, RootforgeError};
use rootforge_common::types::Services;
use tracing::Span;

use super::fs::FileSystem;

/// Renders the body of a service's run script.
#[must_use]
pub fn run_script(command: &str) -> String {
    format!("{RUN_SCRIPT_SHEBANG}\n{command}\n")
}

/// Generates a supervision tree on a filesystem backend.
#[derive(Debug)]
pub struct SupervisionContext {
    fs: Box<dyn FileSystem>,
    span: Span,
}

impl SupervisionContext {
    /// Creates a context writing through `fs` and logging under `span`.
    pub fn new(fs: impl FileSystem + 'static, span: Span) -> Self {
        Self {
            fs: Box::new(fs),
            span,
        }
    }

    /// Creates `sv/<name>` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`RootforgeError::SupervisionDirectory`] if the directory
    /// cannot be created.
    pub fn create_supervision_directory(&self, name: &str) -> Result<PathBuf> {
        let svcdir = Path::new(SUPERVISION_DIR).join(name);
        tracing::debug!(parent: &self.span, path = %svcdir.display(), "supervision dir");

        self.fs
            .create_dir_all(&svcdir, SUPERVISION_DIR_MODE)
            .map_err(|e| RootforgeError::SupervisionDirectory {
                path: svcdir.clone(),
                source: e,
            })?;
        Ok(svcdir)
    }

    /// Writes `<svcdir>/run`, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`RootforgeError::CreateRunFile`] if the file cannot be
    /// created and [`RootforgeError::WriteRunFile`] if writing fails.
    pub fn write_supervision_template(&self, svcdir: &Path, command: &str) -> Result<()> {
        let filename = svcdir.join(RUN_FILE);
        let mut file = self
            .fs
            .create_file(&filename, RUN_FILE_MODE)
            .map_err(|e| RootforgeError::CreateRunFile {
                path: filename.clone(),
                source: e,
            })?;

        file.write_all(run_script(command).as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| RootforgeError::WriteRunFile {
                path: filename,
                source: e,
            })
    }

    /// Writes one service: its directory, then its run script.
    ///
    /// # Errors
    ///
    /// Returns the first failure; the run script is not attempted if the
    /// directory could not be created.
    pub fn write_supervision_service_simple(&self, name: &str, command: &str) -> Result<()> {
        tracing::debug!(parent: &self.span, service = name, command, "simple service");

        let svcdir = self.create_supervision_directory(name)?;
        self.write_supervision_template(&svcdir, command)
    }

    /// Writes every service in `services`, stopping at the first failure.
    ///
    /// Services already written stay on disk when a later one fails.
    ///
    /// # Errors
    ///
    /// Returns the first per-service failure.
    pub fn write_supervision_tree(&self, services: &Services) -> Result<()> {
        tracing::info!(parent: &self.span, services = services.len(), "generating supervision tree");

        for (name, command) in services.iter() {
            self.write_supervision_service_simple(name, command)?;
        }
        Ok(())
    }
}
