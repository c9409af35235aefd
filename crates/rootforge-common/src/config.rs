//! Global configuration model for rootforge.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CHROOT_BINARY, DEFAULT_PROOT_BINARY};
use crate::error::{Result, RootforgeError};

/// Root configuration for rootforge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootforgeConfig {
    /// Directory commands run in; also the root for chroot execution.
    pub work_dir: PathBuf,
    /// Settings for command execution.
    pub exec: ExecConfig,
}

impl Default for RootforgeConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            exec: ExecConfig::default(),
        }
    }
}

impl RootforgeConfig {
    /// Loads a configuration from a JSON file. Missing fields take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| RootforgeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// How commands are executed inside an image root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Use user-space root emulation instead of a privileged `chroot`.
    pub use_root_emulation: bool,
    /// Root emulation tool, resolved through `PATH` when not absolute.
    pub proot_binary: PathBuf,
    /// Root switch tool, resolved through `PATH` when not absolute.
    pub chroot_binary: PathBuf,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            use_root_emulation: false,
            proot_binary: PathBuf::from(DEFAULT_PROOT_BINARY),
            chroot_binary: PathBuf::from(DEFAULT_CHROOT_BINARY),
        }
    }
}
