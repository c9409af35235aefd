//! Filesystem backend used by the supervision tree writer.

use std::fmt::Debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Minimal filesystem capability needed to write a supervision tree.
///
/// Paths are relative to the backend's root.
pub trait FileSystem: Send + Sync + Debug {
    /// Creates `path` and any missing parents, leaving `path` with `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if a component exists and is not a directory, or the
    /// directory cannot be created.
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Creates or truncates `path` with `mode` and opens it for writing.
    /// The file is closed when the returned handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    fn create_file(&self, path: &Path, mode: u32) -> io::Result<Box<dyn Write + Send>>;
}

/// Filesystem backend rooted at a directory on the host.
///
/// Modes are applied explicitly after creation so the process umask does not
/// narrow them.
#[derive(Debug, Clone)]
pub struct HostFileSystem {
    root: PathBuf,
}

impl HostFileSystem {
    /// Creates a backend that resolves all paths under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this backend.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileSystem for HostFileSystem {
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        let full = self.resolve(path);
        let mut builder = fs::DirBuilder::new();
        let _ = builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            let _ = builder.mode(mode);
        }
        builder.create(&full)?;
        set_mode(&full, mode)
    }

    fn create_file(&self, path: &Path, mode: u32) -> io::Result<Box<dyn Write + Send>> {
        let full = self.resolve(path);
        let mut options = fs::OpenOptions::new();
        let _ = options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let _ = options.mode(mode);
        }
        let file = options.open(&full)?;
        set_mode(&full, mode)?;
        Ok(Box::new(file))
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
