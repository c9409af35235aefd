//! In-memory filesystem that records every operation.
//!
//! Used to verify the supervision tree writer without touching a disk.
//! Failures can be injected per path for directory creation, file creation,
//! and writes.

use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::fs::FileSystem;

/// One operation observed by [`MemoryFileSystem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOp {
    /// `create_dir_all` was called.
    CreateDir {
        /// Requested path.
        path: PathBuf,
        /// Requested mode.
        mode: u32,
    },
    /// `create_file` was called.
    CreateFile {
        /// Requested path.
        path: PathBuf,
        /// Requested mode.
        mode: u32,
    },
    /// A handle returned by `create_file` was dropped.
    CloseFile {
        /// Path of the closed file.
        path: PathBuf,
    },
}

#[derive(Debug, Clone)]
enum Entry {
    Dir { mode: u32 },
    File { mode: u32, contents: Vec<u8> },
}

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<PathBuf, Entry>,
    ops: Vec<FsOp>,
    fail_dirs: HashSet<PathBuf>,
    fail_files: HashSet<PathBuf>,
    fail_writes: HashSet<PathBuf>,
}

/// Recording filesystem. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    state: Arc<Mutex<State>>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `create_dir_all` fail for exactly `path`.
    pub fn fail_create_dir(&self, path: impl Into<PathBuf>) {
        let _ = self.lock().fail_dirs.insert(path.into());
    }

    /// Makes `create_file` fail for exactly `path`.
    pub fn fail_create_file(&self, path: impl Into<PathBuf>) {
        let _ = self.lock().fail_files.insert(path.into());
    }

    /// Makes writes to `path` fail after it has been created.
    pub fn fail_write(&self, path: impl Into<PathBuf>) {
        let _ = self.lock().fail_writes.insert(path.into());
    }

    /// Every operation observed so far, oldest first.
    #[must_use]
    pub fn ops(&self) -> Vec<FsOp> {
        self.lock().ops.clone()
    }

    /// Contents of the file at `path`.
    #[must_use]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.lock().entries.get(path.as_ref()) {
            Some(Entry::File { contents, .. }) => Some(contents.clone()),
            _ => None,
        }
    }

    /// Mode of the file or directory at `path`.
    #[must_use]
    pub fn mode(&self, path: impl AsRef<Path>) -> Option<u32> {
        self.lock().entries.get(path.as_ref()).map(|entry| match entry {
            Entry::Dir { mode } | Entry::File { mode, .. } => *mode,
        })
    }

    /// Whether a directory exists at `path`.
    #[must_use]
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        matches!(self.lock().entries.get(path.as_ref()), Some(Entry::Dir { .. }))
    }

    /// Whether a file exists at `path`.
    #[must_use]
    pub fn is_file(&self, path: impl AsRef<Path>) -> bool {
        matches!(self.lock().entries.get(path.as_ref()), Some(Entry::File { .. }))
    }

    /// Number of file handles created and not yet dropped.
    #[must_use]
    pub fn open_handles(&self) -> usize {
        let state = self.lock();
        let opened = state
            .ops
            .iter()
            .filter(|op| matches!(op, FsOp::CreateFile { .. }))
            .count();
        let closed = state
            .ops
            .iter()
            .filter(|op| matches!(op, FsOp::CloseFile { .. }))
            .count();
        opened - closed
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn injected(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("injected failure for {}", path.display()),
    )
}

impl FileSystem for MemoryFileSystem {
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut state = self.lock();
        state.ops.push(FsOp::CreateDir {
            path: path.to_path_buf(),
            mode,
        });
        if state.fail_dirs.contains(path) {
            return Err(injected(path));
        }

        let mut missing = Vec::new();
        for ancestor in path.ancestors().filter(|a| !a.as_os_str().is_empty()) {
            match state.entries.get(ancestor) {
                Some(Entry::Dir { .. }) => break,
                Some(Entry::File { .. }) => {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("{} exists and is not a directory", ancestor.display()),
                    ));
                }
                None => missing.push(ancestor.to_path_buf()),
            }
        }
        for dir in missing {
            let _ = state.entries.insert(dir, Entry::Dir { mode });
        }
        let _ = state.entries.insert(path.to_path_buf(), Entry::Dir { mode });
        Ok(())
    }

    fn create_file(&self, path: &Path, mode: u32) -> io::Result<Box<dyn Write + Send>> {
        let mut state = self.lock();
        state.ops.push(FsOp::CreateFile {
            path: path.to_path_buf(),
            mode,
        });
        if state.fail_files.contains(path) {
            return Err(injected(path));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !matches!(state.entries.get(parent), Some(Entry::Dir { .. })) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} does not exist", parent.display()),
                ));
            }
        }
        if matches!(state.entries.get(path), Some(Entry::Dir { .. })) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("{} is a directory", path.display()),
            ));
        }

        let _ = state.entries.insert(
            path.to_path_buf(),
            Entry::File {
                mode,
                contents: Vec::new(),
            },
        );
        let fail_writes = state.fail_writes.contains(path);
        drop(state);

        Ok(Box::new(MemoryFile {
            path: path.to_path_buf(),
            state: Arc::clone(&self.state),
            fail_writes,
        }))
    }
}

struct MemoryFile {
    path: PathBuf,
    state: Arc<Mutex<State>>,
    fail_writes: bool,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(injected(&self.path));
        }
        let mut state = lock_state(&self.state);
        match state.entries.get_mut(&self.path) {
            Some(Entry::File { contents, .. }) => {
                contents.extend_from_slice(buf);
                Ok(buf.len())
            }
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} was removed", self.path.display()),
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryFile {
    fn drop(&mut self) {
        lock_state(&self.state).ops.push(FsOp::CloseFile {
            path: self.path.clone(),
        });
    }
}
