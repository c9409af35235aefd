//! Recording process backend for tests.
//!
//! Clones share state, so a test keeps one handle for inspection and hands
//! another to the [`crate::exec::Executor`].

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rootforge_common::error::{Result, RootforgeError};
use tracing::Span;

use super::backend::ProcessBackend;

type ErrorFactory = Arc<dyn Fn() -> RootforgeError + Send + Sync>;

/// One call observed by [`FakeProcessBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRun {
    /// Working directory passed to the backend.
    pub working_dir: PathBuf,
    /// Exact argument vector passed to the backend.
    pub argv: Vec<OsString>,
}

impl RecordedRun {
    /// Argument vector as lossy UTF-8 strings, for assertions.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        self.argv
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

#[derive(Default)]
struct FakeState {
    runs: Vec<RecordedRun>,
    failure: Option<ErrorFactory>,
}

/// Backend that records every run and returns a configurable result.
#[derive(Clone, Default)]
pub struct FakeProcessBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProcessBackend {
    /// Creates a backend whose runs all succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent run fail with the error built by `make_error`.
    pub fn run_returns_error<F>(&self, make_error: F)
    where
        F: Fn() -> RootforgeError + Send + Sync + 'static,
    {
        self.lock().failure = Some(Arc::new(make_error));
    }

    /// Makes every subsequent run succeed.
    pub fn run_returns_ok(&self) {
        self.lock().failure = None;
    }

    /// All runs observed so far, oldest first.
    #[must_use]
    pub fn runs(&self) -> Vec<RecordedRun> {
        self.lock().runs.clone()
    }

    /// Number of runs observed so far.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.lock().runs.len()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for FakeProcessBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("FakeProcessBackend")
            .field("runs", &state.runs)
            .field("fails", &state.failure.is_some())
            .finish()
    }
}

impl ProcessBackend for FakeProcessBackend {
    fn run(&self, _span: &Span, working_dir: &Path, argv: &[OsString]) -> Result<()> {
        let mut state = self.lock();
        state.runs.push(RecordedRun {
            working_dir: working_dir.to_path_buf(),
            argv: argv.to_vec(),
        });
        state.failure.as_ref().map_or(Ok(()), |make| Err(make()))
    }
}
