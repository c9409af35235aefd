//! s6 supervision tree generation.
//!
//! Produces the static files an s6 init consumes at boot: one
//! `sv/<name>/` directory per service holding an execline `run` script.
//! Dependency ordering, readiness and oneshot services are left to callers.

pub mod context;
pub mod fs;
pub mod memory;

pub use context::{SupervisionContext, run_script};
pub use fs::{FileSystem, HostFileSystem};
pub use memory::{FsOp, MemoryFileSystem};
