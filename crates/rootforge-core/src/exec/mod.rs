//! Command execution, optionally inside an image root.
//!
//! The [`Executor`] decides *when* and *how* the root is switched; the
//! [`ProcessBackend`] only runs the exact argument vector it is handed.

pub mod backend;
pub mod executor;
pub mod fake;
pub mod preflight;

pub use backend::{HostProcessBackend, ProcessBackend};
pub use executor::{Executor, ExecutorOption, with_backend, with_exec_config, with_root_emulation};
pub use fake::{FakeProcessBackend, RecordedRun};
