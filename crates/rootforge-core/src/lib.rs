//! # rootforge-core
//!
//! Primitives used while assembling a container root filesystem:
//! - **Exec**: run a command in the current root, or switched into the image
//!   root with `chroot(8)` or user-space `proot(1)` emulation.
//! - **Supervision**: materialize an s6 supervision tree (`sv/<name>/run`)
//!   from a set of service commands.
//!
//! Process spawning and filesystem mutation sit behind the
//! [`exec::ProcessBackend`] and [`supervision::FileSystem`] traits so both
//! halves can be driven by recording fakes in tests.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod exec;
pub mod supervision;
