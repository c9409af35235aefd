//! Process backend abstraction.
//!
//! A backend runs one fully composed argument vector in a working directory
//! and reports success or failure. It never decides whether the root is
//! switched; [`crate::exec::Executor`] prepends `chroot`/`proot` before the
//! call reaches here.

use std::ffi::OsString;
use std::fmt::Debug;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};

use rootforge_common::error::{Result, RootforgeError};
use tracing::Span;

/// Runs a command and waits for it to finish.
///
/// Production code uses [`HostProcessBackend`]; tests substitute
/// [`crate::exec::FakeProcessBackend`].
pub trait ProcessBackend: Send + Sync + Debug {
    /// Runs `argv` (program followed by its arguments) with `working_dir` as
    /// the current directory. Output is reported inside `span`.
    ///
    /// # Errors
    ///
    /// Returns an error if `argv` is empty, the program cannot be started,
    /// or it exits unsuccessfully.
    fn run(&self, span: &Span, working_dir: &Path, argv: &[OsString]) -> Result<()>;
}

/// Backend that spawns real processes on the host.
///
/// Standard input is closed. Standard output lines are logged at info level
/// and standard error lines at warn level, both under the caller's span.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProcessBackend;

impl HostProcessBackend {
    /// Creates a host backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessBackend for HostProcessBackend {
    fn run(&self, span: &Span, working_dir: &Path, argv: &[OsString]) -> Result<()> {
        let (program, args) = argv.split_first().ok_or(RootforgeError::EmptyCommand)?;
        let program_name = program.to_string_lossy().into_owned();

        let mut child = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RootforgeError::Spawn {
                program: program_name.clone(),
                source: e,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        std::thread::scope(|scope| {
            if let Some(out) = stdout {
                let _ = scope.spawn(move || {
                    forward_lines(out, |line| tracing::info!(parent: span, stream = "stdout", "{line}"));
                });
            }
            if let Some(err) = stderr {
                forward_lines(err, |line| tracing::warn!(parent: span, stream = "stderr", "{line}"));
            }
        });

        let status = child.wait().map_err(|e| RootforgeError::Spawn {
            program: program_name,
            source: e,
        })?;
        if status.success() {
            return Ok(());
        }
        Err(RootforgeError::CommandFailed {
            command: command_line(argv),
            code: status.code().unwrap_or(-1),
        })
    }
}

/// Space-joins an argument vector for log and error messages.
pub(crate) fn command_line(argv: &[OsString]) -> String {
    argv.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

fn forward_lines<R: Read>(reader: R, mut emit: impl FnMut(&str)) {
    for line in BufReader::new(reader).lines().map_while(std::io::Result::ok) {
        emit(&line);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<OsString> {
        parts.iter().map(OsString::from).collect()
    }

    #[test]
    fn run_succeeds_on_zero_exit() {
        let backend = HostProcessBackend::new();
        backend
            .run(&Span::none(), Path::new("."), &argv(&["true"]))
            .expect("true should succeed");
    }

    #[test]
    fn run_reports_non_zero_exit() {
        let backend = HostProcessBackend::new();
        let err = backend
            .run(&Span::none(), Path::new("."), &argv(&["sh", "-c", "exit 3"]))
            .unwrap_err();
        assert!(matches!(
            err,
            RootforgeError::CommandFailed { ref command, code: 3 } if command == "sh -c exit 3"
        ));
    }

    #[test]
    fn run_reports_spawn_failure() {
        let backend = HostProcessBackend::new();
        let err = backend
            .run(
                &Span::none(),
                Path::new("."),
                &argv(&["/nonexistent/rootforge-test-binary"]),
            )
            .unwrap_err();
        assert!(matches!(err, RootforgeError::Spawn { .. }));
    }

    #[test]
    fn run_rejects_empty_argv() {
        let backend = HostProcessBackend::new();
        let err = backend.run(&Span::none(), Path::new("."), &[]).unwrap_err();
        assert!(matches!(err, RootforgeError::EmptyCommand));
    }

    #[test]
    fn run_uses_working_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("marker"), b"").expect("write marker");
        let backend = HostProcessBackend::new();
        backend
            .run(&Span::none(), dir.path(), &argv(&["test", "-f", "marker"]))
            .expect("marker should be visible from working dir");
    }

    #[test]
    fn run_drains_large_output_without_blocking() {
        let backend = HostProcessBackend::new();
        backend
            .run(
                &Span::none(),
                Path::new("."),
                &argv(&["sh", "-c", "i=0; while [ $i -lt 5000 ]; do echo out $i; echo err $i >&2; i=$((i+1)); done"]),
            )
            .expect("chatty command should finish");
    }

    #[test]
    fn command_line_joins_arguments() {
        assert_eq!(command_line(&argv(&["chroot", "/img", "ls"])), "chroot /img ls");
    }
}
