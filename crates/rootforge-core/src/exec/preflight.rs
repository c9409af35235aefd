//! Host checks performed before entering an image root.

use std::path::{Path, PathBuf};

use rootforge_common::error::{Result, RootforgeError};

/// Resolves a root-switch tool to an executable path.
///
/// Absolute paths are checked as-is; bare names are looked up on `PATH`.
///
/// # Errors
///
/// Returns [`RootforgeError::NotFound`] if the tool cannot be found.
pub fn resolve_tool(tool: &Path) -> Result<PathBuf> {
    which::which(tool).map_err(|_| RootforgeError::NotFound {
        kind: "tool",
        id: tool.display().to_string(),
    })
}

/// Checks that the current process may perform a privileged root switch.
///
/// # Errors
///
/// Returns [`RootforgeError::PermissionDenied`] when the effective user is
/// not root.
#[cfg(unix)]
pub fn ensure_privileged() -> Result<()> {
    if nix::unistd::geteuid().is_root() {
        return Ok(());
    }
    Err(RootforgeError::PermissionDenied {
        message: "chroot requires root; enable root emulation to run unprivileged".into(),
    })
}

/// Stub for non-Unix platforms.
///
/// # Errors
///
/// Always returns an error: `chroot` requires a Unix host.
#[cfg(not(unix))]
pub fn ensure_privileged() -> Result<()> {
    Err(RootforgeError::PermissionDenied {
        message: "chroot requires a Unix host".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_tool_reports_missing_binary() {
        let err = resolve_tool(Path::new("rootforge-no-such-tool")).unwrap_err();
        assert!(matches!(err, RootforgeError::NotFound { kind: "tool", .. }));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_tool_finds_shell() {
        let path = resolve_tool(Path::new("sh")).expect("sh on PATH");
        assert!(path.is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn ensure_privileged_matches_effective_uid() {
        let is_root = nix::unistd::geteuid().is_root();
        assert_eq!(ensure_privileged().is_ok(), is_root);
    }
}
