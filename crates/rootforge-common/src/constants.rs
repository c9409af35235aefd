//! On-disk protocol constants and default tool names.

/// Base directory of the supervision tree, relative to the image root.
pub const SUPERVISION_DIR: &str = "sv";

/// File name of a service's run script inside its supervision directory.
pub const RUN_FILE: &str = "run";

/// Interpreter line written at the top of every run script.
pub const RUN_SCRIPT_SHEBANG: &str = "#!/bin/execlineb";

/// Mode applied to each supervision directory.
pub const SUPERVISION_DIR_MODE: u32 = 0o777;

/// Mode applied to each run script.
pub const RUN_FILE_MODE: u32 = 0o755;

/// Default user-space root emulation tool.
pub const DEFAULT_PROOT_BINARY: &str = "proot";

/// Default privileged root switch tool.
pub const DEFAULT_CHROOT_BINARY: &str = "chroot";

/// Application name used in CLI output.
pub const APP_NAME: &str = "rootforge";
