//! Executor behaviour with the recording backend and the host backend.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use rootforge_common::config::RootforgeConfig;
use rootforge_common::error::RootforgeError;
use rootforge_core::exec::{
    Executor, ExecutorOption, FakeProcessBackend, with_backend, with_exec_config,
    with_root_emulation,
};
use tracing::Span;

fn synthetic_failure() -> RootforgeError {
    RootforgeError::Spawn {
        program: "command".into(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    }
}

#[test]
fn new_succeeds_without_options() {
    let executor = Executor::new(".", Span::none(), Vec::new());
    assert!(executor.is_ok());
}

#[test]
fn new_fails_with_failing_option() {
    let bad: ExecutorOption = Box::new(|_: &mut Executor| {
        Err(RootforgeError::Config {
            message: "synth error".into(),
        })
    });
    let err = Executor::new(".", Span::none(), vec![bad]).unwrap_err();
    assert_eq!(err.to_string(), "invalid configuration: synth error");
}

#[test]
fn execute_surfaces_backend_failure_in_both_modes() {
    let fake = FakeProcessBackend::new();
    fake.run_returns_error(synthetic_failure);
    let mut executor = Executor::new(".", Span::none(), [with_backend(fake.clone())]).unwrap();

    for emulated in [false, true] {
        executor.set_use_root_emulation(emulated);
        let err = executor.execute(&["command"]).unwrap_err();
        assert!(matches!(err, RootforgeError::Spawn { ref program, .. } if program == "command"));
    }
    assert_eq!(fake.run_count(), 2);
}

#[test]
fn execute_chroot_surfaces_backend_failure_in_both_modes() {
    let fake = FakeProcessBackend::new();
    fake.run_returns_error(synthetic_failure);
    let mut executor = Executor::new(".", Span::none(), [with_backend(fake.clone())]).unwrap();

    for emulated in [false, true] {
        executor.set_use_root_emulation(emulated);
        let err = executor.execute_chroot(&["command"]).unwrap_err();
        assert!(matches!(err, RootforgeError::Spawn { .. }));
    }
}

#[test]
fn execute_succeeds_when_backend_succeeds_in_both_modes() {
    let fake = FakeProcessBackend::new();
    let mut executor = Executor::new(".", Span::none(), [with_backend(fake.clone())]).unwrap();

    for emulated in [false, true] {
        executor.set_use_root_emulation(emulated);
        executor.execute(&["command"]).expect("execute");
        executor.execute_chroot(&["command"]).expect("execute_chroot");
    }
    assert_eq!(fake.run_count(), 4);
}

#[test]
fn config_file_drives_root_switch_strategy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rootforge.json");
    std::fs::write(
        &path,
        r#"{"work_dir": "/build/rootfs", "exec": {"use_root_emulation": true}}"#,
    )
    .unwrap();
    let config = RootforgeConfig::load(&path).unwrap();

    let fake = FakeProcessBackend::new();
    let executor = Executor::new(
        config.work_dir.clone(),
        Span::none(),
        [with_backend(fake.clone()), with_exec_config(config.exec)],
    )
    .unwrap();
    executor
        .execute_chroot(&["/sbin/ldconfig"])
        .expect("execute_chroot");

    let run = &fake.runs()[0];
    assert_eq!(run.working_dir, PathBuf::from("/build/rootfs"));
    assert_eq!(run.args(), vec!["proot", "-S", "/build/rootfs", "/sbin/ldconfig"]);
}

#[test]
fn preflight_reports_missing_emulation_tool() {
    let config = rootforge_common::config::ExecConfig {
        use_root_emulation: true,
        proot_binary: PathBuf::from("rootforge-missing-proot"),
        ..Default::default()
    };
    let executor = Executor::new(".", Span::none(), [with_exec_config(config)]).unwrap();
    let err = executor.preflight().unwrap_err();
    assert!(matches!(err, RootforgeError::NotFound { kind: "tool", .. }));
}

#[cfg(unix)]
#[test]
fn host_backend_runs_in_working_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let executor = Executor::new(dir.path(), Span::none(), [with_root_emulation(false)]).unwrap();

    executor.execute(&["touch", "created-by-executor"]).expect("touch");
    assert!(dir.path().join("created-by-executor").exists());
}

#[cfg(unix)]
#[test]
fn host_backend_reports_exit_code() {
    let executor = Executor::new(".", Span::none(), Vec::new()).unwrap();
    let err = executor.execute(&["sh", "-c", "exit 4"]).unwrap_err();
    assert!(matches!(err, RootforgeError::CommandFailed { code: 4, .. }));
}

#[cfg(unix)]
#[test]
fn execute_chroot_with_relative_root_enters_working_directory() {
    use std::os::unix::fs::PermissionsExt;

    let tools = tempfile::tempdir().expect("tools dir");
    let stub = tools.path().join("stub-chroot");
    std::fs::write(
        &stub,
        "#!/bin/sh\n[ \"$(cd \"$1\" && pwd -P)\" = \"$(pwd -P)\" ]\n",
    )
    .unwrap();
    std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();

    let rootfs = tempfile::tempdir_in(".").expect("relative rootfs");
    let relative = PathBuf::from(rootfs.path().file_name().unwrap());
    assert!(relative.is_relative());

    let config = rootforge_common::config::ExecConfig {
        chroot_binary: stub,
        ..Default::default()
    };
    let executor = Executor::new(&relative, Span::none(), [with_exec_config(config)]).unwrap();

    executor
        .execute_chroot(&["/bin/true"])
        .expect("stub should see the working directory as root");
}
