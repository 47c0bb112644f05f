use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

/// Writes a config whose steps append their name to `steps.log`.
/// `{log}` in the templates expands to that log path.
fn write_config(dir: &Path, unmount: &str, mount: &str) -> std::path::PathBuf {
    let log = dir.join("steps.log").display().to_string();
    let config = dir.join("config.toml");
    fs::write(
        &config,
        format!(
            r#"[timing]
pause_secs = 0

[commands]
unmount = "{unmount}"
sync = "echo sync >> '{log}'"
mount = "{mount}"
"#,
            unmount = unmount.replace("{log}", &log),
            mount = mount.replace("{log}", &log),
            log = log,
        ),
    )
    .unwrap();
    config
}

#[test]
fn test_remount_runs_all_steps_in_order() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "echo unmount >> '{log}'", "echo mount >> '{log}'");

    let output = Command::new(env!("CARGO_BIN_EXE_usbshare"))
        .args(["remount", "--config"])
        .arg(&config)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let log = fs::read_to_string(dir.path().join("steps.log")).unwrap();
    assert_eq!(log, "unmount\nsync\nmount\n");
}

#[test]
fn test_remount_failure_still_runs_later_steps_and_exits_nonzero() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "echo unmount >> '{log}'; false",
        "echo mount >> '{log}'; exit 4",
    );
    let log_path = dir.path().join("steps.log");

    let output = Command::new(env!("CARGO_BIN_EXE_usbshare"))
        .args(["--json", "remount", "--config"])
        .arg(&config)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let log = fs::read_to_string(&log_path).unwrap();
    assert_eq!(log, "unmount\nsync\nmount\n");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let failed: Vec<_> = stdout
        .lines()
        .filter(|l| l.contains("\"event\":\"step_failed\""))
        .collect();
    assert_eq!(failed.len(), 2, "stdout:\n{}", stdout);
    assert!(failed[0].contains("\"step\":\"unmount\""));
    assert!(failed[1].contains("\"step\":\"mount\""));
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.first().unwrap()["event"], "resync_started");
    assert_eq!(events.first().unwrap()["quiet_ms"], 0);
    let last = events.last().unwrap();
    assert_eq!(last["event"], "resync_complete");
    assert_eq!(last["failed_steps"], 2);
}
