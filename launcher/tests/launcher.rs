//! End-to-end tests for the delegating launcher.
//!
//! The launcher resolves its sibling relative to its own location, so
//! each test copies the built binary into a fresh directory and controls
//! what sits next to it.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use predicates::str::contains;
use tempfile::TempDir;

fn copy_launcher_into(dir: &Path) -> Result<PathBuf> {
    let built = PathBuf::from(env!("CARGO_BIN_EXE_oneinstall-launcher"));
    let dest = dir.join(built.file_name().expect("binary has a file name"));
    std::fs::copy(&built, &dest)?;
    Ok(dest)
}

/// Install a scripted `1i` next to the launcher that records its argv to
/// `ARGS_FILE` and exits with `FAKE_EXIT`.
#[cfg(unix)]
fn install_fake_sibling(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let script = "#!/bin/sh\n\
                  : \"${ARGS_FILE:?}\"\n\
                  for arg in \"$@\"; do printf '%s\\n' \"$arg\"; done > \"$ARGS_FILE\"\n\
                  exit \"${FAKE_EXIT:-0}\"\n";
    let path = dir.join("1i");
    std::fs::write(&path, script)?;
    let mut perms = std::fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms)?;
    Ok(())
}

#[test]
fn missing_sibling_reports_path_and_exits_1() -> Result<()> {
    let dir = TempDir::new()?;
    let launcher = copy_launcher_into(dir.path())?;

    let expected_path = dir.path().canonicalize()?.join(if cfg!(windows) {
        "1i.exe"
    } else {
        "1i"
    });

    assert_cmd::Command::new(launcher)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("1install binary not found"))
        .stderr(contains(expected_path.display().to_string()));

    Ok(())
}

#[cfg(unix)]
#[test]
fn forwards_arguments_verbatim_and_in_order() -> Result<()> {
    let dir = TempDir::new()?;
    let launcher = copy_launcher_into(dir.path())?;
    install_fake_sibling(dir.path())?;

    let args_file = dir.path().join("argv.txt");
    assert_cmd::Command::new(launcher)
        .args(["install", "--force"])
        .env("ARGS_FILE", &args_file)
        .assert()
        .success();

    let recorded = std::fs::read_to_string(&args_file)?;
    assert_eq!(recorded, "install\n--force\n");
    Ok(())
}

#[cfg(unix)]
#[test]
fn empty_argument_vector_stays_empty() -> Result<()> {
    let dir = TempDir::new()?;
    let launcher = copy_launcher_into(dir.path())?;
    install_fake_sibling(dir.path())?;

    let args_file = dir.path().join("argv.txt");
    assert_cmd::Command::new(launcher)
        .env("ARGS_FILE", &args_file)
        .assert()
        .success()
        .code(0);

    assert_eq!(std::fs::read_to_string(&args_file)?, "");
    Ok(())
}

#[cfg(unix)]
#[test]
fn propagates_child_exit_code() -> Result<()> {
    let dir = TempDir::new()?;
    let launcher = copy_launcher_into(dir.path())?;
    install_fake_sibling(dir.path())?;

    assert_cmd::Command::new(launcher)
        .env("ARGS_FILE", dir.path().join("argv.txt"))
        .env("FAKE_EXIT", "42")
        .assert()
        .code(42);

    Ok(())
}

#[cfg(unix)]
#[test]
fn sibling_lookup_ignores_working_directory() -> Result<()> {
    let dir = TempDir::new()?;
    let launcher = copy_launcher_into(dir.path())?;
    install_fake_sibling(dir.path())?;

    // Run from an unrelated directory that contains no `1i`; the sibling
    // next to the launcher must still be found.
    let elsewhere = TempDir::new()?;
    let args_file = dir.path().join("argv.txt");
    assert_cmd::Command::new(launcher)
        .current_dir(elsewhere.path())
        .arg("doctor")
        .env("ARGS_FILE", &args_file)
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&args_file)?, "doctor\n");
    Ok(())
}
