use std::path::Path;

use anyhow::Result;
use predicates::str::contains;
use tempfile::TempDir;

fn oneinstall_command(home: &Path) -> Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("oneinstall")?;
    cmd.env("ONEINSTALL_HOME", home);
    Ok(cmd)
}

#[test]
fn shims_list_is_empty_on_fresh_home() -> Result<()> {
    let home = TempDir::new()?;

    let mut cmd = oneinstall_command(home.path())?;
    cmd.args(["shims", "list"])
        .assert()
        .success()
        .stdout(contains("No shims registered."));

    Ok(())
}

#[test]
fn shims_path_is_rooted_at_oneinstall_home() -> Result<()> {
    let home = TempDir::new()?;

    let mut cmd = oneinstall_command(home.path())?;
    cmd.args(["shims", "path"])
        .assert()
        .success()
        .stdout(contains(home.path().display().to_string()))
        .stdout(contains("shims"));

    Ok(())
}

#[test]
fn shims_setup_prints_path_instructions() -> Result<()> {
    let home = TempDir::new()?;

    let mut cmd = oneinstall_command(home.path())?;
    cmd.args(["shims", "setup"])
        .assert()
        .success()
        .stdout(contains("PATH"));

    Ok(())
}

#[test]
fn shims_refresh_on_empty_registry_reports_zero() -> Result<()> {
    let home = TempDir::new()?;

    let mut cmd = oneinstall_command(home.path())?;
    cmd.args(["shims", "refresh"])
        .assert()
        .success()
        .stdout(contains("Regenerated 0 shims, pruned 0."));

    Ok(())
}
