//! Shim script generation.

use std::path::Path;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::config::find_data_dir;
use crate::error::Result;

pub fn shim_dir() -> Result<PathBuf> {
    Ok(find_data_dir()?.join("shims"))
}

pub fn ensure_shim_dir() -> Result<PathBuf> {
    let dir = shim_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Write a shim for `binary_name` pointing at `target`, returning the
/// shim's path.
pub fn create_shim(binary_name: &str, target: &Path) -> Result<PathBuf> {
    let dir = ensure_shim_dir()?;

    #[cfg(windows)]
    {
        create_windows_shim(&dir, binary_name, target)
    }

    #[cfg(not(windows))]
    {
        create_unix_shim(&dir, binary_name, target)
    }
}

#[cfg(not(windows))]
fn create_unix_shim(dir: &Path, binary_name: &str, target: &Path) -> Result<PathBuf> {
    let shim_path = dir.join(binary_name);
    let script = format!(
        "#!/bin/sh\n# 1install shim for {binary_name}\nexec \"{}\" \"$@\"\n",
        target.display()
    );
    std::fs::write(&shim_path, script)?;

    let mut perms = std::fs::metadata(&shim_path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&shim_path, perms)?;

    Ok(shim_path)
}

/// Windows gets a `.cmd` and a `.ps1` so the shim resolves from both
/// cmd.exe and PowerShell.
#[cfg(windows)]
fn create_windows_shim(dir: &Path, binary_name: &str, target: &Path) -> Result<PathBuf> {
    let cmd_path = dir.join(format!("{binary_name}.cmd"));
    let cmd_script = format!(
        "@echo off\r\nrem 1install shim for {binary_name}\r\n\"{}\" %*\r\n",
        target.display()
    );
    std::fs::write(&cmd_path, cmd_script)?;

    let ps1_path = dir.join(format!("{binary_name}.ps1"));
    let ps1_script = format!(
        "# 1install shim for {binary_name}\n& \"{}\" $args\n",
        target.display()
    );
    std::fs::write(&ps1_path, ps1_script)?;

    Ok(cmd_path)
}

/// One-time PATH setup instructions for the user's shell.
pub fn path_instruction() -> Result<String> {
    let dir = shim_dir()?;
    let dir = dir.display();

    #[cfg(windows)]
    {
        Ok(format!(
            "Add this to your PATH (one-time setup):\n\n\
             PowerShell (add to $PROFILE):\n    $env:PATH = \"{dir};$env:PATH\"\n\n\
             Or add permanently via System Properties > Environment Variables\n"
        ))
    }

    #[cfg(not(windows))]
    {
        Ok(format!(
            "Add this to your shell config (one-time setup):\n\n\
             bash (~/.bashrc):\n    export PATH=\"{dir}:$PATH\"\n\n\
             zsh (~/.zshrc):\n    export PATH=\"{dir}:$PATH\"\n\n\
             fish (~/.config/fish/config.fish):\n    set -gx PATH {dir} $PATH\n"
        ))
    }
}
