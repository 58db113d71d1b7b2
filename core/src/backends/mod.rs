//! Package-manager backends.
//!
//! Each backend wraps one native package manager. `1i` shells out to the
//! real tool with inherited stdio, so interactive prompts and progress
//! bars behave exactly as they would when the tool is run by hand.

mod apt;
mod brew;
mod cargo;
mod dnf;
mod flatpak;
mod git;
mod go;
mod npm;
mod pacman;
mod pip;
mod snap;
mod winget;

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

pub use apt::AptBackend;
pub use brew::BrewBackend;
pub use cargo::CargoBackend;
pub use dnf::DnfBackend;
pub use flatpak::FlatpakBackend;
pub use git::GitBackend;
pub use go::GoBackend;
pub use npm::NpmBackend;
pub use pacman::PacmanBackend;
pub use pip::PipBackend;
pub use snap::SnapBackend;
pub use winget::WingetBackend;

use crate::context::LinuxDistro;
use crate::context::OsContext;
use crate::context::OsType;
use crate::error::Error;
use crate::error::Result;
use crate::search::PackageHit;

#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the underlying tool is present on this system.
    fn is_available(&self) -> bool;

    async fn search(&self, query: &str) -> Result<Vec<PackageHit>>;

    async fn install(&self, package: &str) -> Result<()>;

    async fn update(&self, package: &str) -> Result<()>;

    async fn uninstall(&self, package: &str) -> Result<()>;
}

/// Pick the backend that matches the detected OS.
pub fn backend_for_context(context: &OsContext) -> Result<Box<dyn Backend>> {
    match &context.os_type {
        OsType::Windows => Ok(Box::new(WingetBackend::new())),
        OsType::MacOs => Ok(Box::new(BrewBackend::new())),
        OsType::Linux { distro } => match distro {
            LinuxDistro::Debian => Ok(Box::new(AptBackend::new())),
            LinuxDistro::Arch => Ok(Box::new(PacmanBackend::new())),
            LinuxDistro::Fedora => Ok(Box::new(DnfBackend::new())),
            LinuxDistro::Unknown => {
                let apt = AptBackend::new();
                if apt.is_available() {
                    Ok(Box::new(apt))
                } else {
                    Err(Error::UnsupportedPlatform)
                }
            }
        },
        OsType::Unknown => Err(Error::UnsupportedPlatform),
    }
}

pub fn all_backends() -> Vec<Box<dyn Backend>> {
    vec![
        Box::new(WingetBackend::new()),
        Box::new(AptBackend::new()),
        Box::new(BrewBackend::new()),
        Box::new(DnfBackend::new()),
        Box::new(PacmanBackend::new()),
        Box::new(SnapBackend::new()),
        Box::new(FlatpakBackend::new()),
        Box::new(NpmBackend::new()),
        Box::new(PipBackend::new()),
        Box::new(CargoBackend::new()),
        Box::new(GoBackend::new()),
        Box::new(GitBackend::new()),
    ]
}

/// Backends that are both installed and not disabled in config.
pub fn available_backends(disabled: &[String]) -> Vec<Box<dyn Backend>> {
    all_backends()
        .into_iter()
        .filter(|b| b.is_available() && !disabled.iter().any(|d| d == b.name()))
        .collect()
}

pub(crate) fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Run a command and capture stdout, for search-style queries.
pub(crate) async fn run_capture(program: &str, args: &[&str]) -> Result<String> {
    debug!("capturing output of {program} {args:?}");
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        debug!(
            "{program} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
        Err(Error::CommandFailed {
            program: program.to_string(),
            code: output.status.code(),
        })
    }
}

/// Run a command with inherited stdio, for install-style operations.
///
/// The rendered command line is echoed first so the user can see exactly
/// what is being run on their behalf.
pub(crate) async fn run_streaming(program: &str, args: &[&str]) -> Result<()> {
    run_streaming_env(program, args, &[]).await
}

pub(crate) async fn run_streaming_env(
    program: &str,
    args: &[&str],
    envs: &[(&str, &str)],
) -> Result<()> {
    println!("   Running: {program} {}", args.join(" "));
    debug!("spawning {program} {args:?}");

    let mut command = Command::new(program);
    command.args(args);
    for (key, value) in envs {
        command.env(key, value);
    }
    let status = command.status().await.map_err(|source| Error::Spawn {
        program: program.to_string(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            program: program.to_string(),
            code: status.code(),
        })
    }
}

/// Whether the current process runs as root (sudo can be skipped).
pub(crate) fn is_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_backends_have_unique_names() {
        let backends = all_backends();
        let mut names: Vec<&str> = backends.iter().map(|b| b.name()).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn disabled_backends_are_filtered() {
        let disabled: Vec<String> = all_backends()
            .iter()
            .map(|b| b.name().to_string())
            .collect();
        assert!(available_backends(&disabled).is_empty());
    }
}
