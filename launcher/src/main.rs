//! Delegating launcher for the `1i` binary.
//!
//! This executable ships next to the real `1i` binary and does exactly
//! one thing: forward its argument vector to that sibling and mirror the
//! sibling's exit code. The sibling is looked up in the launcher's own
//! directory (symlinks resolved), never the working directory, and there
//! is no search-path fallback.

use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::ExitStatus;

fn sibling_binary_name() -> &'static str {
    if cfg!(windows) { "1i.exe" } else { "1i" }
}

fn sibling_path(launcher_dir: &Path) -> PathBuf {
    launcher_dir.join(sibling_binary_name())
}

/// The directory containing this executable, with symlinks resolved so
/// the sibling is found next to the real file.
fn launcher_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?.canonicalize()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory")
    })
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    // No exit code means the child died to a signal; report it the way a
    // shell would.
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

fn run() -> i32 {
    let dir = match launcher_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("Error: could not resolve launcher location: {err}");
            return 1;
        }
    };

    let bin_path = sibling_path(&dir);
    if !bin_path.exists() {
        eprintln!("Error: 1install binary not found at {}", bin_path.display());
        return 1;
    }

    match Command::new(&bin_path).args(std::env::args_os().skip(1)).status() {
        Ok(status) => exit_code(status),
        Err(err) => {
            eprintln!("Error: failed to launch {}: {err}", bin_path.display());
            1
        }
    }
}

fn main() {
    std::process::exit(run());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_name_is_platform_suffixed() {
        if cfg!(windows) {
            assert_eq!(sibling_binary_name(), "1i.exe");
        } else {
            assert_eq!(sibling_binary_name(), "1i");
        }
    }

    #[test]
    fn sibling_path_is_rooted_at_given_dir() {
        let path = sibling_path(Path::new("/opt/oneinstall"));
        assert_eq!(path.parent(), Some(Path::new("/opt/oneinstall")));
        assert!(
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("1i"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_passes_through_child_code() {
        use std::os::unix::process::ExitStatusExt;

        // Wait statuses encode the exit code in the high byte.
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(ExitStatus::from_raw(42 << 8)), 42);
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_encodes_fatal_signals() {
        use std::os::unix::process::ExitStatusExt;

        // Raw status 9 = killed by SIGKILL.
        assert_eq!(exit_code(ExitStatus::from_raw(9)), 137);
    }
}
