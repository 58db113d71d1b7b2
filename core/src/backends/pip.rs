//! pip/pipx backend for Python packages.
//!
//! pipx is preferred when present: globally installed CLI tools belong in
//! isolated venvs. Plain pip installs fall back to `--user`.

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::backends::run_capture;
use crate::backends::run_streaming;
use crate::error::Result;
use crate::search::PackageHit;

pub struct PipBackend {
    use_pipx: bool,
}

impl PipBackend {
    pub fn new() -> Self {
        Self {
            use_pipx: command_exists("pipx"),
        }
    }

    fn pip_command(&self) -> &'static str {
        if command_exists("pip3") { "pip3" } else { "pip" }
    }
}

impl Default for PipBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `pip index versions` output. PyPI removed `pip search`, so this
/// only ever describes the exact package asked about.
fn parse_index_output(output: &str) -> Vec<PackageHit> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let name = name.trim_matches(|c| c == '(' || c == ')');
            let mut hit = PackageHit::new(name, "pip");
            if let Some(version) = parts.next() {
                hit = hit.with_version(version.trim_matches(|c| c == '(' || c == ')'));
            }
            Some(hit)
        })
        .collect()
}

#[async_trait]
impl Backend for PipBackend {
    fn name(&self) -> &'static str {
        if self.use_pipx { "pipx" } else { "pip" }
    }

    fn is_available(&self) -> bool {
        command_exists("pip") || command_exists("pip3") || command_exists("pipx")
    }

    async fn search(&self, query: &str) -> Result<Vec<PackageHit>> {
        match run_capture(self.pip_command(), &["index", "versions", query]).await {
            Ok(output) => Ok(parse_index_output(&output)),
            // The index lookup fails for unknown packages; report the bare
            // query so install-by-name still gets suggested.
            Err(_) => Ok(vec![PackageHit::new(query, "pip")]),
        }
    }

    async fn install(&self, package: &str) -> Result<()> {
        if self.use_pipx {
            run_streaming("pipx", &["install", package]).await
        } else {
            run_streaming(self.pip_command(), &["install", "--user", package]).await
        }
    }

    async fn update(&self, package: &str) -> Result<()> {
        if self.use_pipx {
            run_streaming("pipx", &["upgrade", package]).await
        } else {
            run_streaming(
                self.pip_command(),
                &["install", "--user", "--upgrade", package],
            )
            .await
        }
    }

    async fn uninstall(&self, package: &str) -> Result<()> {
        if self.use_pipx {
            run_streaming("pipx", &["uninstall", package]).await
        } else {
            run_streaming(self.pip_command(), &["uninstall", "-y", package]).await
        }
    }
}
