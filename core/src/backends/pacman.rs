//! Pacman backend for Arch-family distributions.

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::backends::run_capture;
use crate::backends::run_streaming;
use crate::error::Result;
use crate::search::PackageHit;

pub struct PacmanBackend;

impl PacmanBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PacmanBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// `pacman -Ss` alternates `repo/name version` lines with indented
/// description lines.
fn parse_search_output(output: &str) -> Vec<PackageHit> {
    let mut hits = Vec::new();
    let mut pending: Option<(String, String)> = None;

    for line in output.lines() {
        if line.starts_with(' ') {
            if let Some((name, version)) = pending.take() {
                hits.push(
                    PackageHit::new(name, "pacman")
                        .with_version(version)
                        .with_description(line.trim()),
                );
            }
        } else {
            let mut parts = line.split_whitespace();
            if let (Some(name_part), Some(version)) = (parts.next(), parts.next()) {
                let name = name_part.rsplit('/').next().unwrap_or(name_part);
                pending = Some((name.to_string(), version.to_string()));
            }
        }
    }

    hits
}

#[async_trait]
impl Backend for PacmanBackend {
    fn name(&self) -> &'static str {
        "pacman"
    }

    fn is_available(&self) -> bool {
        command_exists("pacman")
    }

    async fn search(&self, query: &str) -> Result<Vec<PackageHit>> {
        let output = run_capture("pacman", &["-Ss", query]).await?;
        Ok(parse_search_output(&output))
    }

    async fn install(&self, package: &str) -> Result<()> {
        run_streaming("sudo", &["pacman", "-S", "--noconfirm", package]).await
    }

    async fn update(&self, package: &str) -> Result<()> {
        // Reinstalling from the sync db pulls the latest version.
        self.install(package).await
    }

    async fn uninstall(&self, package: &str) -> Result<()> {
        run_streaming("sudo", &["pacman", "-Rns", "--noconfirm", package]).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn pairs_header_and_description_lines() {
        let output = "\
extra/ripgrep 14.1.0-1
    A search tool that combines the usability of ag with the raw speed of grep
core/grep 3.11-1
    A string search utility
";
        let hits = parse_search_output(output);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "ripgrep");
        assert_eq!(hits[0].version.as_deref(), Some("14.1.0-1"));
        assert_eq!(hits[1].name, "grep");
    }
}
