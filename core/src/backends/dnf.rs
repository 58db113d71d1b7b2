//! DNF backend for Fedora-family distributions.

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::backends::run_capture;
use crate::backends::run_streaming;
use crate::error::Result;
use crate::search::PackageHit;

pub struct DnfBackend;

impl DnfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DnfBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// `dnf search` prints `name.arch : summary` lines.
fn parse_search_output(output: &str) -> Vec<PackageHit> {
    output
        .lines()
        .filter_map(|line| {
            let (name_part, description) = line.split_once(" : ")?;
            let name_part = name_part.trim();
            let name = name_part.split('.').next().unwrap_or(name_part);
            Some(
                PackageHit::new(name, "dnf")
                    .with_version("latest")
                    .with_description(description.trim()),
            )
        })
        .collect()
}

#[async_trait]
impl Backend for DnfBackend {
    fn name(&self) -> &'static str {
        "dnf"
    }

    fn is_available(&self) -> bool {
        command_exists("dnf")
    }

    async fn search(&self, query: &str) -> Result<Vec<PackageHit>> {
        let output = run_capture("dnf", &["search", query]).await?;
        Ok(parse_search_output(&output))
    }

    async fn install(&self, package: &str) -> Result<()> {
        run_streaming("sudo", &["dnf", "install", "-y", package]).await
    }

    async fn update(&self, package: &str) -> Result<()> {
        run_streaming("sudo", &["dnf", "upgrade", "-y", package]).await
    }

    async fn uninstall(&self, package: &str) -> Result<()> {
        run_streaming("sudo", &["dnf", "remove", "-y", package]).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn strips_arch_suffix_from_name() {
        let hits = parse_search_output("ripgrep.x86_64 : Line oriented search tool");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "ripgrep");
        assert_eq!(
            hits[0].description.as_deref(),
            Some("Line oriented search tool")
        );
    }
}
