//! Homebrew backend for macOS (and Linuxbrew).

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::backends::run_capture;
use crate::backends::run_streaming;
use crate::error::Result;
use crate::search::PackageHit;

pub struct BrewBackend;

impl BrewBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BrewBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// `brew search` prints bare formula names, with `==>` section headers.
fn parse_search_output(output: &str) -> Vec<PackageHit> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("==>"))
        .map(|line| PackageHit::new(line, "brew"))
        .collect()
}

#[async_trait]
impl Backend for BrewBackend {
    fn name(&self) -> &'static str {
        "brew"
    }

    fn is_available(&self) -> bool {
        command_exists("brew")
    }

    async fn search(&self, query: &str) -> Result<Vec<PackageHit>> {
        let output = run_capture("brew", &["search", query]).await?;
        Ok(parse_search_output(&output))
    }

    async fn install(&self, package: &str) -> Result<()> {
        run_streaming("brew", &["install", package]).await
    }

    async fn update(&self, package: &str) -> Result<()> {
        run_streaming("brew", &["upgrade", package]).await
    }

    async fn uninstall(&self, package: &str) -> Result<()> {
        run_streaming("brew", &["uninstall", package]).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_formula_names_and_skips_headers() {
        let output = "==> Formulae\nripgrep\nripgrep-all\n\n==> Casks\n";
        let hits = parse_search_output(output);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "ripgrep");
        assert_eq!(hits[1].name, "ripgrep-all");
    }
}
