//! Cargo backend for Rust tools.

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::backends::run_capture;
use crate::backends::run_streaming;
use crate::error::Result;
use crate::search::PackageHit;

pub struct CargoBackend;

impl CargoBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CargoBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// `cargo search` prints `name = "version"    # description` lines.
fn parse_search_output(output: &str) -> Vec<PackageHit> {
    output
        .lines()
        .filter_map(|line| {
            let (name, rest) = line.split_once(" = \"")?;
            let mut hit = PackageHit::new(name.trim(), "cargo");
            match rest.split_once("\" ") {
                Some((version, trailer)) => {
                    hit = hit.with_version(version);
                    if let Some(description) = trailer.trim_start().strip_prefix('#') {
                        hit = hit.with_description(description.trim());
                    }
                }
                None => {
                    hit = hit.with_version(rest.trim_end_matches('"'));
                }
            }
            Some(hit)
        })
        .collect()
}

#[async_trait]
impl Backend for CargoBackend {
    fn name(&self) -> &'static str {
        "cargo"
    }

    fn is_available(&self) -> bool {
        command_exists("cargo")
    }

    async fn search(&self, query: &str) -> Result<Vec<PackageHit>> {
        let output = run_capture("cargo", &["search", query, "--limit", "10"]).await?;
        Ok(parse_search_output(&output))
    }

    async fn install(&self, package: &str) -> Result<()> {
        run_streaming("cargo", &["install", package]).await
    }

    async fn update(&self, package: &str) -> Result<()> {
        // `cargo install` of an already-installed crate refreshes it.
        self.install(package).await
    }

    async fn uninstall(&self, package: &str) -> Result<()> {
        run_streaming("cargo", &["uninstall", package]).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_cargo_search_lines() {
        let output = "ripgrep = \"14.1.0\"    # ripgrep recursively searches directories\n\
                      ... and 42 crates more";
        let hits = parse_search_output(output);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "ripgrep");
        assert_eq!(hits[0].version.as_deref(), Some("14.1.0"));
        assert_eq!(
            hits[0].description.as_deref(),
            Some("ripgrep recursively searches directories")
        );
    }
}
