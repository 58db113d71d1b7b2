//! Winget backend for Windows.

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::backends::run_capture;
use crate::backends::run_streaming;
use crate::error::Result;
use crate::search::PackageHit;

pub struct WingetBackend;

impl WingetBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WingetBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Winget prints a column-aligned table: Name, Id, Version, ...
/// Columns are located via the header line; everything before it (spinner
/// output, source agreement notices) is ignored.
fn parse_search_output(output: &str) -> Vec<PackageHit> {
    let lines: Vec<&str> = output.lines().collect();
    let Some(header_idx) = lines
        .iter()
        .position(|l| l.contains("Name") && l.contains("Id"))
    else {
        return Vec::new();
    };

    // Skip the header and the dashed separator under it.
    lines
        .iter()
        .skip(header_idx + 2)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                return None;
            }
            let mut hit = PackageHit::new(parts[0], "winget");
            if let Some(id) = parts.get(1) {
                hit = hit.with_description(format!("ID: {id}"));
            }
            if let Some(version) = parts.get(2) {
                hit = hit.with_version(*version);
            }
            Some(hit)
        })
        .collect()
}

#[async_trait]
impl Backend for WingetBackend {
    fn name(&self) -> &'static str {
        "winget"
    }

    fn is_available(&self) -> bool {
        command_exists("winget")
    }

    async fn search(&self, query: &str) -> Result<Vec<PackageHit>> {
        let output =
            run_capture("winget", &["search", query, "--accept-source-agreements"]).await?;
        Ok(parse_search_output(&output))
    }

    async fn install(&self, package: &str) -> Result<()> {
        run_streaming(
            "winget",
            &[
                "install",
                package,
                "-e",
                "--accept-source-agreements",
                "--accept-package-agreements",
            ],
        )
        .await
    }

    async fn update(&self, package: &str) -> Result<()> {
        run_streaming(
            "winget",
            &[
                "upgrade",
                package,
                "-e",
                "--accept-source-agreements",
                "--accept-package-agreements",
            ],
        )
        .await
    }

    async fn uninstall(&self, package: &str) -> Result<()> {
        run_streaming("winget", &["uninstall", package, "-e"]).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_aligned_table_after_header() {
        let output = "\
Name     Id              Version
------------------------------------
Git      Git.Git         2.45.1
Gitui    StephanDilly.gitui 0.26.3
";
        let hits = parse_search_output(output);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Git");
        assert_eq!(hits[0].version.as_deref(), Some("2.45.1"));
        assert_eq!(hits[0].description.as_deref(), Some("ID: Git.Git"));
    }

    #[test]
    fn missing_header_yields_no_hits() {
        assert!(parse_search_output("no matches found").is_empty());
    }
}
