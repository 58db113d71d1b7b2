//! Snap backend for Linux.

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::backends::run_capture;
use crate::backends::run_streaming;
use crate::error::Result;
use crate::search::PackageHit;

pub struct SnapBackend;

impl SnapBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SnapBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// `snap find` prints: Name Version Publisher Notes Summary...
fn parse_search_output(output: &str) -> Vec<PackageHit> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 5 {
                return None;
            }
            Some(
                PackageHit::new(parts[0], "snap")
                    .with_version(parts[1])
                    .with_description(parts[4..].join(" ")),
            )
        })
        .collect()
}

#[async_trait]
impl Backend for SnapBackend {
    fn name(&self) -> &'static str {
        "snap"
    }

    fn is_available(&self) -> bool {
        command_exists("snap")
    }

    async fn search(&self, query: &str) -> Result<Vec<PackageHit>> {
        let output = run_capture("snap", &["find", query]).await?;
        Ok(parse_search_output(&output))
    }

    async fn install(&self, package: &str) -> Result<()> {
        run_streaming("sudo", &["snap", "install", package]).await
    }

    async fn update(&self, package: &str) -> Result<()> {
        run_streaming("sudo", &["snap", "refresh", package]).await
    }

    async fn uninstall(&self, package: &str) -> Result<()> {
        run_streaming("sudo", &["snap", "remove", package]).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_snap_find_table() {
        let output = "\
Name      Version  Publisher  Notes  Summary
chromium  126.0    canonical  -      Chromium web browser
";
        let hits = parse_search_output(output);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "chromium");
        assert_eq!(hits[0].version.as_deref(), Some("126.0"));
        assert_eq!(hits[0].description.as_deref(), Some("Chromium web browser"));
    }
}
