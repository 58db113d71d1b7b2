//! Flatpak backend for Linux desktop applications.

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::backends::run_capture;
use crate::backends::run_streaming;
use crate::error::Result;
use crate::search::PackageHit;

pub struct FlatpakBackend;

impl FlatpakBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FlatpakBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// `flatpak search` emits tab-separated columns
/// (Name, Description, Application ID, Version, Branch, Remotes), but
/// some builds fall back to space alignment.
fn parse_search_output(output: &str) -> Vec<PackageHit> {
    output
        .lines()
        .filter_map(|line| {
            let tabbed: Vec<&str> = line.split('\t').collect();
            if tabbed.len() >= 3 {
                let mut hit = PackageHit::new(tabbed[0].trim(), "flatpak")
                    .with_description(tabbed[1].trim());
                if let Some(version) = tabbed.get(3) {
                    hit = hit.with_version(version.trim());
                }
                return Some(hit);
            }

            let spaced: Vec<&str> = line.split_whitespace().collect();
            if spaced.len() >= 3 {
                let mut hit =
                    PackageHit::new(spaced[0], "flatpak").with_description(spaced[1]);
                if let Some(version) = spaced.get(3) {
                    hit = hit.with_version(*version);
                }
                return Some(hit);
            }

            None
        })
        .collect()
}

#[async_trait]
impl Backend for FlatpakBackend {
    fn name(&self) -> &'static str {
        "flatpak"
    }

    fn is_available(&self) -> bool {
        command_exists("flatpak")
    }

    async fn search(&self, query: &str) -> Result<Vec<PackageHit>> {
        let output = run_capture("flatpak", &["search", query]).await?;
        Ok(parse_search_output(&output))
    }

    async fn install(&self, package: &str) -> Result<()> {
        run_streaming("flatpak", &["install", "-y", package]).await
    }

    async fn update(&self, package: &str) -> Result<()> {
        run_streaming("flatpak", &["update", "-y", package]).await
    }

    async fn uninstall(&self, package: &str) -> Result<()> {
        run_streaming("flatpak", &["uninstall", "-y", package]).await
    }
}
