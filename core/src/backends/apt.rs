//! APT backend for Debian-family distributions.

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::backends::is_root;
use crate::backends::run_capture;
use crate::backends::run_streaming;
use crate::backends::run_streaming_env;
use crate::error::Result;
use crate::search::PackageHit;

pub struct AptBackend;

impl AptBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AptBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// `apt-cache search` prints one `package-name - Description` per line.
fn parse_search_output(output: &str) -> Vec<PackageHit> {
    output
        .lines()
        .filter_map(|line| {
            let (name, description) = line.split_once(" - ")?;
            Some(
                PackageHit::new(name.trim(), "apt").with_description(description.trim()),
            )
        })
        .collect()
}

/// apt needs root; go through sudo unless we already are root.
async fn apt_get(args: &[&str]) -> Result<()> {
    let noninteractive = [("DEBIAN_FRONTEND", "noninteractive")];
    if is_root() {
        run_streaming_env("apt-get", args, &noninteractive).await
    } else {
        let mut sudo_args = vec!["apt-get"];
        sudo_args.extend_from_slice(args);
        run_streaming_env("sudo", &sudo_args, &noninteractive).await
    }
}

#[async_trait]
impl Backend for AptBackend {
    fn name(&self) -> &'static str {
        "apt"
    }

    fn is_available(&self) -> bool {
        command_exists("apt-cache")
    }

    async fn search(&self, query: &str) -> Result<Vec<PackageHit>> {
        let output = run_capture("apt-cache", &["search", query]).await?;
        Ok(parse_search_output(&output))
    }

    async fn install(&self, package: &str) -> Result<()> {
        apt_get(&["install", "-y", package]).await
    }

    async fn update(&self, package: &str) -> Result<()> {
        apt_get(&["update"]).await?;
        apt_get(&["install", "--only-upgrade", "-y", package]).await
    }

    async fn uninstall(&self, package: &str) -> Result<()> {
        if is_root() {
            run_streaming("apt-get", &["remove", "-y", package]).await
        } else {
            run_streaming("sudo", &["apt-get", "remove", "-y", package]).await
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_apt_cache_search_lines() {
        let output = "python3 - Interactive high-level OO language\n\
                      python3-pip - Python package installer";
        let hits = parse_search_output(output);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "python3");
        assert_eq!(
            hits[0].description.as_deref(),
            Some("Interactive high-level OO language")
        );
        assert_eq!(hits[1].name, "python3-pip");
    }

    #[test]
    fn skips_lines_without_separator() {
        assert!(parse_search_output("Sorting...\nFull Text Search...").is_empty());
    }
}
