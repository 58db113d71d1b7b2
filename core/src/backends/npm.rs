//! npm backend for Node.js packages, installed globally.

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::backends::run_capture;
use crate::backends::run_streaming;
use crate::error::Result;
use crate::search::PackageHit;

pub struct NpmBackend;

impl NpmBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NpmBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// `npm search --parseable` prints pipe-separated columns:
/// name | description | maintainers | date | version | keywords
fn parse_search_output(output: &str) -> Vec<PackageHit> {
    output
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = line.split('|').collect();
            if parts.len() >= 3 {
                let mut hit = PackageHit::new(parts[0].trim(), "npm")
                    .with_description(parts[1].trim());
                if let Some(version) = parts.get(4) {
                    hit = hit.with_version(version.trim());
                }
                Some(hit)
            } else {
                let name = line.split_whitespace().next()?;
                Some(PackageHit::new(name, "npm"))
            }
        })
        .collect()
}

#[async_trait]
impl Backend for NpmBackend {
    fn name(&self) -> &'static str {
        "npm"
    }

    fn is_available(&self) -> bool {
        command_exists("npm")
    }

    async fn search(&self, query: &str) -> Result<Vec<PackageHit>> {
        let output = run_capture("npm", &["search", query, "--long", "--parseable"]).await?;
        Ok(parse_search_output(&output))
    }

    async fn install(&self, package: &str) -> Result<()> {
        run_streaming("npm", &["install", "-g", package]).await
    }

    async fn update(&self, package: &str) -> Result<()> {
        run_streaming("npm", &["update", "-g", package]).await
    }

    async fn uninstall(&self, package: &str) -> Result<()> {
        run_streaming("npm", &["uninstall", "-g", package]).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_pipe_separated_columns() {
        let output = "NAME | DESCRIPTION | AUTHOR | DATE | VERSION | KEYWORDS\n\
                      eslint | Pluggable linter | =maints | 2024-01-01 | 9.0.0 | lint";
        let hits = parse_search_output(output);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "eslint");
        assert_eq!(hits[0].version.as_deref(), Some("9.0.0"));
        assert_eq!(hits[0].description.as_deref(), Some("Pluggable linter"));
    }

    #[test]
    fn falls_back_to_first_token() {
        let hits = parse_search_output("HEADER\nlodash modular utilities");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "lodash");
    }
}
