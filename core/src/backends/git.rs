//! Git backend: clone a repository and build from source.

use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::error::Error;
use crate::error::Result;
use crate::search::PackageHit;

pub struct GitBackend;

impl GitBackend {
    pub fn new() -> Self {
        Self
    }

    /// Detect the repository's build system and install through it.
    async fn build_and_install(&self, repo_path: &Path) -> Result<()> {
        if repo_path.join("Cargo.toml").exists() {
            println!("   Detected Rust project (Cargo)");
            in_dir(repo_path, "cargo", &["install", "--path", "."]).await
        } else if repo_path.join("Makefile").exists() || repo_path.join("makefile").exists() {
            println!("   Detected Makefile");
            in_dir(repo_path, "make", &[]).await?;
            in_dir(repo_path, "make", &["install"]).await
        } else if repo_path.join("package.json").exists() {
            println!("   Detected Node.js project (npm)");
            in_dir(repo_path, "npm", &["install", "-g", "."]).await
        } else {
            Err(Error::UnknownBuildSystem {
                path: repo_path.to_path_buf(),
            })
        }
    }
}

async fn in_dir(dir: &Path, program: &str, args: &[&str]) -> Result<()> {
    println!("   Running: {program} {}", args.join(" "));
    let status = tokio::process::Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .await
        .map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            program: program.to_string(),
            code: status.code(),
        })
    }
}

fn clone_dir_for(repo_url: &str) -> PathBuf {
    let repo_name = repo_url
        .rsplit('/')
        .next()
        .unwrap_or("repo")
        .trim_end_matches(".git");
    std::env::temp_dir().join("1install-git").join(repo_name)
}

impl Default for GitBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for GitBackend {
    fn name(&self) -> &'static str {
        "git"
    }

    fn is_available(&self) -> bool {
        command_exists("git")
    }

    async fn search(&self, _query: &str) -> Result<Vec<PackageHit>> {
        // No meaningful federated search without an index.
        Ok(Vec::new())
    }

    async fn install(&self, repo_url: &str) -> Result<()> {
        if !repo_url.starts_with("http") && !repo_url.starts_with("git@") {
            return Err(Error::InvalidRepoUrl {
                spec: repo_url.to_string(),
            });
        }

        let clone_dir = clone_dir_for(repo_url);
        if clone_dir.exists() {
            tokio::fs::remove_dir_all(&clone_dir).await?;
        }
        tokio::fs::create_dir_all(&clone_dir).await?;

        println!("   Cloning {repo_url} into {}...", clone_dir.display());
        in_dir(&clone_dir, "git", &["clone", "--depth", "1", repo_url, "."]).await?;

        let result = self.build_and_install(&clone_dir).await;

        // Best-effort cleanup; the build result is what matters.
        let _ = tokio::fs::remove_dir_all(&clone_dir).await;

        result
    }

    async fn update(&self, repo_url: &str) -> Result<()> {
        self.install(repo_url).await
    }

    async fn uninstall(&self, _repo_url: &str) -> Result<()> {
        Err(Error::UnsupportedOperation {
            backend: "git".to_string(),
            operation: "uninstall".to_string(),
            reason: "uninstall through the build tool used at install time (e.g. cargo uninstall)"
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn clone_dir_uses_repo_name() {
        let dir = clone_dir_for("https://github.com/sharkdp/bat.git");
        assert!(dir.ends_with(Path::new("1install-git").join("bat")));
    }

    #[tokio::test]
    async fn rejects_non_url_specs() {
        let backend = GitBackend::new();
        let err = backend.install("bat").await;
        assert!(matches!(err, Err(Error::InvalidRepoUrl { .. })));
        assert_eq!(
            err.expect_err("must fail").to_string(),
            "git installs require a repository URL (e.g. https://github.com/user/repo), got 'bat'"
        );
    }
}
