//! Go backend (`go install`).

use async_trait::async_trait;

use crate::backends::Backend;
use crate::backends::command_exists;
use crate::backends::run_streaming;
use crate::error::Error;
use crate::error::Result;
use crate::search::PackageHit;

pub struct GoBackend;

impl GoBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GoBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn versioned(package: &str) -> String {
    if package.contains('@') {
        package.to_string()
    } else {
        format!("{package}@latest")
    }
}

#[async_trait]
impl Backend for GoBackend {
    fn name(&self) -> &'static str {
        "go"
    }

    fn is_available(&self) -> bool {
        command_exists("go")
    }

    async fn search(&self, _query: &str) -> Result<Vec<PackageHit>> {
        // The go toolchain has no search command; installs take a full
        // module path anyway.
        Ok(Vec::new())
    }

    async fn install(&self, package: &str) -> Result<()> {
        run_streaming("go", &["install", &versioned(package)]).await
    }

    async fn update(&self, package: &str) -> Result<()> {
        // Re-installing @latest refreshes the binary.
        self.install(package).await
    }

    async fn uninstall(&self, _package: &str) -> Result<()> {
        Err(Error::UnsupportedOperation {
            backend: "go".to_string(),
            operation: "uninstall".to_string(),
            reason: "remove the binary from $GOPATH/bin manually".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn appends_latest_when_unversioned() {
        assert_eq!(
            versioned("github.com/junegunn/fzf"),
            "github.com/junegunn/fzf@latest"
        );
        assert_eq!(
            versioned("github.com/junegunn/fzf@v0.54.0"),
            "github.com/junegunn/fzf@v0.54.0"
        );
    }
}
