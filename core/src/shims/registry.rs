//! The shim registry: a TOML file tracking every shim we created.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::config::find_data_dir;
use crate::error::Error;
use crate::error::Result;
use crate::shims::create_shim;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShimEntry {
    pub name: String,
    /// The real binary the shim execs.
    pub target: PathBuf,
    /// Backend that installed the package.
    pub installed_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ShimRegistry {
    shims: HashMap<String, ShimEntry>,
}

impl ShimRegistry {
    pub fn load() -> Result<Self> {
        let path = Self::registry_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        toml::from_str(&contents).map_err(|source| Error::TomlDeserialize { path, source })
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::registry_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).map_err(|source| Error::TomlSerialize {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    fn registry_path() -> Result<PathBuf> {
        Ok(find_data_dir()?.join("shims.toml"))
    }

    pub fn add(&mut self, name: String, target: PathBuf, installed_by: String) {
        let entry = ShimEntry {
            name: name.clone(),
            target,
            installed_by,
            created_at: Utc::now(),
        };
        self.shims.insert(name, entry);
    }

    pub fn remove(&mut self, name: &str) -> Option<ShimEntry> {
        self.shims.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ShimEntry> {
        self.shims.get(name)
    }

    pub fn list(&self) -> impl Iterator<Item = &ShimEntry> {
        self.shims.values()
    }

    pub fn len(&self) -> usize {
        self.shims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shims.is_empty()
    }

    /// Rewrite every shim script from the registry, dropping entries
    /// whose target no longer exists. Returns (regenerated, pruned).
    pub fn refresh(&mut self) -> Result<(usize, usize)> {
        let mut regenerated = 0;
        let mut pruned = Vec::new();

        for entry in self.shims.values() {
            if entry.target.exists() {
                create_shim(&entry.name, &entry.target)?;
                regenerated += 1;
            } else {
                warn!(
                    "dropping shim '{}': target {} is gone",
                    entry.name,
                    entry.target.display()
                );
                pruned.push(entry.name.clone());
            }
        }

        for name in &pruned {
            self.shims.remove(name);
        }

        Ok((regenerated, pruned.len()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn add_get_remove_round_trip() {
        let mut registry = ShimRegistry::default();
        registry.add(
            "rg".to_string(),
            PathBuf::from("/usr/bin/rg"),
            "apt".to_string(),
        );

        let entry = registry.get("rg").expect("entry present");
        assert_eq!(entry.name, "rg");
        assert_eq!(entry.installed_by, "apt");
        assert_eq!(registry.len(), 1);

        let removed = registry.remove("rg").expect("entry removed");
        assert_eq!(removed.target, PathBuf::from("/usr/bin/rg"));
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_serializes_to_toml_and_back() {
        let mut registry = ShimRegistry::default();
        registry.add(
            "fd".to_string(),
            PathBuf::from("/usr/local/bin/fd"),
            "brew".to_string(),
        );

        let toml_text = toml::to_string_pretty(&registry).expect("serializes");
        let parsed: ShimRegistry = toml::from_str(&toml_text).expect("parses");
        assert_eq!(parsed.get("fd").expect("entry").installed_by, "brew");
    }
}
