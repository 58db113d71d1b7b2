//! System health and diagnostic checks (`1i doctor`).

use crate::backends::available_backends;
use crate::error::Result;
use crate::shims::ShimRegistry;
use crate::shims::shim_dir;

/// Common CLI tools that several package managers can provide; multiple
/// PATH hits for one of these usually means two managers fighting over
/// the same name.
const COMMON_TOOLS: &[&str] = &[
    "git", "node", "python", "python3", "jq", "rg", "fd", "npm", "pip", "docker", "curlie", "bat",
];

pub struct Doctor;

impl Doctor {
    pub fn run() -> Result<()> {
        println!("Running 1install diagnostics...");

        Self::check_shim_dir()?;
        Self::check_shim_registry()?;
        Self::check_conflicts();

        println!("\nDiagnostics complete.");
        Ok(())
    }

    fn check_shim_dir() -> Result<()> {
        let dir = shim_dir()?;
        print!("   Shim directory... ");

        if dir.exists() {
            println!("ok ({})", dir.display());
        } else {
            println!("missing");
            println!("     Run any install (or '1i shims refresh') to create it.");
        }

        let path = std::env::var("PATH").unwrap_or_default();
        let in_path = dir
            .to_str()
            .is_some_and(|dir| std::env::split_paths(&path).any(|entry| entry.as_os_str() == dir));

        print!("   PATH integration... ");
        if in_path {
            println!("ok");
        } else {
            println!("shim directory is not on $PATH");
            println!("     See '1i shims setup' for instructions.");
        }

        Ok(())
    }

    fn check_shim_registry() -> Result<()> {
        let registry = ShimRegistry::load()?;
        println!("   Shim registry... loaded ({} shims)", registry.len());

        let mut broken = 0;
        for shim in registry.list() {
            if !shim.target.exists() {
                broken += 1;
                println!(
                    "     broken shim: {} -> {} (target missing)",
                    shim.name,
                    shim.target.display()
                );
            }
        }

        if broken == 0 && !registry.is_empty() {
            println!("     all shims point to valid targets");
        } else if broken > 0 {
            println!("     run '1i shims refresh' to prune broken shims");
        }

        Ok(())
    }

    fn check_conflicts() {
        println!("   Conflict detection...");

        let backends = available_backends(&[]);
        if backends.len() < 2 {
            println!("     only one backend available, no conflicts possible");
            return;
        }

        let mut conflicts = 0;
        for tool in COMMON_TOOLS {
            let paths: Vec<std::path::PathBuf> = match which::which_all(tool) {
                Ok(found) => found.collect(),
                Err(_) => Vec::new(),
            };
            if paths.len() > 1 {
                conflicts += 1;
                println!("     potential conflict for '{tool}':");
                for path in paths {
                    println!("       - {}", path.display());
                }
            }
        }

        if conflicts == 0 {
            println!("     no binary name collisions detected");
        } else {
            println!(
                "\n     Recommendation: use '1i install --backend' to pin a provider, then '1i shims refresh'."
            );
        }
    }
}
