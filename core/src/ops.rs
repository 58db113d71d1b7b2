//! High-level operations shared by the CLI: backend resolution and the
//! install/update/uninstall/search flows.

use std::path::PathBuf;
use std::time::Instant;

use futures::future::join_all;
use tracing::warn;

use crate::backends::Backend;
use crate::backends::all_backends;
use crate::backends::available_backends;
use crate::backends::backend_for_context;
use crate::config::Config;
use crate::context::OsContext;
use crate::error::Error;
use crate::error::Result;
use crate::search::PackageHit;
use crate::search::rank_hits;
use crate::shims::ShimRegistry;
use crate::shims::create_shim;
use crate::shims::shim_dir;
use crate::telemetry::TelemetryEvent;
use crate::telemetry::track_event;

/// Pick the backend to operate with. An explicit `--backend` name wins;
/// otherwise the detected OS decides. The returned context is `Some`
/// only when detection ran, so the caller can report it.
pub fn resolve_backend(
    explicit: Option<&str>,
    config: &Config,
) -> Result<(Box<dyn Backend>, Option<OsContext>)> {
    match explicit {
        Some(name) => {
            let backend = all_backends()
                .into_iter()
                .find(|b| b.name() == name)
                .ok_or_else(|| Error::UnknownBackend {
                    name: name.to_string(),
                })?;
            if config.backends.disabled.iter().any(|d| d == name) || !backend.is_available() {
                return Err(Error::BackendUnavailable {
                    name: name.to_string(),
                });
            }
            Ok((backend, None))
        }
        None => {
            let context = OsContext::detect();
            let backend = backend_for_context(&context)?;
            if !backend.is_available() {
                return Err(Error::BackendUnavailable {
                    name: backend.name().to_string(),
                });
            }
            Ok((backend, Some(context)))
        }
    }
}

/// Install a package, then create a shim for its binary when enabled.
/// Returns the shim path if one was created.
pub async fn install_package(
    backend: &dyn Backend,
    package: &str,
    config: &Config,
) -> Result<Option<PathBuf>> {
    track_event(&TelemetryEvent::InstallStarted {
        backend: backend.name().to_string(),
    });
    let started = Instant::now();

    let result = backend.install(package).await;

    track_event(&TelemetryEvent::InstallFinished {
        backend: backend.name().to_string(),
        success: result.is_ok(),
        duration_ms: started.elapsed().as_millis(),
    });
    result?;

    if !config.behavior.create_shims {
        return Ok(None);
    }
    match try_create_shim(package, backend.name()) {
        Ok(shim) => Ok(shim),
        Err(err) => {
            // A failed shim must not fail a successful install.
            warn!("shim creation failed for {package}: {err}");
            Ok(None)
        }
    }
}

pub async fn update_package(backend: &dyn Backend, package: &str) -> Result<()> {
    backend.update(package).await
}

/// Uninstall a package and clean up any shim we created for it.
pub async fn uninstall_package(backend: &dyn Backend, package: &str) -> Result<()> {
    backend.uninstall(package).await?;

    let mut registry = ShimRegistry::load()?;
    if registry.remove(package).is_some() {
        registry.save()?;
        let shim_path = shim_dir()?.join(package);
        if shim_path.exists() {
            std::fs::remove_file(shim_path)?;
        }
    }
    Ok(())
}

/// Query every available backend concurrently and return ranked hits.
/// A failing backend degrades to a warning.
pub async fn search_packages(query: &str, config: &Config) -> Result<Vec<PackageHit>> {
    let backends = available_backends(&config.backends.disabled);

    track_event(&TelemetryEvent::SearchStarted {
        query_length: query.len(),
        backends_count: backends.len(),
    });
    let started = Instant::now();

    let searches = backends.iter().map(|backend| backend.search(query));
    let mut hits = Vec::new();
    for (backend, result) in backends.iter().zip(join_all(searches).await) {
        match result {
            Ok(mut backend_hits) => hits.append(&mut backend_hits),
            Err(err) => {
                warn!("{} search failed: {err}", backend.name());
                eprintln!("   Warning: {} search failed: {err}", backend.name());
            }
        }
    }

    rank_hits(query, &mut hits);

    track_event(&TelemetryEvent::SearchFinished {
        total_results: hits.len(),
        duration_ms: started.elapsed().as_millis(),
    });
    Ok(hits)
}

/// Locate `package`'s binary on PATH and shim it. `None` when the binary
/// cannot be found (the package may not ship one under its own name).
pub fn try_create_shim(package: &str, backend_name: &str) -> Result<Option<PathBuf>> {
    let Ok(target) = which::which(package) else {
        return Ok(None);
    };

    let shim_path = create_shim(package, &target)?;

    let mut registry = ShimRegistry::load()?;
    registry.add(package.to_string(), target, backend_name.to_string());
    registry.save()?;

    Ok(Some(shim_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_backend_name_is_rejected() {
        let config = Config::default();
        let err = resolve_backend(Some("not-a-backend"), &config);
        assert!(matches!(err, Err(Error::UnknownBackend { .. })));
    }

    #[test]
    fn disabled_backend_is_rejected_even_when_named() {
        let mut config = Config::default();
        // Disable every backend so the result is deterministic no matter
        // which package managers the host has.
        config.backends.disabled = all_backends()
            .iter()
            .map(|b| b.name().to_string())
            .collect();
        for backend in all_backends() {
            let err = resolve_backend(Some(backend.name()), &config);
            assert!(matches!(err, Err(Error::BackendUnavailable { .. })));
        }
    }
}
