//! Local, anonymous usage telemetry.
//!
//! Events are appended as JSON lines to a file under the 1install home.
//! Nothing ever leaves the machine; `telemetry.enabled = false` turns
//! the log off entirely.

use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::find_oneinstall_home;
use crate::config::load_config;
use crate::config::save_config;

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Heartbeat to count active users.
    UserPing,
    SearchStarted {
        query_length: usize,
        backends_count: usize,
    },
    SearchFinished {
        total_results: usize,
        duration_ms: u128,
    },
    InstallStarted {
        backend: String,
    },
    InstallFinished {
        backend: String,
        success: bool,
        duration_ms: u128,
    },
    ErrorOccurred {
        error_type: String,
    },
}

#[derive(Serialize)]
struct TelemetryRecord<'a> {
    timestamp: String,
    client_id: &'a str,
    #[serde(flatten)]
    event: &'a TelemetryEvent,
}

/// Record an event. Telemetry is strictly best-effort: failures are
/// logged at debug level and otherwise swallowed so they can never break
/// a user-facing operation.
pub fn track_event(event: &TelemetryEvent) {
    let Ok(mut config) = load_config() else {
        return;
    };
    if !config.telemetry.enabled {
        return;
    }

    let client_id = match &config.telemetry.client_id {
        Some(id) => id.clone(),
        None => {
            let new_id = Uuid::new_v4().to_string();
            config.telemetry.client_id = Some(new_id.clone());
            if let Err(err) = save_config(&config) {
                debug!("could not persist telemetry client id: {err}");
            }
            new_id
        }
    };

    let record = TelemetryRecord {
        timestamp: Utc::now().to_rfc3339(),
        client_id: &client_id,
        event,
    };

    if let Err(err) = append_record(&record) {
        debug!("could not write telemetry event: {err}");
    }
}

fn append_record(record: &TelemetryRecord<'_>) -> std::io::Result<()> {
    let path = log_path().map_err(std::io::Error::other)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let line = serde_json::to_string(record)?;
    writeln!(file, "{line}")
}

fn log_path() -> crate::error::Result<PathBuf> {
    Ok(find_oneinstall_home()?.join("telemetry.jsonl"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_tag_and_fields() {
        let event = TelemetryEvent::InstallFinished {
            backend: "apt".to_string(),
            success: true,
            duration_ms: 1200,
        };
        let json = serde_json::to_string(&event).expect("serializes");
        assert!(json.contains("\"event\":\"install_finished\""));
        assert!(json.contains("\"backend\":\"apt\""));
        assert!(json.contains("\"duration_ms\":1200"));
    }
}
