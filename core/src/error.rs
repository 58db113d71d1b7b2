use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("backend '{name}' is not available on this system")]
    BackendUnavailable { name: String },

    #[error("no backend named '{name}'")]
    UnknownBackend { name: String },

    #[error("could not detect a supported package manager for this system")]
    UnsupportedPlatform,

    #[error("{program} failed with exit code: {code:?}")]
    CommandFailed { program: String, code: Option<i32> },

    #[error("failed to spawn {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{backend} does not support '{operation}': {reason}")]
    UnsupportedOperation {
        backend: String,
        operation: String,
        reason: String,
    },

    #[error("could not determine the user home directory")]
    MissingHome,

    #[error("unknown config key: {key}")]
    UnknownConfigKey { key: String },

    #[error("invalid value for {key}: expected {expected}")]
    InvalidConfigValue { key: String, expected: String },

    #[error("git installs require a repository URL (e.g. https://github.com/user/repo), got '{spec}'")]
    InvalidRepoUrl { spec: String },

    #[error("could not detect a build system in {}", .path.display())]
    UnknownBuildSystem { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse {}", .path.display())]
    TomlDeserialize {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize {}", .path.display())]
    TomlSerialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },
}
