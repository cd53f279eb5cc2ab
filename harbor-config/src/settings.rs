use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

use crate::cli::{GlobalArgs, OutputFormat};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no Harbor server configured; pass --server, set HARBOR_URL or add \"server\" to the config file")]
    MissingServer,

    #[error("a username was given without a password (or the other way round)")]
    IncompleteCredentials,

    #[error("unable to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Contents of the optional JSON config file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Fully resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server: String,
    pub credentials: Option<(String, String)>,
    pub output: OutputFormat,
    pub timeout: Duration,
}

pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge flags (and their env fallbacks) over the config file.
pub fn resolve_settings(args: &GlobalArgs) -> Result<Settings, ConfigError> {
    let file = match &args.config {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };

    let server = non_blank(args.server.clone())
        .or_else(|| non_blank(file.server.clone()))
        .ok_or(ConfigError::MissingServer)?;

    let username = non_blank(args.username.clone()).or_else(|| non_blank(file.username.clone()));
    let password = args.password.clone().or_else(|| file.password.clone());
    let credentials = match (username, password) {
        (Some(username), Some(password)) => Some((username, password)),
        (None, None) => None,
        _ => return Err(ConfigError::IncompleteCredentials),
    };

    let timeout_secs = args
        .timeout_secs
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .max(1);

    Ok(Settings {
        server,
        credentials,
        output: args.output,
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
