use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use deck_core::{
    fetcher::{DEFAULT_BATCH_SIZE, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT},
    FetchConfig,
};
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "profile_deck.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint_url: String,
    pub batch_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint_url: Option<String>,
    batch_size: Option<u32>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            endpoint: self.endpoint_url.clone(),
            batch_size: self.batch_size,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..FetchConfig::default()
        }
    }

    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.endpoint_url {
            self.endpoint_url = v;
        }
        if let Some(v) = file_cfg.batch_size {
            self.batch_size = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.set_request_timeout_secs(v, "request_timeout_secs");
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("APP__ENDPOINT_URL") {
            self.endpoint_url = v;
        }
        if let Some(v) = lookup("APP__BATCH_SIZE") {
            match v.parse::<u32>() {
                Ok(parsed) => self.batch_size = parsed,
                Err(err) => tracing::warn!(value = %v, error = %err, "ignoring APP__BATCH_SIZE"),
            }
        }
        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(parsed) => self.set_request_timeout_secs(parsed, "APP__REQUEST_TIMEOUT_SECS"),
                Err(err) => {
                    tracing::warn!(value = %v, error = %err, "ignoring APP__REQUEST_TIMEOUT_SECS")
                }
            }
        }
    }

    /// A zero timeout would fail every request before it is sent.
    fn set_request_timeout_secs(&mut self, secs: u64, source: &str) {
        if secs == 0 {
            tracing::warn!(source, "ignoring zero request timeout");
            return;
        }
        self.request_timeout_secs = secs;
    }

    pub fn apply_overrides(&mut self, endpoint_url: Option<String>, batch_size: Option<u32>) {
        if let Some(v) = endpoint_url {
            self.endpoint_url = v;
        }
        if let Some(v) = batch_size {
            self.batch_size = v;
        }
    }
}

/// Defaults, then the settings file, then `APP__*` environment variables.
///
/// An explicit `path` must exist; the default file is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
            settings
                .apply_file(&raw)
                .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_SETTINGS_FILE) {
                settings
                    .apply_file(&raw)
                    .with_context(|| format!("invalid settings file '{DEFAULT_SETTINGS_FILE}'"))?;
            }
        }
    }

    settings.apply_env(lookup);
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
