//! Application-level configuration loading for the lifecycle windows and
//! delivery settings.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use time::Duration;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BOLAO_BACK_CONFIG_PATH";

const DEFAULT_LOCK_WINDOW_MINUTES: i64 = 30;
const DEFAULT_REMINDER_LEAD_MINUTES: i64 = 60;
const DEFAULT_TICK_INTERVAL_SECONDS: u64 = 60;
const DEFAULT_RESULTS_DEDUPE_MINUTES: i64 = 10;
const DEFAULT_PUSH_TIMEOUT_SECONDS: u64 = 5;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// How long before kickoff betting closes.
    pub lock_window: Duration,
    /// How long before kickoff the "cutoff approaching" reminder window
    /// opens. Must exceed the lock window so recipients can still act.
    pub reminder_lead: Duration,
    /// Interval between scheduler ticks.
    pub tick_interval: std::time::Duration,
    /// Window inside which a round's "results available" notification is
    /// sent at most once.
    pub results_dedupe_window: Duration,
    /// Upper bound on a single push delivery attempt.
    pub push_timeout: std::time::Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if config.reminder_lead <= config.lock_window {
            warn!(
                "reminder lead does not exceed the lock window; reminders can never fire; using defaults"
            );
            return Self::default();
        }

        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lock_window: Duration::minutes(DEFAULT_LOCK_WINDOW_MINUTES),
            reminder_lead: Duration::minutes(DEFAULT_REMINDER_LEAD_MINUTES),
            tick_interval: std::time::Duration::from_secs(DEFAULT_TICK_INTERVAL_SECONDS),
            results_dedupe_window: Duration::minutes(DEFAULT_RESULTS_DEDUPE_MINUTES),
            push_timeout: std::time::Duration::from_secs(DEFAULT_PUSH_TIMEOUT_SECONDS),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    lock_window_minutes: Option<i64>,
    reminder_lead_minutes: Option<i64>,
    tick_interval_seconds: Option<u64>,
    results_dedupe_minutes: Option<i64>,
    push_timeout_seconds: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            lock_window: raw
                .lock_window_minutes
                .map_or(defaults.lock_window, Duration::minutes),
            reminder_lead: raw
                .reminder_lead_minutes
                .map_or(defaults.reminder_lead, Duration::minutes),
            tick_interval: raw
                .tick_interval_seconds
                .map_or(defaults.tick_interval, std::time::Duration::from_secs),
            results_dedupe_window: raw
                .results_dedupe_minutes
                .map_or(defaults.results_dedupe_window, Duration::minutes),
            push_timeout: raw
                .push_timeout_seconds
                .map_or(defaults.push_timeout, std::time::Duration::from_secs),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
