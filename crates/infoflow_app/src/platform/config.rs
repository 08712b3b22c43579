use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use infoflow_core::{DateFormatter, InputValidator, TimeWindow, DEFAULT_MAX_RESULTS};
use infoflow_engine::ClientSettings;
use infoflow_logging::flow_warn;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const CONFIG_ENV: &str = "INFOFLOW_CONFIG";
const CONFIG_FILENAME: &str = "infoflow.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub max_results: u32,
    /// Wire code of the window selected at start-up.
    pub default_window: String,
    pub display_utc_offset_minutes: i32,
    pub log_level: String,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            api_base_url: client.base_url,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_response_bytes: client.max_bytes,
            max_results: DEFAULT_MAX_RESULTS,
            default_window: TimeWindow::default().code().to_string(),
            display_utc_offset_minutes: 0,
            log_level: "info".to_string(),
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
        }
    }

    pub fn validator(&self) -> InputValidator {
        InputValidator::new(self.max_results)
    }

    pub fn formatter(&self) -> DateFormatter {
        DateFormatter::with_offset_minutes(self.display_utc_offset_minutes).unwrap_or_else(|| {
            flow_warn!(
                "display offset {} minutes out of range, using UTC",
                self.display_utc_offset_minutes
            );
            DateFormatter::default()
        })
    }

    pub fn default_window(&self) -> TimeWindow {
        self.default_window
            .parse()
            .unwrap_or_else(|err: infoflow_core::UnknownTimeWindow| {
                flow_warn!("{}, using {}", err, TimeWindow::default().code());
                TimeWindow::default()
            })
    }

    pub fn log_level(&self) -> LevelFilter {
        infoflow_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

/// A configuration plus the reason defaults were used, if any.
///
/// Loading happens before the logger exists, so problems are reported later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub problem: Option<String>,
}

pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

pub fn load_config(path: &Path) -> LoadedConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return LoadedConfig {
                config: AppConfig::default(),
                problem: None,
            };
        }
        Err(err) => {
            return LoadedConfig {
                config: AppConfig::default(),
                problem: Some(format!("Failed to read config from {:?}: {}", path, err)),
            };
        }
    };

    match ron::from_str::<AppConfig>(&content) {
        Ok(config) => LoadedConfig {
            config,
            problem: None,
        },
        Err(err) => LoadedConfig {
            config: AppConfig::default(),
            problem: Some(format!("Failed to parse config from {:?}: {}", path, err)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults_silently() {
        let temp = TempDir::new().unwrap();
        let loaded = load_config(&temp.path().join("absent.ron"));
        assert_eq!(loaded.config, AppConfig::default());
        assert!(loaded.problem.is_none());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(
                api_base_url: "https://news.example.com",
                max_results: 50,
                default_window: "meses",
                display_utc_offset_minutes: -180,
                log_destination: Both,
            )"#,
        )
        .unwrap();

        let loaded = load_config(&path);
        assert!(loaded.problem.is_none(), "{:?}", loaded.problem);
        let config = loaded.config;
        assert_eq!(config.api_base_url, "https://news.example.com");
        assert_eq!(config.validator().max_results(), 50);
        assert_eq!(config.default_window(), TimeWindow::Last3Months);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(
            config.formatter().format("2025-09-01T10:30:00Z"),
            "01/09/2025, 07:30"
        );
    }

    #[test]
    fn broken_file_falls_back_with_problem() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(max_results: \"many\"").unwrap();

        let loaded = load_config(&path);
        assert_eq!(loaded.config, AppConfig::default());
        assert!(loaded.problem.unwrap().contains("Failed to parse config"));
    }

    #[test]
    fn bad_values_fall_back_per_field() {
        let config = AppConfig {
            default_window: "decadas".to_string(),
            display_utc_offset_minutes: 100_000,
            log_level: "chatty".to_string(),
            max_results: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.default_window(), TimeWindow::LastWeek);
        assert_eq!(config.formatter(), DateFormatter::default());
        assert_eq!(config.log_level(), LevelFilter::Info);
        assert_eq!(config.validator().max_results(), 1);
    }

    #[test]
    fn client_settings_follow_config() {
        let config = AppConfig {
            connect_timeout_secs: 3,
            request_timeout_secs: 12,
            ..AppConfig::default()
        };
        let settings = config.client_settings();
        assert_eq!(settings.connect_timeout, Duration::from_secs(3));
        assert_eq!(settings.request_timeout, Duration::from_secs(12));
        assert_eq!(settings.base_url, "http://localhost:5000");
    }
}
