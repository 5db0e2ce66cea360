use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};
use std::time::Duration;

use crate::notification;
use crate::sample_report::SAMPLE_ASSET;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "inti-showcase";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// How long a toast stays fully visible
    #[serde(default = "default_notification_duration_ms")]
    pub notification_duration_ms: u64,

    #[serde(default = "default_max_notifications")]
    pub max_notifications: usize,

    #[serde(default = "default_sample_report_path")]
    pub sample_report_path: PathBuf,

    /// Origin the sample report is published under, used for share links
    #[serde(default = "default_site_origin")]
    pub site_origin: String,

    /// Where downloads land; the platform download directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_notification_duration_ms() -> u64 {
    notification::DEFAULT_DURATION.as_millis() as u64
}

fn default_max_notifications() -> usize {
    notification::DEFAULT_CAPACITY
}

fn default_sample_report_path() -> PathBuf {
    PathBuf::from(SAMPLE_ASSET)
}

fn default_site_origin() -> String {
    "https://inticashbot.com".to_string()
}

fn default_tick_rate_ms() -> u64 {
    50
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            notification_duration_ms: default_notification_duration_ms(),
            max_notifications: default_max_notifications(),
            sample_report_path: default_sample_report_path(),
            site_origin: default_site_origin(),
            download_dir: None,
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from `path`, or from the platform config directory.
/// A missing file is created with defaults.
pub fn load_settings(path: Option<&Path>) {
    let Some(path) = path.map(Path::to_path_buf).or_else(preferred_config_path) else {
        warn!("Could not determine config directory, using default settings");
        return;
    };
    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        let settings = Settings::default();
        save_settings_to_file(&settings, &path);
        if let Ok(mut global) = SETTINGS.write() {
            *global = settings;
        }
    }
}

fn load_settings_from_path(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    if settings.max_notifications == 0 {
        settings.max_notifications = default_max_notifications();
    }

    settings.version = CURRENT_VERSION;
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let content = match serde_yaml::to_string(settings) {
        Ok(yaml) => format!("{SETTINGS_HEADER}{yaml}"),
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

const SETTINGS_HEADER: &str = r#"# ============================================================================
# Inti Showcase settings
# ============================================================================
# notification_duration_ms: how long a toast stays on screen
# max_notifications:        toasts kept at once, the oldest is dropped first
# sample_report_path:       PDF used by the Reportes section
# site_origin:              base URL for shared report links
# download_dir:             where "Descargar" saves the sample (optional)
# tick_rate_ms:             UI refresh interval

"#;

// Public API for accessing settings

pub fn get_notification_duration() -> Duration {
    let ms = SETTINGS
        .read()
        .map(|s| s.notification_duration_ms)
        .unwrap_or_else(|_| default_notification_duration_ms());
    Duration::from_millis(ms)
}

pub fn get_max_notifications() -> usize {
    SETTINGS
        .read()
        .map(|s| s.max_notifications.max(1))
        .unwrap_or_else(|_| default_max_notifications())
}

pub fn get_sample_report_path() -> PathBuf {
    SETTINGS
        .read()
        .map(|s| s.sample_report_path.clone())
        .unwrap_or_else(|_| default_sample_report_path())
}

pub fn get_site_origin() -> String {
    SETTINGS
        .read()
        .map(|s| s.site_origin.clone())
        .unwrap_or_else(|_| default_site_origin())
}

pub fn get_download_dir() -> PathBuf {
    SETTINGS
        .read()
        .ok()
        .and_then(|s| s.download_dir.clone())
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn get_tick_rate() -> Duration {
    let ms = SETTINGS
        .read()
        .map(|s| s.tick_rate_ms)
        .unwrap_or_else(|_| default_tick_rate_ms());
    Duration::from_millis(ms.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let settings: Settings = serde_yaml::from_str("max_notifications: 2\n").unwrap();
        assert_eq!(settings.max_notifications, 2);
        assert_eq!(settings.notification_duration_ms, 3000);
        assert_eq!(settings.tick_rate_ms, 50);
        assert_eq!(settings.sample_report_path, PathBuf::from(SAMPLE_ASSET));
        assert!(settings.download_dir.is_none());
    }

    #[test]
    fn migration_repairs_zero_capacity() {
        let mut settings = Settings {
            version: 0,
            max_notifications: 0,
            ..Settings::default()
        };
        migrate_settings(&mut settings);
        assert_eq!(settings.version, CURRENT_VERSION);
        assert_eq!(settings.max_notifications, notification::DEFAULT_CAPACITY);
    }
}
