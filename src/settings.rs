//! User settings stored as settings.json in the app data directory

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Data
    pub workbook_path: Option<String>,
    pub cache_ttl_days: u64,

    // View
    pub default_year: Option<i32>,
    pub top_n: usize,
    pub show_table: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            workbook_path: None,
            cache_ttl_days: DEFAULT_CACHE_TTL_DAYS,
            default_year: None,
            top_n: DEFAULT_TOP_N,
            show_table: false,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        ttl_from_days(self.cache_ttl_days)
    }
}

pub fn ttl_from_days(days: u64) -> Duration {
    Duration::from_secs(days.saturating_mul(SECS_PER_DAY))
}

/// Workbook to read: the env var wins over the saved path, then the fixed default.
pub fn effective_workbook_path(saved: Option<&str>) -> PathBuf {
    resolve_workbook_path(std::env::var(WORKBOOK_ENV_VAR).ok().as_deref(), saved)
}

/// What gets persisted for the path the user typed or picked. Blank means
/// "use the default" and is not stored.
pub fn saved_workbook_path(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn resolve_workbook_path(env: Option<&str>, saved: Option<&str>) -> PathBuf {
    [env, saved]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK))
}
