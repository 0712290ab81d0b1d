use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::season::{FIRST_SEASON, SeasonId, SeasonRange};

pub const DEFAULT_BASE_URL: &str = "https://www.basketball-reference.com";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_FETCH_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;
const DEFAULT_EXPORT_PATH: &str = "nba_mvp_export.xlsx";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub fetch_attempts: u32,
    pub retry_backoff: Duration,
    pub seasons: SeasonRange,
    pub default_season: SeasonId,
    pub export_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let seasons = SeasonRange::through_current();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fetch_attempts: DEFAULT_FETCH_ATTEMPTS,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            seasons,
            default_season: seasons.last,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }
}

impl AppConfig {
    /// Loads `.env.local` / `.env` if present, then reads `NBA_*` variables.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unknown or malformed values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("NBA_STATS_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);
        let timeout_secs = lookup("NBA_HTTP_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);
        let fetch_attempts = lookup("NBA_FETCH_ATTEMPTS")
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_FETCH_ATTEMPTS)
            .clamp(1, 8);
        let backoff_ms = lookup("NBA_RETRY_BACKOFF_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_BACKOFF_MS)
            .min(10_000);

        let first = lookup("NBA_FIRST_SEASON")
            .and_then(|val| val.parse::<SeasonId>().ok())
            .unwrap_or(SeasonId(FIRST_SEASON));
        let last = lookup("NBA_LAST_SEASON")
            .and_then(|val| val.parse::<SeasonId>().ok())
            .unwrap_or(defaults.seasons.last);
        let seasons = SeasonRange::new(first, last);
        let default_season = lookup("NBA_DEFAULT_SEASON")
            .and_then(|val| val.parse::<SeasonId>().ok())
            .filter(|season| seasons.contains(*season))
            .unwrap_or(seasons.last);

        let export_path = lookup("NBA_EXPORT_PATH")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.export_path);

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            fetch_attempts,
            retry_backoff: Duration::from_millis(backoff_ms),
            seasons,
            default_season,
            export_path,
        }
    }
}
