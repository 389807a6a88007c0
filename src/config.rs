use std::{env, path::PathBuf};

pub const DEFAULT_ANALYSIS_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash-preview-05-20";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub analysis_url: String,
    pub analysis_model: String,
    pub analysis_api_key: String,
    /// How long the presentation layer should wait before showing the closing line.
    pub follow_up_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            data_path: PathBuf::from("data/state.json"),
            analysis_url: DEFAULT_ANALYSIS_URL.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            analysis_api_key: String::new(),
            follow_up_delay_ms: 1500,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parsed("PORT").unwrap_or(defaults.port),
            data_path: non_empty("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            analysis_url: non_empty("ANALYSIS_API_URL").unwrap_or(defaults.analysis_url),
            analysis_model: non_empty("ANALYSIS_MODEL").unwrap_or(defaults.analysis_model),
            analysis_api_key: env::var("ANALYSIS_API_KEY").unwrap_or(defaults.analysis_api_key),
            follow_up_delay_ms: parsed("FOLLOW_UP_DELAY_MS").unwrap_or(defaults.follow_up_delay_ms),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}
