use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::theme::ThemeMode;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w342";

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "moviebrowser", "movie-browser")
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TmdbSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_TMDB_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            image_base_url: default_image_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Keyword/genre content policy. Off unless switched on in config.json.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContentFilterSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_excluded_genres")]
    pub excluded_genres: Vec<u32>,
    #[serde(default = "default_blocked_keywords")]
    pub blocked_keywords: Vec<String>,
}

fn default_excluded_genres() -> Vec<u32> {
    vec![10749, 99] // Romance, Documentary
}

fn default_blocked_keywords() -> Vec<String> {
    ["desire", "stepmom", "affair", "lust", "erotic", "sex", "seduction"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ContentFilterSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            excluded_genres: default_excluded_genres(),
            blocked_keywords: default_blocked_keywords(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub tmdb: TmdbSettings,
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default)]
    pub content_filter: ContentFilterSettings,
    /// Overrides the credentials file location
    #[serde(default)]
    pub users_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|p| p.config_dir().join("config.json"))
    }

    pub fn load() -> Result<Self, anyhow::Error> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                serde_json::from_str(&content)?
            }
            _ => AppConfig::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// `TMDB_API_KEY` and `TMDB_BASE_URL` take precedence over the file.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("TMDB_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.tmdb.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = var("TMDB_BASE_URL").filter(|u| !u.trim().is_empty()) {
            self.tmdb.base_url = url.trim().to_string();
        }
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(proj_dirs) = project_dirs() {
            let config_dir = proj_dirs.config_dir();
            fs::create_dir_all(config_dir)?;
            let content = serde_json::to_string_pretty(self)?;
            fs::write(config_dir.join("config.json"), content)?;
        }
        Ok(())
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
        let _ = self.save();
    }

    pub fn has_api_key(&self) -> bool {
        self.tmdb.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn users_path(&self) -> Option<PathBuf> {
        self.users_file
            .clone()
            .or_else(|| project_dirs().map(|p| p.config_dir().join("users.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"tmdb": {"api_key": "abc"}}"#).unwrap();
        assert_eq!(config.tmdb.base_url, DEFAULT_TMDB_BASE_URL);
        assert_eq!(config.tmdb.api_key.as_deref(), Some("abc"));
        assert_eq!(config.tmdb.timeout_secs, 15);
        assert!(!config.content_filter.enabled);
        assert!(config.content_filter.excluded_genres.contains(&99));
    }

    #[test]
    fn test_env_overrides_win() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| match key {
            "TMDB_API_KEY" => Some(" from-env ".to_string()),
            "TMDB_BASE_URL" => Some("http://localhost:9000/3".to_string()),
            _ => None,
        });
        assert_eq!(config.tmdb.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.tmdb.base_url, "http://localhost:9000/3");
        assert!(config.has_api_key());
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|_| Some("  ".to_string()));
        assert!(!config.has_api_key());
        assert_eq!(config.tmdb.base_url, DEFAULT_TMDB_BASE_URL);
    }
}
