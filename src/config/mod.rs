//! User configuration.
//!
//! Read from `~/.config/newsreel/config.toml` (platform config dir) at startup.
//! A commented default file is written the first time the reader runs.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::{KeybindingConfig, Keymap};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::controller::PagingConfig;
use crate::source::NewsApiConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: NewsApiConfig,
    pub paging: PagingConfig,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

impl Config {
    /// Load from the default location, creating it when missing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::write_default(path)?;
            info!("Wrote default configuration to {}", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("newsreel").join("config.toml"))
    }

    fn write_default(path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, DEFAULT_CONFIG).map_err(io_error)
    }
}

const DEFAULT_CONFIG: &str = r##"# newsreel configuration
#
# Every key is optional; anything left out keeps the value shown here.

[api]
# Get a key at https://newsapi.org. NEWSREEL_API_KEY or --api-key override it.
api_key = ""
base_url = "https://newsapi.org/v2"
# Country used for top headlines when no search query is set.
country = "us"
timeout_secs = 10

[paging]
# Articles per request.
page_size = 20
# Load the next page once this many items or fewer remain below the selection.
prefetch_distance = 2

[colors]
# Named colours (Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray, DarkGray,
# LightRed, LightGreen, LightYellow, LightBlue, LightMagenta, LightCyan, White,
# Reset) or hex "#RRGGBB" / "#RGB".
active_border = "Cyan"
inactive_border = "DarkGray"
selection_bg = "Cyan"
selection_fg = "Black"
title = "White"
metadata_source = "Green"
metadata_date = "Yellow"
metadata_link = "Blue"
footer = "DarkGray"
error = "LightRed"
notice = "LightYellow"
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
# Single characters ("r", "/"), named keys (Enter, Esc, Tab, BackTab, Home, End,
# PageUp, PageDown, Up, Down, Left, Right, Space, F1-F12) and modifiers
# ("Ctrl+c", "Alt+Enter").
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
page_up = ["PageUp"]
page_down = ["PageDown"]
jump_top = ["g", "Home"]
jump_bottom = ["G", "End"]
next_pane = ["Tab"]
prev_pane = ["BackTab"]
open_in_browser = ["o"]
refresh = ["R"]
retry = ["r"]
search = ["/"]
toggle_maximize = ["m"]
"##;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_default_file_matches_defaults() {
        let config = Config::parse(DEFAULT_CONFIG).expect("default config should parse");
        let defaults = Config::default();

        assert_eq!(config.api.base_url, defaults.api.base_url);
        assert_eq!(config.api.country, "us");
        assert_eq!(config.paging.page_size, 20);
        assert_eq!(config.paging.prefetch_distance, 2);
        assert_eq!(config.colors.error, defaults.colors.error);
        assert_eq!(config.keybindings.retry, defaults.keybindings.retry);
        assert_eq!(config.keybindings.search, vec!["/"]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r##"
[api]
api_key = "secret"

[paging]
page_size = 50

[colors]
error = "#f00"
"##,
        )
        .unwrap();

        assert_eq!(config.api.api_key, "secret");
        assert_eq!(config.api.country, "us");
        assert_eq!(config.paging.page_size, 50);
        assert_eq!(config.paging.prefetch_distance, 2);
        assert_eq!(config.colors.error, Color::Rgb(255, 0, 0));
        assert_eq!(config.colors.notice, Color::LightYellow);
    }

    #[test]
    fn test_invalid_color_is_parse_error() {
        assert!(Config::parse("[colors]\nerror = \"mauve-ish\"\n").is_err());
    }

    #[test]
    fn test_first_run_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.paging.page_size, 20);
        assert!(path.exists());

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, DEFAULT_CONFIG);
        Config::load_from(&path).unwrap();
    }

    #[test]
    fn test_broken_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[paging\npage_size = ").unwrap();

        match Config::load_from(&path) {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
