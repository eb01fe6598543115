use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::ReplaceOptions;
use crate::error::{Error, Result};
use crate::export::ExportOptions;

/// User configuration for odtblocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level name: off, error, warn, info, debug or trace
    pub log_level: String,

    /// Pretty-print the inventory JSON
    pub pretty_json: bool,

    /// Spaces per level when rewriting XML members (0 = no indentation).
    /// Indenting inserts whitespace between inline elements of a paragraph,
    /// which renders as a visible space.
    pub xml_indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            pretty_json: true,
            xml_indent: 2,
        }
    }
}

impl Config {
    /// Load config from the user config directory
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }

        // Return defaults if no config found
        Ok(Config::default())
    }

    /// Load config from an explicit file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("odtblocks").join("config.toml"))
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }

    pub fn replace_options(&self) -> ReplaceOptions {
        ReplaceOptions {
            xml_indent: self.xml_indent,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            pretty: self.pretty_json,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(Error::Config(format!(
                "unknown log_level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }
}
