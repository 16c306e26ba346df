//! Configuration file loading for terminal chess.
//!
//! Settings come from `terminal-chess.toml` in the working directory, or from
//! the file named on the command line. Every field has a default, so an empty
//! or missing file gives a playable setup.

use crate::render::GlyphStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Player names, PGN headers and display settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Name recorded for the White player. Defaults to "White".
    #[serde(default = "default_white")]
    pub white: String,
    /// Name recorded for the Black player. Defaults to "Black".
    #[serde(default = "default_black")]
    pub black: String,
    /// PGN `Event` header. Defaults to "Casual Game".
    #[serde(default = "default_event")]
    pub event: String,
    /// PGN `Site` header. Defaults to "?".
    #[serde(default = "default_unknown")]
    pub site: String,
    /// PGN `Round` header. Defaults to "?".
    #[serde(default = "default_unknown")]
    pub round: String,
    /// Draw the board with ASCII letters instead of chess glyphs.
    #[serde(default)]
    pub ascii: bool,
    /// Directory where finished games are saved as PGN.
    /// Games are not saved unless this or `--record` is given.
    #[serde(default)]
    pub pgn_dir: Option<PathBuf>,
}

fn default_white() -> String {
    "White".to_string()
}

fn default_black() -> String {
    "Black".to_string()
}

fn default_event() -> String {
    "Casual Game".to_string()
}

fn default_unknown() -> String {
    "?".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            white: default_white(),
            black: default_black(),
            event: default_event(),
            site: default_unknown(),
            round: default_unknown(),
            ascii: false,
            pgn_dir: None,
        }
    }
}

impl Config {
    /// File looked up in the working directory when no path is given.
    pub const FILE_NAME: &'static str = "terminal-chess.toml";

    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default file is read
    /// if present and defaults are used otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// or [`ConfigError::ParseError`] if it contains invalid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reads and parses the file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Returns the path to the default configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from(Self::FILE_NAME)
    }

    pub fn glyph_style(&self) -> GlyphStyle {
        if self.ascii {
            GlyphStyle::Ascii
        } else {
            GlyphStyle::Unicode
        }
    }
}
