//! Analysis options.
//!
//! Options start from [`AnalysisOptions::default`], may be replaced by a
//! JSON file, and are then overridden by `MOVIEROI_*` environment
//! variables (the binary also loads a `.env` file first).
//!
//! ```json
//! { "genres": ["Drama", "Sci-Fi"], "year_from": 1990, "format": "json" }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult, InputResult};
use crate::models::Genre;

pub const ENV_YEAR_FROM: &str = "MOVIEROI_YEAR_FROM";
pub const ENV_FORMAT: &str = "MOVIEROI_FORMAT";
pub const ENV_GENRES: &str = "MOVIEROI_GENRES";
pub const ENV_TOP_N: &str = "MOVIEROI_TOP_N";
pub const ENV_MINIMUM_ROI: &str = "MOVIEROI_MINIMUM_ROI";

/// Output file format for derived tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "format".into(),
                value: s.to_string(),
            }),
        }
    }
}

/// Options for the analysis pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Genres for the genre-by-year views (empty = all)
    pub genres: Vec<Genre>,

    /// First year kept in the genre-by-year pivot
    pub year_from: i64,

    /// Output format for written tables
    pub format: OutputFormat,

    /// Default ranking length
    pub top_n: usize,

    /// Default ranking threshold on ROI
    pub minimum_roi: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            year_from: 1980,
            format: OutputFormat::Csv,
            top_n: 10,
            minimum_roi: 0.0,
        }
    }
}

/// Parse a comma-separated genre list. Blank input means "all genres".
pub fn parse_genres(list: &str) -> InputResult<Vec<Genre>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Genre::from_str)
        .collect()
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

impl AnalysisOptions {
    /// Read options from a JSON file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply overrides from `(name, value)` pairs; unrelated names are ignored.
    pub fn apply_vars<I, K, V>(mut self, vars: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                ENV_YEAR_FROM => {
                    self.year_from = value.trim().parse().map_err(|_| invalid(key, value))?;
                }
                ENV_FORMAT => {
                    self.format = value.parse().map_err(|_| invalid(key, value))?;
                }
                ENV_GENRES => {
                    self.genres = parse_genres(value).map_err(|_| invalid(key, value))?;
                }
                ENV_TOP_N => {
                    self.top_n = value.trim().parse().map_err(|_| invalid(key, value))?;
                }
                ENV_MINIMUM_ROI => {
                    self.minimum_roi = value
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| invalid(key, value))?;
                }
                _ => {}
            }
        }
        Ok(self)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> ConfigResult<Self> {
        self.apply_vars(std::env::vars())
    }

    /// Defaults, then the optional file, then the environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.apply_env()
    }
}
