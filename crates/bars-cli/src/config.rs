//! Layered run configuration: built-in defaults, then an optional TOML file,
//! then command-line flags.
//!
//! ```toml
//! [report]
//! title = "Biologic Response Report"
//! max_rows = 60
//! feedback_url = "https://example.org/feedback"
//!
//! [charts]
//! width = 800
//! height = 500
//! histogram_bins = 10
//!
//! [output]
//! directory = "results"
//! format = "both"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use bars_report::ChartOptions;
use bars_report::pdf::{DEFAULT_MAX_ROWS, DEFAULT_TITLE};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "bars.toml";

/// Smallest chart raster edge in pixels.
pub const MIN_CHART_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarsConfig {
    pub report: ReportConfig,
    pub charts: ChartConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    /// Patient rows shown in the PDF summary table.
    pub max_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_url: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            max_rows: DEFAULT_MAX_ROWS,
            feedback_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub histogram_bins: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let options = ChartOptions::default();
        Self {
            width: options.width,
            height: options.height,
            histogram_bins: options.histogram_bins,
        }
    }
}

impl ChartConfig {
    pub fn options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
            histogram_bins: self.histogram_bins,
        }
    }
}

/// Which tabular exports are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
    #[default]
    Both,
}

impl OutputFormat {
    pub fn csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    pub fn json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    pub format: OutputFormat,
}

impl BarsConfig {
    /// Parses a config file. Every section and key is optional.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.charts.histogram_bins == 0 {
            bail!("charts.histogram_bins must be at least 1");
        }
        if self.charts.width < MIN_CHART_SIZE || self.charts.height < MIN_CHART_SIZE {
            bail!(
                "charts.width and charts.height must be at least {MIN_CHART_SIZE} pixels, got {}x{}",
                self.charts.width,
                self.charts.height
            );
        }
        Ok(())
    }
}

/// Loads the configuration for a run.
///
/// An explicit path must load. The implicit `bars.toml` is optional and a
/// broken one falls back to the defaults with a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<BarsConfig> {
    if let Some(path) = explicit {
        let config = BarsConfig::from_path(path)?;
        debug!(path = %path.display(), "loaded config");
        return Ok(config);
    }
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if !path.is_file() {
        return Ok(BarsConfig::default());
    }
    match BarsConfig::from_path(path) {
        Ok(config) => {
            debug!(path = %path.display(), "loaded config");
            Ok(config)
        }
        Err(error) => {
            warn!(path = %path.display(), error = %format!("{error:#}"), "ignoring config file");
            Ok(BarsConfig::default())
        }
    }
}
