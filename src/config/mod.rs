use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use crate::errors::ConfigError;
use crate::models::RecordKind;
use defaults::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Where snapshots and reports live. File names are resolved against
/// `data_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_films_file")]
    pub films_file: String,
    #[serde(default = "default_sessions_file")]
    pub sessions_file: String,
    #[serde(default = "default_tickets_file")]
    pub tickets_file: String,
    #[serde(default = "default_text_snapshot_file")]
    pub text_snapshot_file: String,
    #[serde(default = "default_html_report_file")]
    pub html_report_file: String,
    /// Report written by the pipeline's Reporter stage
    #[serde(default = "default_pipeline_report_file")]
    pub pipeline_report_file: String,
    #[serde(default = "default_printable_report_file")]
    pub printable_report_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Simulated I/O latency of the Loader stage
    #[serde(default = "default_loader_delay", with = "duration_serde::duration")]
    pub loader_delay: Duration,
    /// Text the Editor stage appends to processed records
    #[serde(default = "default_marker_suffix")]
    pub marker_suffix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Flat price per ticket used for income estimates
    #[serde(default = "default_unit_price")]
    pub unit_price: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_films_file() -> String {
    DEFAULT_FILMS_FILE.to_string()
}

fn default_sessions_file() -> String {
    DEFAULT_SESSIONS_FILE.to_string()
}

fn default_tickets_file() -> String {
    DEFAULT_TICKETS_FILE.to_string()
}

fn default_text_snapshot_file() -> String {
    DEFAULT_TEXT_SNAPSHOT_FILE.to_string()
}

fn default_html_report_file() -> String {
    DEFAULT_HTML_REPORT_FILE.to_string()
}

fn default_pipeline_report_file() -> String {
    DEFAULT_PIPELINE_REPORT_FILE.to_string()
}

fn default_printable_report_file() -> String {
    DEFAULT_PRINTABLE_REPORT_FILE.to_string()
}

fn default_loader_delay() -> Duration {
    Duration::from_millis(DEFAULT_LOADER_DELAY_MS)
}

fn default_marker_suffix() -> String {
    DEFAULT_MARKER_SUFFIX.to_string()
}

fn default_unit_price() -> u64 {
    DEFAULT_UNIT_PRICE
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            films_file: default_films_file(),
            sessions_file: default_sessions_file(),
            tickets_file: default_tickets_file(),
            text_snapshot_file: default_text_snapshot_file(),
            html_report_file: default_html_report_file(),
            pipeline_report_file: default_pipeline_report_file(),
            printable_report_file: default_printable_report_file(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            loader_delay: default_loader_delay(),
            marker_suffix: default_marker_suffix(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            unit_price: default_unit_price(),
            currency: default_currency(),
        }
    }
}

impl StorageConfig {
    /// Storage rooted at `data_dir` with default file names
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn resolve(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Markup snapshot file for one record kind
    pub fn markup_path(&self, kind: RecordKind) -> PathBuf {
        match kind {
            RecordKind::Film => self.resolve(&self.films_file),
            RecordKind::Session => self.resolve(&self.sessions_file),
            RecordKind::Ticket => self.resolve(&self.tickets_file),
        }
    }

    pub fn text_snapshot_path(&self) -> PathBuf {
        self.resolve(&self.text_snapshot_file)
    }

    pub fn html_report_path(&self) -> PathBuf {
        self.resolve(&self.html_report_file)
    }

    pub fn pipeline_report_path(&self) -> PathBuf {
        self.resolve(&self.pipeline_report_file)
    }

    pub fn printable_report_path(&self) -> PathBuf {
        self.resolve(&self.printable_report_file)
    }
}

impl Config {
    /// Defaults with every file rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageConfig::in_dir(data_dir),
            ..Self::default()
        }
    }

    /// Load configuration from `config_file`, writing a default file first if
    /// none exists. `CINEMA_ADMIN_*` environment variables override file
    /// values (nested keys separated by `__`).
    pub fn load_from_file(config_file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_file = config_file.as_ref();
        if !config_file.exists() {
            let contents = toml::to_string_pretty(&Self::default())?;
            std::fs::write(config_file, contents).map_err(|source| ConfigError::Write {
                path: config_file.to_path_buf(),
                source,
            })?;
            info!("Created default config file: {}", config_file.display());
        }

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Extract(Box::new(e)))
    }
}
