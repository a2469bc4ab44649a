use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Artifact shape produced by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown export format `{0}` (expected csv or json)")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// How the pagination driver recognises the "next page" control among the
/// candidates inside the pagination region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextControlSpec {
    /// A descendant `<path d="...">` contains this fragment.
    SvgPath { fragment: String },
    /// The control carries `name="value"`.
    Attribute { name: String, value: String },
    /// The control's trimmed text equals `text` (case-insensitive).
    Text { text: String },
}

impl Default for NextControlSpec {
    fn default() -> Self {
        NextControlSpec::SvgPath {
            fragment: "M4.64645 14.3536".to_string(),
        }
    }
}

/// Immutable configuration for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Lower bound of the jittered wait after activating the next control.
    pub min_wait_ms: u64,
    /// Upper bound of the jittered wait; values below `min_wait_ms` are raised to it.
    pub max_wait_ms: u64,
    pub table_selector: String,
    /// Region holding the pagination controls.
    pub pagination_selector: String,
    /// Candidate controls inside the pagination region.
    pub control_selector: String,
    /// Elements that mean "still loading" while visible.
    pub loading_selector: String,
    pub next_control: NextControlSpec,
    pub export_format: ExportFormat,
    /// Readiness checks before a page is declared a load timeout.
    pub load_attempts: u32,
    /// Fixed backoff between readiness checks.
    pub load_poll_ms: u64,
    /// Upper bound on page advances in one run.
    pub max_pagination_attempts: u32,
    /// Leading part of exported file names.
    pub file_prefix: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            min_wait_ms: 3_000,
            max_wait_ms: 5_000,
            table_selector: r#"table, [class*="table"]"#.to_string(),
            pagination_selector: r#"ul[class*="table_footer"]"#.to_string(),
            control_selector: "li button, li a".to_string(),
            loading_selector: r#"[class*="loading"], [class*="spinner"]"#.to_string(),
            next_control: NextControlSpec::default(),
            export_format: ExportFormat::Csv,
            load_attempts: 10,
            load_poll_ms: 1_000,
            max_pagination_attempts: 100,
            file_prefix: "table_data".to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Inclusive wait window in milliseconds, normalised so `min <= max`.
    pub fn wait_window(&self) -> (u64, u64) {
        (self.min_wait_ms, self.max_wait_ms.max(self.min_wait_ms))
    }
}

/// Options loaded once per page context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub auto_start: bool,
    pub show_ui: bool,
    pub debug_mode: bool,
    /// Persist artifacts without asking for a destination.
    pub auto_download: bool,
    pub max_pagination_attempts: u32,
    /// Minimum delay between page navigations.
    pub pagination_delay_ms: u64,
    pub default_format: ExportFormat,
    pub scrape: ScrapeConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_start: false,
            show_ui: true,
            debug_mode: false,
            auto_download: false,
            max_pagination_attempts: 100,
            pagination_delay_ms: 2_000,
            default_format: ExportFormat::Json,
            scrape: ScrapeConfig::default(),
        }
    }
}

impl Settings {
    /// Run configuration for `format`, with the top-level pagination options applied.
    pub fn scrape_config(&self, format: ExportFormat) -> ScrapeConfig {
        let mut config = self.scrape.clone();
        config.export_format = format;
        config.max_pagination_attempts = self.max_pagination_attempts;
        config.min_wait_ms = config.min_wait_ms.max(self.pagination_delay_ms);
        config.max_wait_ms = config.max_wait_ms.max(config.min_wait_ms);
        config
    }
}
