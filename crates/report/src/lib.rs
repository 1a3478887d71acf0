//! Report rendering for Guesstimate.
//!
//! Turns an estimation and its configuration into a [`Report`] holding every
//! computed value, then renders it as Markdown, JSON or YAML.

#![warn(missing_docs)]

pub mod output;
pub mod markdown;

use guesstimate_core::{Config, Estimation};
use tracing::debug;

pub use markdown::to_markdown;
pub use output::{CostDetail, CostReport, Report, StatisticsReport, TaskReport, COST_CONFIDENCE};

/// Error type for report rendering.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while rendering a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Text formatting error
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Unsupported format name
    #[error("unknown report format '{0}' (expected markdown, json or yaml)")]
    UnknownFormat(String),
}

/// Output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human readable document
    #[default]
    Markdown,
    /// Pretty printed JSON
    Json,
    /// YAML
    Yaml,
}

impl std::str::FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

/// Render `estimation` in `format`.
pub fn render(estimation: &Estimation, config: &Config, format: ReportFormat) -> Result<String> {
    debug!(estimation = %estimation.id, %format, "rendering report");
    let report = Report::build(estimation, config);

    match format {
        ReportFormat::Markdown => to_markdown(&report),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(&report)? + "\n"),
        ReportFormat::Yaml => Ok(serde_yaml::to_string(&report)?),
    }
}
