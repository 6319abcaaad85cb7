//! Run configuration.
//!
//! The configuration covers how many rows each table gets, which seed drives
//! the random stream, and where the outputs go.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TrendsError};

/// Default number of rows per table.
pub const DEFAULT_ROW_COUNT: usize = 1000;
/// Default seed of the random stream.
pub const DEFAULT_SEED: u64 = 42;

/// Controls table generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Rows generated for each table.
    pub row_count: usize,
    /// Seed fixed once at process start.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            row_count: DEFAULT_ROW_COUNT,
            seed: DEFAULT_SEED,
        }
    }
}

impl GeneratorConfig {
    /// Sets the number of rows per table.
    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = row_count;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Where and what to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving every output file.
    pub directory: PathBuf,
    /// File name of the usage table export.
    pub usage_csv: String,
    /// File name of the engagement table export.
    pub engagement_csv: String,
    /// File name of the chart dashboard.
    pub dashboard_png: String,
    /// File name of the correlation heatmaps.
    pub heatmap_png: String,
    /// Whether to write the CSV exports.
    pub export_csv: bool,
    /// Whether to render charts.
    pub render_charts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            usage_csv: "ott_platform_data.csv".to_string(),
            engagement_csv: "social_media_data.csv".to_string(),
            dashboard_png: "digital_media_analysis.png".to_string(),
            heatmap_png: "correlation_heatmaps.png".to_string(),
            export_csv: true,
            render_charts: cfg!(feature = "charts"),
        }
    }
}

impl OutputConfig {
    /// Creates a configuration writing into `directory`.
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Configuration that writes nothing.
    pub fn disabled() -> Self {
        Self {
            export_csv: false,
            render_charts: false,
            ..Self::default()
        }
    }

    /// Sets whether to write the CSV exports.
    pub fn with_export(mut self, enabled: bool) -> Self {
        self.export_csv = enabled;
        self
    }

    /// Sets whether to render charts.
    pub fn with_charts(mut self, enabled: bool) -> Self {
        self.render_charts = enabled;
        self
    }

    /// Full path of the usage export.
    pub fn usage_csv_path(&self) -> PathBuf {
        self.directory.join(&self.usage_csv)
    }

    /// Full path of the engagement export.
    pub fn engagement_csv_path(&self) -> PathBuf {
        self.directory.join(&self.engagement_csv)
    }

    /// Full path of the chart dashboard.
    pub fn dashboard_path(&self) -> PathBuf {
        self.directory.join(&self.dashboard_png)
    }

    /// Full path of the heatmap image.
    pub fn heatmap_path(&self) -> PathBuf {
        self.directory.join(&self.heatmap_png)
    }

    /// Output directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Format of the printed report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Markdown,
}

/// Complete configuration of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub generator: GeneratorConfig,
    pub output: OutputConfig,
    pub format: OutputFormat,
}

impl AnalysisConfig {
    /// Sets the generator configuration.
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Sets the output configuration.
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Sets the report format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Checks the configuration for values that would fail later.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("usage_csv", &self.output.usage_csv),
            ("engagement_csv", &self.output.engagement_csv),
            ("dashboard_png", &self.output.dashboard_png),
            ("heatmap_png", &self.output.heatmap_png),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(TrendsError::Configuration(format!(
                    "output file name '{key}' must not be empty"
                )));
            }
        }

        if self.output.usage_csv == self.output.engagement_csv {
            return Err(TrendsError::Configuration(format!(
                "both tables would be exported to '{}'",
                self.output.usage_csv
            )));
        }

        if self.output.render_charts && !cfg!(feature = "charts") {
            return Err(TrendsError::Configuration(
                "chart rendering requested but the 'charts' feature is disabled".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.generator.row_count, 1000);
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.format, OutputFormat::Human);
        assert!(config.output.export_csv);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = AnalysisConfig::default()
            .with_generator(GeneratorConfig::default().with_row_count(5).with_seed(7))
            .with_output(OutputConfig::in_directory("out").with_charts(false))
            .with_format(OutputFormat::Json);

        assert_eq!(config.generator.row_count, 5);
        assert_eq!(config.generator.seed, 7);
        assert_eq!(
            config.output.usage_csv_path(),
            PathBuf::from("out").join("ott_platform_data.csv")
        );
        assert!(!config.output.render_charts);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_empty_file_name() {
        let mut config = AnalysisConfig::default();
        config.output.heatmap_png = " ".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, TrendsError::Configuration(_)));
    }

    #[test]
    fn test_rejects_colliding_exports() {
        let mut config = AnalysisConfig::default();
        config.output.engagement_csv = config.output.usage_csv.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_output() {
        let output = OutputConfig::disabled();
        assert!(!output.export_csv);
        assert!(!output.render_charts);
    }

    #[test]
    fn test_format_serializes_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Markdown).unwrap();
        assert_eq!(json, "\"markdown\"");
    }
}
