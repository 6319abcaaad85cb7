//! Report formatting.
//!
//! A [`TrendReport`] is rendered by one of three formatters: plain text for
//! terminals, JSON for machines, or Markdown for documents. All of them honour
//! a shared [`FormatterConfig`].
//!
//! # Examples
//!
//! ```rust
//! use media_trends::formatters::{HumanFormatter, ReportFormatter};
//! use media_trends::generator::generate_tables;
//! use media_trends::config::GeneratorConfig;
//! use media_trends::report::{ReportOptions, TrendReport};
//!
//! let tables = generate_tables(&GeneratorConfig::default().with_row_count(20)).unwrap();
//! let report = TrendReport::build(&tables.usage, &tables.engagement, &ReportOptions::default()).unwrap();
//! let text = HumanFormatter::new().format(&report).unwrap();
//! assert!(text.contains("KEY FINDINGS"));
//! ```

use serde_json::Value;
use std::fmt::Write;
use std::io;

use crate::analyzers::{
    ColumnStatistics, CorrelationMatrix, GroupedAggregate, GroupedMean, TableProfile,
    TableStatistics, ValueCounts,
};
use crate::config::OutputFormat;
use crate::error::Result;
use crate::report::{FindingCategory, TrendReport};

const RULE_WIDTH: usize = 80;

/// Configuration options for formatting a report.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include table shapes, column types and previews
    pub include_exploration: bool,
    /// Include per-column descriptive statistics
    pub include_statistics: bool,
    /// Include correlation matrices
    pub include_correlations: bool,
    /// Maximum preview rows to display per table
    pub preview_rows: usize,
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
    /// Whether to include timestamps in output
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_exploration: true,
            include_statistics: true,
            include_correlations: true,
            preview_rows: 5,
            use_colors: true,
            include_timestamps: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only trends and findings.
    pub fn minimal() -> Self {
        Self {
            include_exploration: false,
            include_statistics: false,
            include_correlations: false,
            preview_rows: 0,
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Creates a detailed configuration showing everything.
    pub fn detailed() -> Self {
        Self::default()
    }

    /// Creates a configuration suitable for CI logs and diffs.
    pub fn ci() -> Self {
        Self {
            include_exploration: true,
            include_statistics: true,
            include_correlations: true,
            preview_rows: 3,
            use_colors: false,
            include_timestamps: false,
        }
    }

    pub fn with_exploration(mut self, include: bool) -> Self {
        self.include_exploration = include;
        self
    }

    pub fn with_statistics(mut self, include: bool) -> Self {
        self.include_statistics = include;
        self
    }

    pub fn with_correlations(mut self, include: bool) -> Self {
        self.include_correlations = include;
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Sets whether to use colorized output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_timestamps(mut self, include: bool) -> Self {
        self.include_timestamps = include;
        self
    }
}

/// Renders a [`TrendReport`] as text.
///
/// # Examples
///
/// ```rust
/// use media_trends::formatters::ReportFormatter;
/// use media_trends::report::TrendReport;
///
/// struct TitleOnly;
///
/// impl ReportFormatter for TitleOnly {
///     fn format(&self, report: &TrendReport) -> media_trends::error::Result<String> {
///         Ok(report.metadata.title.clone())
///     }
/// }
/// ```
pub trait ReportFormatter {
    /// Formats a report into a string.
    fn format(&self, report: &TrendReport) -> Result<String>;

    /// Formats a report with a custom configuration.
    fn format_with_config(&self, report: &TrendReport, _config: &FormatterConfig) -> Result<String> {
        self.format(report)
    }
}

/// Returns the formatter for `format`.
pub fn formatter_for(format: OutputFormat, config: FormatterConfig) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Human => Box::new(HumanFormatter::with_config(config)),
        OutputFormat::Json => Box::new(JsonFormatter::with_config(config)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::with_config(config)),
    }
}

/// Writes rendered report text and a trailing newline to `sink`.
///
/// A reader that closes the pipe early (`media-trends | head`) ends the
/// output quietly; every other write failure is an error.
pub fn write_report<W: io::Write>(mut sink: W, text: &str) -> Result<()> {
    let written = io::Write::write_all(&mut sink, text.as_bytes())
        .and_then(|()| io::Write::write_all(&mut sink, b"\n"))
        .and_then(|()| io::Write::flush(&mut sink));
    match written {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}

/// Formats reports as JSON, dropping sections the configuration excludes.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::with_config(FormatterConfig::default())
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &TrendReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &TrendReport, config: &FormatterConfig) -> Result<String> {
        let value = filter_report_for_config(serde_json::to_value(report)?, config);
        let json = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(json)
    }
}

fn filter_report_for_config(mut value: Value, config: &FormatterConfig) -> Value {
    let Some(root) = value.as_object_mut() else {
        return value;
    };
    if !config.include_exploration {
        root.remove("exploration");
    } else if let Some(exploration) = root.get_mut("exploration").and_then(Value::as_object_mut) {
        for profile in exploration.values_mut() {
            if let Some(Value::Array(rows)) = profile.get_mut("preview") {
                rows.truncate(config.preview_rows);
            }
        }
    }
    if !config.include_statistics {
        root.remove("statistics");
    }
    if !config.include_correlations {
        root.remove("correlations");
    }
    if !config.include_timestamps {
        if let Some(metadata) = root.get_mut("metadata").and_then(Value::as_object_mut) {
            metadata.remove("generated_at");
        }
    }
    value
}

/// Formats reports as console text, optionally with ANSI colours.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self::with_config(FormatterConfig::default())
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for HumanFormatter {
    fn format(&self, report: &TrendReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &TrendReport, config: &FormatterConfig) -> Result<String> {
        let mut out = String::new();
        let style = Style {
            colors: config.use_colors,
        };
        let meta = &report.metadata;

        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "{}", style.title(&meta.title.to_uppercase()))?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            out,
            "Seed: {} | OTT records: {} | Social media records: {}",
            meta.seed, meta.usage_rows, meta.engagement_rows
        )?;
        if config.include_timestamps {
            writeln!(out, "Generated: {}", meta.generated_at.to_rfc3339())?;
        }

        if config.include_exploration {
            style.section(&mut out, "Data Exploration")?;
            write_profile(&mut out, "OTT Platform Dataset", &report.exploration.usage, config)?;
            write_profile(&mut out, "Social Media Dataset", &report.exploration.engagement, config)?;
        }

        if config.include_statistics {
            style.section(&mut out, "Statistical Analysis")?;
            write_statistics(&mut out, "OTT Platform Statistics", &report.statistics.usage)?;
            write_statistics(&mut out, "Social Media Statistics", &report.statistics.engagement)?;
        }

        style.section(&mut out, "Key Trends")?;
        writeln!(out, "\n{}", style.heading("1. OTT PLATFORM TRENDS:"))?;
        let streaming = &report.streaming;
        write_counts(&mut out, "Platform Popularity", &streaming.platform_popularity)?;
        write_means(&mut out, "Average Watch Time by Platform (hours)", &streaming.watch_time_by_platform)?;
        write_counts(&mut out, "Content Type Preferences", &streaming.content_type_preference)?;
        write_counts(&mut out, "Subscription Distribution", &streaming.subscription_distribution)?;

        writeln!(out, "\n{}", style.heading("2. SOCIAL MEDIA TRENDS:"))?;
        let social = &report.social;
        write_counts(&mut out, "Platform Popularity", &social.platform_popularity)?;
        write_means(&mut out, "Average Time Spent by Platform (minutes)", &social.time_spent_by_platform)?;
        write_counts(&mut out, "Content Category Preferences", &social.content_category_preference)?;
        write_means(&mut out, "Average Interactions by Platform", &social.interactions_by_platform)?;

        writeln!(out, "\n{}", style.heading("3. AGE GROUP INSIGHTS:"))?;
        write_means(&mut out, "OTT Watch Time by Age Group", &report.age.watch_time_by_age)?;
        write_means(&mut out, "Social Media Time by Age Group", &report.age.time_spent_by_age)?;

        style.section(&mut out, "Advanced Insights")?;
        write_aggregate(&mut out, "Device Type Analysis (OTT)", &report.advanced.device_analysis)?;
        write_means(&mut out, "Top Rated Genres", &report.advanced.genre_ratings)?;
        write_aggregate(&mut out, "Influencer Following Impact", &report.advanced.influencer_impact)?;

        if config.include_correlations {
            style.section(&mut out, "Correlations")?;
            write_matrix(&mut out, "OTT Platform Correlations", &report.correlations.usage)?;
            write_matrix(&mut out, "Social Media Correlations", &report.correlations.engagement)?;
        }

        style.section(&mut out, "KEY FINDINGS")?;
        for (index, category) in categories().into_iter().enumerate() {
            let mut findings = report.findings_in(category).peekable();
            if findings.peek().is_none() {
                continue;
            }
            writeln!(out, "\n{}. {}:", index + 1, category.to_string().to_uppercase())?;
            for finding in findings {
                writeln!(out, "   • {}", finding.message)?;
            }
        }

        style.section(&mut out, "RECOMMENDATIONS")?;
        for (index, recommendation) in report.recommendations.iter().enumerate() {
            writeln!(out, "   {}. {recommendation}", index + 1)?;
        }
        writeln!(out)?;
        Ok(out)
    }
}

struct Style {
    colors: bool,
}

impl Style {
    fn paint(&self, text: &str, code: &str) -> String {
        if self.colors {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn title(&self, text: &str) -> String {
        self.paint(text, "1;36")
    }

    fn heading(&self, text: &str) -> String {
        self.paint(text, "1")
    }

    fn section(&self, out: &mut String, name: &str) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", self.paint(name, "1;33"))?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        Ok(())
    }
}

fn categories() -> [FindingCategory; 3] {
    [
        FindingCategory::Streaming,
        FindingCategory::Social,
        FindingCategory::CrossPlatform,
    ]
}

fn write_profile(
    out: &mut String,
    title: &str,
    profile: &TableProfile,
    config: &FormatterConfig,
) -> Result<()> {
    writeln!(out, "\n--- {title} ---")?;
    writeln!(out, "Shape: ({}, {})", profile.rows, profile.columns.len())?;
    writeln!(out, "Columns:")?;
    for column in &profile.columns {
        write!(
            out,
            "   {:<22} {:<12} {:<8} missing {}",
            column.name, column.kind, column.data_type, column.null_count
        )?;
        if let Some(distinct) = column.distinct_count {
            write!(out, ", {distinct} distinct")?;
        }
        writeln!(out)?;
    }
    let rows = &profile.preview[..config.preview_rows.min(profile.preview.len())];
    if !rows.is_empty() {
        writeln!(out, "Preview:")?;
        writeln!(out, "   {}", profile.column_names().join(" | "))?;
        for row in rows {
            writeln!(out, "   {}", row.join(" | "))?;
        }
    }
    Ok(())
}

fn write_statistics(out: &mut String, title: &str, stats: &TableStatistics) -> Result<()> {
    writeln!(out, "\n--- {title} ---")?;
    writeln!(
        out,
        "   {:<20} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    )?;
    for column in &stats.columns {
        writeln!(out, "   {}", statistics_row(column))?;
    }
    Ok(())
}

fn statistics_row(column: &ColumnStatistics) -> String {
    let cells = [
        column.mean,
        column.std_dev,
        column.min,
        column.q25,
        column.median,
        column.q75,
        column.max,
    ]
    .map(|value| format!("{:>10}", number(value)));
    format!("{:<20} {:>7} {}", column.column, column.count, cells.join(" "))
}

fn write_counts(out: &mut String, title: &str, counts: &ValueCounts) -> Result<()> {
    writeln!(out, "\n{title}:")?;
    if counts.is_empty() {
        writeln!(out, "   (no rows)")?;
    }
    for entry in &counts.entries {
        writeln!(out, "   {:<20} {:>6}", entry.label, entry.count)?;
    }
    Ok(())
}

fn write_means(out: &mut String, title: &str, means: &GroupedMean) -> Result<()> {
    writeln!(out, "\n{title}:")?;
    if means.is_empty() {
        writeln!(out, "   (no rows)")?;
    }
    for group in &means.groups {
        writeln!(out, "   {:<20} {:>10.2}", group.label, group.mean)?;
    }
    Ok(())
}

fn write_aggregate(out: &mut String, title: &str, aggregate: &GroupedAggregate) -> Result<()> {
    writeln!(out, "\n{title} ({}):", aggregate.function)?;
    write!(out, "   {:<20}", aggregate.group_column)?;
    for column in &aggregate.value_columns {
        write!(out, " {column:>18}")?;
    }
    writeln!(out)?;
    for row in &aggregate.rows {
        write!(out, "   {:<20}", row.label)?;
        for value in &row.values {
            write!(out, " {value:>18.2}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_matrix(out: &mut String, title: &str, matrix: &CorrelationMatrix) -> Result<()> {
    writeln!(out, "\n{title}:")?;
    write!(out, "   {:<20}", "")?;
    for column in &matrix.columns {
        write!(out, " {column:>18}")?;
    }
    writeln!(out)?;
    for (column, row) in matrix.columns.iter().zip(&matrix.coefficients) {
        write!(out, "   {column:<20}")?;
        for value in row {
            write!(out, " {:>18}", number(*value))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Formats reports as Markdown with a configurable heading level.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self::with_config(FormatterConfig::default())
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 2,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 5);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &TrendReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &TrendReport, config: &FormatterConfig) -> Result<String> {
        let mut out = String::new();
        let h = "#".repeat(self.heading_level as usize);
        let meta = &report.metadata;

        writeln!(out, "{h} {}", meta.title)?;
        writeln!(out)?;
        writeln!(out, "**Seed:** {}  ", meta.seed)?;
        writeln!(out, "**OTT records:** {}  ", meta.usage_rows)?;
        writeln!(out, "**Social media records:** {}  ", meta.engagement_rows)?;
        if config.include_timestamps {
            writeln!(out, "**Generated:** {}  ", meta.generated_at.to_rfc3339())?;
        }

        if config.include_exploration {
            writeln!(out, "\n{h}# Data Exploration")?;
            for (title, profile) in [
                ("OTT Platform Dataset", &report.exploration.usage),
                ("Social Media Dataset", &report.exploration.engagement),
            ] {
                writeln!(out, "\n{h}## {title}\n")?;
                writeln!(out, "Shape: {} rows × {} columns\n", profile.rows, profile.columns.len())?;
                writeln!(out, "| Column | Kind | Type | Missing |")?;
                writeln!(out, "|--------|------|------|---------|")?;
                for column in &profile.columns {
                    writeln!(
                        out,
                        "| {} | {} | {} | {} |",
                        column.name, column.kind, column.data_type, column.null_count
                    )?;
                }
            }
        }

        if config.include_statistics {
            writeln!(out, "\n{h}# Statistical Analysis")?;
            for stats in [&report.statistics.usage, &report.statistics.engagement] {
                writeln!(out, "\n{h}## {}\n", stats.table)?;
                writeln!(out, "| Column | Count | Mean | Std | Min | 25% | 50% | 75% | Max |")?;
                writeln!(out, "|--------|-------|------|-----|-----|-----|-----|-----|-----|")?;
                for c in &stats.columns {
                    writeln!(
                        out,
                        "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                        c.column,
                        c.count,
                        number(c.mean),
                        number(c.std_dev),
                        number(c.min),
                        number(c.q25),
                        number(c.median),
                        number(c.q75),
                        number(c.max)
                    )?;
                }
            }
        }

        writeln!(out, "\n{h}# Key Trends")?;
        let streaming = &report.streaming;
        let social = &report.social;
        md_counts(&mut out, &h, "OTT Platform Popularity", &streaming.platform_popularity)?;
        md_means(&mut out, &h, "Average Watch Time by Platform (hours)", &streaming.watch_time_by_platform)?;
        md_counts(&mut out, &h, "Content Type Preferences", &streaming.content_type_preference)?;
        md_counts(&mut out, &h, "Subscription Distribution", &streaming.subscription_distribution)?;
        md_counts(&mut out, &h, "Social Media Platform Popularity", &social.platform_popularity)?;
        md_means(&mut out, &h, "Average Time Spent by Platform (minutes)", &social.time_spent_by_platform)?;
        md_counts(&mut out, &h, "Content Category Preferences", &social.content_category_preference)?;
        md_means(&mut out, &h, "Average Interactions by Platform", &social.interactions_by_platform)?;
        md_means(&mut out, &h, "OTT Watch Time by Age Group", &report.age.watch_time_by_age)?;
        md_means(&mut out, &h, "Social Media Time by Age Group", &report.age.time_spent_by_age)?;

        writeln!(out, "\n{h}# Advanced Insights")?;
        md_aggregate(&mut out, &h, "Device Type Analysis", &report.advanced.device_analysis)?;
        md_means(&mut out, &h, "Top Rated Genres", &report.advanced.genre_ratings)?;
        md_aggregate(&mut out, &h, "Influencer Following Impact", &report.advanced.influencer_impact)?;

        if config.include_correlations {
            writeln!(out, "\n{h}# Correlations")?;
            for matrix in [&report.correlations.usage, &report.correlations.engagement] {
                writeln!(out, "\n{h}## {}\n", matrix.table)?;
                writeln!(out, "| | {} |", matrix.columns.join(" | "))?;
                writeln!(out, "|---|{}", "---|".repeat(matrix.columns.len()))?;
                for (column, row) in matrix.columns.iter().zip(&matrix.coefficients) {
                    let cells: Vec<String> = row.iter().map(|v| number(*v)).collect();
                    writeln!(out, "| {column} | {} |", cells.join(" | "))?;
                }
            }
        }

        writeln!(out, "\n{h}# Key Findings")?;
        for category in categories() {
            let mut findings = report.findings_in(category).peekable();
            if findings.peek().is_none() {
                continue;
            }
            writeln!(out, "\n{h}## {category}\n")?;
            for finding in findings {
                writeln!(out, "- {}", finding.message)?;
            }
        }

        writeln!(out, "\n{h}# Recommendations\n")?;
        for (index, recommendation) in report.recommendations.iter().enumerate() {
            writeln!(out, "{}. {recommendation}", index + 1)?;
        }
        Ok(out)
    }
}

fn md_counts(out: &mut String, h: &str, title: &str, counts: &ValueCounts) -> Result<()> {
    writeln!(out, "\n{h}## {title}\n")?;
    writeln!(out, "| {} | Count |", counts.column)?;
    writeln!(out, "|---|---|")?;
    for entry in &counts.entries {
        writeln!(out, "| {} | {} |", entry.label, entry.count)?;
    }
    Ok(())
}

fn md_means(out: &mut String, h: &str, title: &str, means: &GroupedMean) -> Result<()> {
    writeln!(out, "\n{h}## {title}\n")?;
    writeln!(out, "| {} | Mean {} |", means.group_column, means.value_column)?;
    writeln!(out, "|---|---|")?;
    for group in &means.groups {
        writeln!(out, "| {} | {:.2} |", group.label, group.mean)?;
    }
    Ok(())
}

fn md_aggregate(out: &mut String, h: &str, title: &str, aggregate: &GroupedAggregate) -> Result<()> {
    writeln!(out, "\n{h}## {title}\n")?;
    writeln!(
        out,
        "| {} | {} |",
        aggregate.group_column,
        aggregate.value_columns.join(" | ")
    )?;
    writeln!(out, "|---|{}", "---|".repeat(aggregate.value_columns.len()))?;
    for row in &aggregate.rows {
        let cells: Vec<String> = row.values.iter().map(|v| format!("{v:.2}")).collect();
        writeln!(out, "| {} | {} |", row.label, cells.join(" | "))?;
    }
    Ok(())
}
