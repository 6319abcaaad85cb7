//! End-to-end runs: generation, report, formatting and CSV export.

use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::fs;

use media_trends::config::{AnalysisConfig, GeneratorConfig, OutputConfig, OutputFormat};
use media_trends::formatters::{formatter_for, FormatterConfig, ReportFormatter};
use media_trends::generator::generate_tables;
use media_trends::pipeline;
use media_trends::report::{FindingCategory, ReportOptions, TrendReport};
use media_trends::schema::{engagement, usage};

fn config_in(dir: &std::path::Path, rows: usize) -> AnalysisConfig {
    AnalysisConfig::default()
        .with_generator(GeneratorConfig::default().with_row_count(rows))
        .with_output(
            OutputConfig::in_directory(dir)
                .with_export(true)
                .with_charts(false),
        )
}

#[test]
fn test_run_exports_both_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), 40);
    let outcome = pipeline::run(&config).unwrap();

    assert_eq!(
        outcome.written,
        vec![
            config.output.usage_csv_path(),
            config.output.engagement_csv_path()
        ]
    );

    let usage_csv = fs::read_to_string(config.output.usage_csv_path()).unwrap();
    let mut lines = usage_csv.lines();
    assert_eq!(lines.next().unwrap(), usage::SCHEMA.field_names().join(","));
    assert_eq!(lines.count(), 40);
    assert!(usage_csv.lines().nth(1).unwrap().starts_with("U0001,"));

    let engagement_csv = fs::read_to_string(config.output.engagement_csv_path()).unwrap();
    assert_eq!(
        engagement_csv.lines().next().unwrap(),
        engagement::SCHEMA.field_names().join(",")
    );
    assert!(engagement_csv.lines().nth(40).unwrap().starts_with("S0040,"));
}

#[test]
fn test_run_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("reports").join("latest");
    let outcome = pipeline::run(&config_in(&nested, 5)).unwrap();

    assert_eq!(outcome.written.len(), 2);
    assert!(nested.join("ott_platform_data.csv").exists());
    assert!(nested.join("social_media_data.csv").exists());
}

#[test]
fn test_export_is_reproducible() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let a = config_in(first.path(), 25);
    let b = config_in(second.path(), 25);
    pipeline::run(&a).unwrap();
    pipeline::run(&b).unwrap();

    assert_eq!(
        fs::read(a.output.usage_csv_path()).unwrap(),
        fs::read(b.output.usage_csv_path()).unwrap()
    );
    assert_eq!(
        fs::read(a.output.engagement_csv_path()).unwrap(),
        fs::read(b.output.engagement_csv_path()).unwrap()
    );
}

#[test]
fn test_report_formats_agree() {
    let tables = generate_tables(&GeneratorConfig::default().with_row_count(200)).unwrap();
    let options = ReportOptions::default()
        .with_seed(42)
        .generated_at(Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap());
    let report = TrendReport::build(&tables.usage, &tables.engagement, &options).unwrap();
    let top_platform = report.streaming.platform_popularity.top().unwrap().label.clone();

    let human = formatter_for(OutputFormat::Human, FormatterConfig::ci())
        .format(&report)
        .unwrap();
    assert!(human.contains(&format!("{top_platform} dominates with")));
    assert!(human.contains("RECOMMENDATIONS"));

    let markdown = formatter_for(OutputFormat::Markdown, FormatterConfig::default())
        .format(&report)
        .unwrap();
    assert!(markdown.contains(&top_platform));

    let json = formatter_for(OutputFormat::Json, FormatterConfig::default())
        .format(&report)
        .unwrap();
    let parsed: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["metadata"]["seed"], 42);
    assert_eq!(parsed["metadata"]["engagement_rows"], 200);
    assert_eq!(
        parsed["streaming"]["platform_popularity"]["entries"][0]["label"],
        top_platform.as_str()
    );
}

#[test]
fn test_findings_cover_every_category() {
    let tables = generate_tables(&GeneratorConfig::default().with_row_count(1000)).unwrap();
    let report =
        TrendReport::build(&tables.usage, &tables.engagement, &ReportOptions::default()).unwrap();

    assert_eq!(report.findings_in(FindingCategory::Streaming).count(), 4);
    assert_eq!(report.findings_in(FindingCategory::Social).count(), 4);
    assert!(report.findings_in(FindingCategory::CrossPlatform).count() >= 2);
    assert_eq!(report.recommendations.len(), 5);
}
