//! Integration tests for dataset generation.

use media_trends::config::GeneratorConfig;
use media_trends::generator::{generate_engagement_table, generate_tables, generate_usage_table};
use media_trends::sampler::Sampler;
use media_trends::schema::{engagement, usage, FieldKind};
use media_trends::table::RecordTable;

fn column_strings(table: &RecordTable, column: &str) -> Vec<String> {
    table
        .labels(column)
        .unwrap()
        .iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

/// Checks every value of every field against the field's declared kind.
fn assert_conforms(table: &RecordTable) {
    for spec in table.schema().fields() {
        match spec.kind {
            FieldKind::Identifier { prefix, width } => {
                let ids = column_strings(table, spec.name);
                for (i, id) in ids.iter().enumerate() {
                    assert_eq!(id, &format!("{prefix}{:0width$}", i + 1));
                }
            }
            FieldKind::Categorical(vocabulary) => {
                for label in column_strings(table, spec.name) {
                    assert!(
                        vocabulary.contains(&label),
                        "{label} is not in {}",
                        vocabulary.name
                    );
                }
            }
            FieldKind::Continuous(range) => {
                for value in table.numeric_values(spec.name).unwrap() {
                    assert!(range.contains(value), "{} = {value} outside {range}", spec.name);
                }
            }
            FieldKind::Count => {
                assert_eq!(
                    table.count_column(spec.name).unwrap().len(),
                    table.num_rows()
                );
            }
        }
    }
}

#[test]
fn test_seed_42_five_usage_rows() {
    let mut sampler = Sampler::seeded(42);
    let table = generate_usage_table(5, &mut sampler).unwrap();

    assert_eq!(table.num_rows(), 5);
    assert_eq!(
        column_strings(&table, usage::USER_ID),
        vec!["U0001", "U0002", "U0003", "U0004", "U0005"]
    );

    let mut rerun = Sampler::seeded(42);
    let again = generate_usage_table(5, &mut rerun).unwrap();
    assert_eq!(
        column_strings(&table, usage::PLATFORM),
        column_strings(&again, usage::PLATFORM)
    );
    assert_eq!(
        table.numeric_values(usage::WATCH_TIME_HOURS).unwrap(),
        again.numeric_values(usage::WATCH_TIME_HOURS).unwrap()
    );
}

#[test]
fn test_generated_tables_conform_to_schema() {
    let tables = generate_tables(&GeneratorConfig::default().with_row_count(500)).unwrap();

    assert_eq!(tables.usage.schema().field_names(), usage::SCHEMA.field_names());
    assert_eq!(
        tables.engagement.schema().field_names(),
        engagement::SCHEMA.field_names()
    );
    assert_conforms(&tables.usage);
    assert_conforms(&tables.engagement);
}

#[test]
fn test_measures_are_rounded() {
    let tables = generate_tables(&GeneratorConfig::default().with_row_count(200)).unwrap();

    for rating in tables.usage.numeric_values(usage::RATING).unwrap() {
        assert!(((rating * 10.0).round() - rating * 10.0).abs() < 1e-9);
    }
    for hours in tables.usage.numeric_values(usage::WATCH_TIME_HOURS).unwrap() {
        assert!(hours >= 0.5);
        assert!(((hours * 100.0).round() - hours * 100.0).abs() < 1e-6);
    }
    for minutes in tables
        .engagement
        .numeric_values(engagement::TIME_SPENT_MINUTES)
        .unwrap()
    {
        assert!(minutes >= engagement::MIN_TIME_SPENT_MINUTES);
    }
}

#[test]
fn test_same_seed_reproduces_both_tables() {
    let config = GeneratorConfig::default().with_row_count(100).with_seed(7);
    let first = generate_tables(&config).unwrap();
    let second = generate_tables(&config).unwrap();
    assert_eq!(first, second);

    let other = generate_tables(&config.clone().with_seed(8)).unwrap();
    assert_ne!(first.usage, other.usage);
}

#[test]
fn test_engagement_draws_follow_usage_draws() {
    let mut sampler = Sampler::seeded(42);
    generate_usage_table(50, &mut sampler).unwrap();
    let chained = generate_engagement_table(50, &mut sampler).unwrap();

    let tables = generate_tables(&GeneratorConfig::default().with_row_count(50)).unwrap();
    assert_eq!(tables.engagement, chained);

    let mut fresh = Sampler::seeded(42);
    let standalone = generate_engagement_table(50, &mut fresh).unwrap();
    assert_ne!(standalone, chained);
}

#[test]
fn test_zero_rows() {
    let tables = generate_tables(&GeneratorConfig::default().with_row_count(0)).unwrap();
    assert!(tables.usage.is_empty());
    assert!(tables.engagement.is_empty());
    assert_eq!(tables.usage.schema().fields().len(), 10);
}

#[test]
fn test_weighted_frequencies_converge() {
    let mut sampler = Sampler::seeded(42);
    let n = 100_000;
    let draws = sampler
        .sample_categorical(&["A", "B", "C"], Some(&[0.5, 0.3, 0.2]), n)
        .unwrap();

    for (label, expected) in [("A", 0.5), ("B", 0.3), ("C", 0.2)] {
        let observed = draws.iter().filter(|d| **d == label).count() as f64 / n as f64;
        assert!(
            (observed - expected).abs() <= 0.02,
            "{label}: observed {observed}, expected {expected}"
        );
    }
}

#[test]
fn test_streaming_platform_shares_track_weights() {
    let tables = generate_tables(&GeneratorConfig::default().with_row_count(20_000)).unwrap();
    let platforms = column_strings(&tables.usage, usage::PLATFORM);
    let weights = usage::PLATFORMS.weights.unwrap();

    for (label, expected) in usage::PLATFORMS.labels.iter().zip(weights) {
        let observed =
            platforms.iter().filter(|p| p == label).count() as f64 / platforms.len() as f64;
        assert!((observed - expected).abs() <= 0.02, "{label}: {observed}");
    }
}
