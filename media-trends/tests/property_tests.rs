//! Property-based tests for generation and aggregation.
//!
//! Generated tables must hold the requested row count, carry unique
//! sequential identifiers and respect every declared field constraint for
//! any seed. Grouped summaries must account for every row.

use proptest::prelude::*;
use std::collections::HashSet;

use media_trends::analyzers::{group_mean, value_counts};
use media_trends::config::GeneratorConfig;
use media_trends::generator::generate_tables;
use media_trends::sampler::Sampler;
use media_trends::schema::{engagement, usage, FieldKind};
use media_trends::table::RecordTable;

fn check_table(table: &RecordTable, n: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(table.num_rows(), n);
    for spec in table.schema().fields() {
        match spec.kind {
            FieldKind::Identifier { .. } => {
                let ids: HashSet<&str> = table.labels(spec.name).unwrap().iter().flatten().collect();
                prop_assert_eq!(ids.len(), n);
            }
            FieldKind::Categorical(vocabulary) => {
                for label in table.labels(spec.name).unwrap().iter().flatten() {
                    prop_assert!(vocabulary.contains(label));
                }
            }
            FieldKind::Continuous(range) => {
                for value in table.numeric_values(spec.name).unwrap() {
                    prop_assert!(range.contains(value));
                }
            }
            FieldKind::Count => {}
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_tables_conform(seed in any::<u64>(), n in 0usize..300) {
        let tables = generate_tables(&GeneratorConfig::default().with_row_count(n).with_seed(seed)).unwrap();
        check_table(&tables.usage, n)?;
        check_table(&tables.engagement, n)?;
    }

    #[test]
    fn prop_generation_is_deterministic(seed in any::<u64>(), n in 1usize..100) {
        let config = GeneratorConfig::default().with_row_count(n).with_seed(seed);
        prop_assert_eq!(generate_tables(&config).unwrap(), generate_tables(&config).unwrap());
    }

    #[test]
    fn prop_group_counts_cover_all_rows(seed in any::<u64>(), n in 0usize..200) {
        let tables = generate_tables(&GeneratorConfig::default().with_row_count(n).with_seed(seed)).unwrap();

        let means = group_mean(&tables.engagement, engagement::PLATFORM, engagement::TIME_SPENT_MINUTES).unwrap();
        let grouped: u64 = means.groups.iter().map(|g| g.count).sum();
        prop_assert_eq!(grouped, n as u64);
        prop_assert!(means.groups.windows(2).all(|pair| pair[0].mean >= pair[1].mean));

        let counts = value_counts(&tables.usage, usage::AGE_GROUP).unwrap();
        prop_assert_eq!(counts.total, n as u64);
    }

    #[test]
    fn prop_categorical_draws_stay_in_vocabulary(
        seed in any::<u64>(),
        raw in prop::collection::vec(1u32..100, 1..6),
        count in 0usize..200,
    ) {
        let labels = ["a", "b", "c", "d", "e", "f"];
        let vocabulary = &labels[..raw.len()];
        let total: u32 = raw.iter().sum();
        let weights: Vec<f64> = raw.iter().map(|w| *w as f64 / total as f64).collect();

        let mut sampler = Sampler::seeded(seed);
        let draws = sampler.sample_categorical(vocabulary, Some(&weights), count).unwrap();
        prop_assert_eq!(draws.len(), count);
        prop_assert!(draws.iter().all(|d| vocabulary.contains(d)));
    }

    #[test]
    fn prop_invalid_weight_sums_rejected(scale in 1.1f64..10.0) {
        let mut sampler = Sampler::seeded(1);
        let weights = [0.5 * scale, 0.5 * scale];
        prop_assert!(sampler.sample_categorical(&["x", "y"], Some(&weights), 10).is_err());
    }
}
