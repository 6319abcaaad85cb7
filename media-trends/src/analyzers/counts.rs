//! Label frequencies.

use std::collections::HashMap;
use tracing::{debug, instrument};

use super::types::{LabelCount, ValueCounts};
use crate::error::Result;
use crate::table::RecordTable;

/// Counts occurrences of each label in `column`, sorted by count descending.
/// Labels with equal counts keep the order in which they first appear.
#[instrument(skip(table), fields(table = table.name()))]
pub fn value_counts(table: &RecordTable, column: &str) -> Result<ValueCounts> {
    let labels = table.labels(column)?;

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<LabelCount> = Vec::new();
    for label in labels.iter().flatten() {
        let slot = *index.entry(label).or_insert_with(|| {
            entries.push(LabelCount {
                label: label.to_string(),
                count: 0,
            });
            entries.len() - 1
        });
        entries[slot].count += 1;
    }
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    let total = entries.iter().map(|e| e.count).sum();
    debug!(labels = entries.len(), total, "counted values");
    Ok(ValueCounts {
        column: column.to_string(),
        total,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrendsError;
    use crate::test_helpers::{scores_schema, scores_table};

    #[test]
    fn test_counts_sorted_descending() {
        let table = scores_table(&["a", "b", "b", "c", "b", "a"], &[0.0; 6]);
        let counts = value_counts(&table, "team").unwrap();
        let order: Vec<(&str, u64)> = counts
            .entries
            .iter()
            .map(|e| (e.label.as_str(), e.count))
            .collect();
        assert_eq!(order, vec![("b", 3), ("a", 2), ("c", 1)]);
        assert_eq!(counts.total, 6);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let table = scores_table(&["c", "a", "b", "a", "c", "b"], &[0.0; 6]);
        let counts = value_counts(&table, "team").unwrap();
        let labels: Vec<&str> = counts.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_identifier_column_counts_once_each() {
        let table = scores_table(&["a", "a"], &[0.0, 0.0]);
        let counts = value_counts(&table, "id").unwrap();
        assert_eq!(counts.len(), 2);
        assert!(counts.entries.iter().all(|e| e.count == 1));
    }

    #[test]
    fn test_empty_table() {
        let table = RecordTable::empty(scores_schema());
        let counts = value_counts(&table, "team").unwrap();
        assert!(counts.is_empty());
        assert_eq!(counts.share_of("a"), None);
    }

    #[test]
    fn test_errors() {
        let table = scores_table(&["a"], &[1.0]);
        assert!(matches!(
            value_counts(&table, "nope").unwrap_err(),
            TrendsError::UnknownColumn { .. }
        ));
        assert!(matches!(
            value_counts(&table, "goals").unwrap_err(),
            TrendsError::TypeMismatch { .. }
        ));
    }
}
