//! Group reductions: partition rows by a label column and reduce each
//! partition's numeric columns.
//!
//! Groups are discovered in first-seen order. Rankings use a stable sort, so
//! groups with equal means keep that order.

use std::collections::HashMap;
use tracing::{debug, instrument};

use super::types::{AggregateFn, AggregateRow, GroupMean, GroupedAggregate, GroupedMean, RunningStats};
use crate::error::{Result, TrendsError};
use crate::table::RecordTable;

/// Mean of `value_column` per distinct label of `group_column`, sorted by
/// mean descending.
///
/// An empty table yields an empty result. Unknown columns fail with
/// `UnknownColumn`; a non-label key or a non-numeric value column fails with
/// `TypeMismatch`.
///
/// # Example
///
/// ```rust
/// use media_trends::analyzers::group_mean;
/// use media_trends::generator::generate_usage_table;
/// use media_trends::sampler::Sampler;
/// use media_trends::schema::usage;
///
/// let table = generate_usage_table(100, &mut Sampler::seeded(42)).unwrap();
/// let by_platform = group_mean(&table, usage::PLATFORM, usage::WATCH_TIME_HOURS).unwrap();
/// assert!(by_platform.len() <= usage::PLATFORMS.len());
/// ```
#[instrument(skip(table), fields(table = table.name()))]
pub fn group_mean(table: &RecordTable, group_column: &str, value_column: &str) -> Result<GroupedMean> {
    let partitions = partition(table, group_column, &[value_column])?;

    let mut groups: Vec<GroupMean> = partitions
        .into_iter()
        .filter_map(|(label, stats)| {
            let state = stats[0];
            state.mean().map(|mean| GroupMean {
                label,
                mean,
                count: state.count,
            })
        })
        .collect();
    // `sort_by` is stable: ties stay in first-seen order.
    groups.sort_by(|a, b| b.mean.total_cmp(&a.mean));

    debug!(groups = groups.len(), "computed grouped mean");
    Ok(GroupedMean {
        group_column: group_column.to_string(),
        value_column: value_column.to_string(),
        groups,
    })
}

/// Reduces several numeric columns per group with the same function.
///
/// Groups are ordered by label ascending. Duplicate column names are dropped,
/// keeping the first occurrence. An empty column list is `InvalidParameter`.
#[instrument(skip(table, value_columns), fields(table = table.name(), columns = value_columns.len()))]
pub fn group_multi_agg<S: AsRef<str>>(
    table: &RecordTable,
    group_column: &str,
    value_columns: &[S],
    function: AggregateFn,
) -> Result<GroupedAggregate> {
    let mut columns: Vec<&str> = Vec::with_capacity(value_columns.len());
    for column in value_columns.iter().map(AsRef::as_ref) {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    if columns.is_empty() {
        return Err(TrendsError::invalid_parameter(
            "value_columns",
            "at least one value column is required",
        ));
    }

    let partitions = partition(table, group_column, &columns)?;
    let mut rows: Vec<AggregateRow> = partitions
        .into_iter()
        .map(|(label, stats)| AggregateRow {
            label,
            count: stats.first().map(|s| s.count).unwrap_or(0),
            // Every partition has at least one row, so reduce always yields.
            values: stats
                .iter()
                .map(|s| s.reduce(function).unwrap_or(f64::NAN))
                .collect(),
        })
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));

    debug!(groups = rows.len(), %function, "computed grouped aggregate");
    Ok(GroupedAggregate {
        group_column: group_column.to_string(),
        value_columns: columns.into_iter().map(str::to_string).collect(),
        function,
        rows,
    })
}

/// Splits rows by label, accumulating one [`RunningStats`] per value column.
/// Partitions come back in first-seen order.
fn partition(
    table: &RecordTable,
    group_column: &str,
    value_columns: &[&str],
) -> Result<Vec<(String, Vec<RunningStats>)>> {
    let keys = table.labels(group_column)?;
    let values = value_columns
        .iter()
        .map(|column| table.numeric_values(column))
        .collect::<Result<Vec<_>>>()?;

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut partitions: Vec<(String, Vec<RunningStats>)> = Vec::new();

    for (row, key) in keys.iter().enumerate() {
        let Some(key) = key else { continue };
        let slot = *index.entry(key).or_insert_with(|| {
            partitions.push((key.to_string(), vec![RunningStats::default(); values.len()]));
            partitions.len() - 1
        });
        for (state, column) in partitions[slot].1.iter_mut().zip(&values) {
            state.observe(column[row]);
        }
    }

    Ok(partitions)
}
