//! Summary statistics of numeric columns.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::table::RecordTable;

/// Summary of one numeric column.
///
/// Every statistic is `None` for an empty column. `std_dev` is the sample
/// standard deviation and also needs at least two values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub column: String,
    pub count: u64,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStatistics {
    /// Computes the summary of `values`.
    pub fn from_values(column: impl Into<String>, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = values.len();
        let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
        let std_dev = mean.filter(|_| count > 1).map(|m| {
            let squares: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        });

        Self {
            column: column.into(),
            count: count as u64,
            mean,
            std_dev,
            min: sorted.first().copied(),
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Summaries of every numeric column of a table, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStatistics {
    pub table: String,
    pub columns: Vec<ColumnStatistics>,
}

impl TableStatistics {
    /// Summary for `column`, if it is numeric.
    pub fn column(&self, column: &str) -> Option<&ColumnStatistics> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Describes every numeric column of `table`.
#[instrument(skip(table), fields(table = table.name()))]
pub fn describe(table: &RecordTable) -> Result<TableStatistics> {
    let columns = table
        .schema()
        .numeric_fields()
        .into_iter()
        .map(|name| {
            table
                .numeric_values(name)
                .map(|values| ColumnStatistics::from_values(name, &values))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TableStatistics {
        table: table.name().to_string(),
        columns,
    })
}

/// Quantile of already sorted values with linear interpolation between the
/// two nearest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{scores_schema, scores_table};

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(close(quantile(&sorted, 0.25), 1.75));
        assert!(close(quantile(&sorted, 0.5), 2.5));
        assert!(close(quantile(&sorted, 0.75), 3.25));
        assert!(close(quantile(&sorted, 1.0), 4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_column_statistics() {
        let stats = ColumnStatistics::from_values("x", &[4.0, 2.0, 6.0, 8.0]);
        assert_eq!(stats.count, 4);
        assert!(close(stats.mean, 5.0));
        // Sample variance: (1 + 9 + 1 + 9) / 3
        assert!(close(stats.std_dev, (20.0f64 / 3.0).sqrt()));
        assert_eq!(stats.min, Some(2.0));
        assert_eq!(stats.max, Some(8.0));
        assert!(close(stats.median, 5.0));
    }

    #[test]
    fn test_single_value_has_no_std_dev() {
        let stats = ColumnStatistics::from_values("x", &[3.0]);
        assert_eq!(stats.mean, Some(3.0));
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.q25, Some(3.0));
    }

    #[test]
    fn test_describe_numeric_columns_only() {
        let table = scores_table(&["a", "b", "c"], &[1.0, 2.0, 3.0]);
        let stats = describe(&table).unwrap();
        let names: Vec<&str> = stats.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["score", "goals"]);
        assert!(close(stats.column("goals").and_then(|c| c.mean), 1.0));
    }

    #[test]
    fn test_describe_empty_table() {
        let stats = describe(&RecordTable::empty(scores_schema())).unwrap();
        let score = stats.column("score").unwrap();
        assert_eq!(score.count, 0);
        assert_eq!(score.mean, None);
        assert_eq!(score.max, None);
    }
}
