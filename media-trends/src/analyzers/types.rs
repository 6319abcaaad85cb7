//! Result types produced by the analyzers.
//!
//! Every grouped result is an ordered list rather than a hash map, because
//! the order is part of the contract: means and counts descend, with ties
//! kept in first-seen order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Running sum, count and extrema of a numeric stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunningStats {
    pub sum: f64,
    pub count: u64,
    pub min: f64,
    pub max: f64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self {
            sum: 0.0,
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl RunningStats {
    /// Adds one value.
    pub fn observe(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Combines several partial states into one.
    pub fn merge(states: impl IntoIterator<Item = Self>) -> Self {
        states.into_iter().fold(Self::default(), |acc, s| Self {
            sum: acc.sum + s.sum,
            count: acc.count + s.count,
            min: acc.min.min(s.min),
            max: acc.max.max(s.max),
        })
    }

    /// Arithmetic mean, or `None` when nothing was observed.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    /// Applies `function` to the observed values.
    pub fn reduce(&self, function: AggregateFn) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(match function {
            AggregateFn::Mean => self.sum / self.count as f64,
            AggregateFn::Sum => self.sum,
            AggregateFn::Min => self.min,
            AggregateFn::Max => self.max,
        })
    }
}

/// Reduction applied per group and column by
/// [`group_multi_agg`](super::group_multi_agg).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFn {
    #[default]
    Mean,
    Sum,
    Min,
    Max,
}

impl fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateFn::Mean => "mean",
            AggregateFn::Sum => "sum",
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
        };
        f.write_str(name)
    }
}

/// Mean of the value column for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMean {
    pub label: String,
    pub mean: f64,
    /// Rows in the group.
    pub count: u64,
}

/// Per-group means, sorted by mean descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedMean {
    pub group_column: String,
    pub value_column: String,
    pub groups: Vec<GroupMean>,
}

impl GroupedMean {
    /// Mean for `label`, if the group exists.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.groups.iter().find(|g| g.label == label).map(|g| g.mean)
    }

    /// Group with the highest mean.
    pub fn top(&self) -> Option<&GroupMean> {
        self.groups.first()
    }

    /// Group labels in result order.
    pub fn labels(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Occurrences of one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Label frequencies, sorted by count descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCounts {
    pub column: String,
    /// Rows counted.
    pub total: u64,
    pub entries: Vec<LabelCount>,
}

impl ValueCounts {
    /// Count for `label`; zero if it never occurred.
    pub fn get(&self, label: &str) -> u64 {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Most frequent label.
    pub fn top(&self) -> Option<&LabelCount> {
        self.entries.first()
    }

    /// Percentage of rows carrying `label`, or `None` for an empty column.
    pub fn share_of(&self, label: &str) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.get(label) as f64 / self.total as f64 * 100.0)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reduced values of several columns for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub label: String,
    pub count: u64,
    /// One value per requested column, in request order.
    pub values: Vec<f64>,
}

/// Per-group reductions of several columns, sorted by group label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedAggregate {
    pub group_column: String,
    pub value_columns: Vec<String>,
    pub function: AggregateFn,
    pub rows: Vec<AggregateRow>,
}

impl GroupedAggregate {
    /// Reduced value of `column` within group `label`.
    pub fn value(&self, label: &str, column: &str) -> Option<f64> {
        let index = self.value_columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|r| r.label == label)
            .and_then(|r| r.values.get(index).copied())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
