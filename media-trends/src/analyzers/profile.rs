//! Table exploration: shape, column types, missing values and a preview.

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::instrument;

use crate::error::Result;
use crate::schema::FieldKind;
use crate::table::RecordTable;

/// Overview of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Declared semantic type.
    pub kind: String,
    /// Arrow storage type.
    pub data_type: String,
    pub null_count: usize,
    /// Distinct labels, for categorical columns.
    pub distinct_count: Option<usize>,
}

/// Overview of a whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableProfile {
    pub table: String,
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
    /// Leading rows rendered as text, one inner vector per row.
    pub preview: Vec<Vec<String>>,
}

impl TableProfile {
    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Total missing values across all columns.
    pub fn missing_values(&self) -> usize {
        self.columns.iter().map(|c| c.null_count).sum()
    }
}

/// Profiles `table`, rendering at most `preview_rows` leading rows.
#[instrument(skip(table), fields(table = table.name()))]
pub fn profile_table(table: &RecordTable, preview_rows: usize) -> Result<TableProfile> {
    let batch = table.batch();

    let mut columns = Vec::with_capacity(batch.num_columns());
    for (index, spec) in table.schema().fields().iter().enumerate() {
        let array = batch.column(index);
        let distinct_count = match spec.kind {
            FieldKind::Categorical(_) => {
                let labels = table.labels(spec.name)?;
                Some(labels.iter().flatten().collect::<HashSet<_>>().len())
            }
            _ => None,
        };
        columns.push(ColumnProfile {
            name: spec.name.to_string(),
            kind: spec.kind.type_name().to_string(),
            data_type: array.data_type().to_string(),
            null_count: array.null_count(),
            distinct_count,
        });
    }

    let shown = preview_rows.min(table.num_rows());
    let preview = (0..shown)
        .map(|row| {
            batch
                .columns()
                .iter()
                .map(|array| array_value_to_string(array.as_ref(), row))
                .collect::<std::result::Result<Vec<_>, _>>()
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(TableProfile {
        table: table.name().to_string(),
        rows: table.num_rows(),
        columns,
        preview,
    })
}
