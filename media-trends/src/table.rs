//! Immutable, schema-validated record tables.
//!
//! A [`RecordTable`] pins an Arrow [`RecordBatch`] to its declared
//! [`TableSchema`]. Construction checks every row against the schema, so a
//! table that exists is known to be conforming. Tables expose read-only
//! column accessors; nothing mutates a table after construction.

use arrow::array::{Array, ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::record_batch::RecordBatch;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Result, TrendsError};
use crate::schema::{format_identifier, FieldKind, FieldSpec, TableSchema};

/// An ordered sequence of fixed-schema rows.
#[derive(Clone)]
pub struct RecordTable {
    schema: Arc<TableSchema>,
    batch: RecordBatch,
}

impl RecordTable {
    /// Builds a table from columns given in schema order.
    ///
    /// Fails with [`TrendsError::Arrow`] if the columns do not match the
    /// Arrow types or lengths, and with [`TrendsError::SchemaViolation`] if a
    /// value breaks its field's declared constraints.
    pub fn try_new(schema: Arc<TableSchema>, columns: Vec<ArrayRef>) -> Result<Self> {
        let batch = RecordBatch::try_new(schema.arrow_schema(), columns)?;
        let table = Self { schema, batch };
        table.validate()?;
        debug!(
            table = table.name(),
            rows = table.num_rows(),
            "validated record table"
        );
        Ok(table)
    }

    /// Creates a table with the given schema and no rows.
    pub fn empty(schema: Arc<TableSchema>) -> Self {
        let batch = RecordBatch::new_empty(schema.arrow_schema());
        Self { schema, batch }
    }

    /// Table name from the schema.
    pub fn name(&self) -> &'static str {
        self.schema.name()
    }

    /// The declared schema.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// The underlying Arrow batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Looks up a declared field, failing with `UnknownColumn`.
    pub fn field(&self, column: &str) -> Result<(usize, &FieldSpec)> {
        self.schema
            .field(column)
            .ok_or_else(|| TrendsError::unknown_column(self.name(), column))
    }

    /// Returns a label column (identifier or categorical).
    pub fn labels(&self, column: &str) -> Result<&StringArray> {
        let (index, spec) = self.field(column)?;
        if !spec.kind.is_label() {
            return Err(TrendsError::type_mismatch(
                column,
                "identifier or categorical",
                spec.kind.type_name(),
            ));
        }
        downcast::<StringArray>(self.batch.column(index), column, "Utf8")
    }

    /// Returns a numeric column converted to `f64`, in row order.
    pub fn numeric_values(&self, column: &str) -> Result<Vec<f64>> {
        let (index, spec) = self.field(column)?;
        let array = self.batch.column(index);
        match spec.kind {
            FieldKind::Continuous(_) => {
                let values = downcast::<Float64Array>(array, column, "Float64")?;
                Ok(values.values().to_vec())
            }
            FieldKind::Count => {
                let values = downcast::<UInt64Array>(array, column, "UInt64")?;
                Ok(values.values().iter().map(|v| *v as f64).collect())
            }
            other => Err(TrendsError::type_mismatch(
                column,
                "continuous or count",
                other.type_name(),
            )),
        }
    }

    /// Returns a continuous column.
    pub fn float_column(&self, column: &str) -> Result<&Float64Array> {
        let (index, spec) = self.field(column)?;
        match spec.kind {
            FieldKind::Continuous(_) => {
                downcast::<Float64Array>(self.batch.column(index), column, "Float64")
            }
            other => Err(TrendsError::type_mismatch(
                column,
                "continuous",
                other.type_name(),
            )),
        }
    }

    /// Returns a count column.
    pub fn count_column(&self, column: &str) -> Result<&UInt64Array> {
        let (index, spec) = self.field(column)?;
        match spec.kind {
            FieldKind::Count => downcast::<UInt64Array>(self.batch.column(index), column, "UInt64"),
            other => Err(TrendsError::type_mismatch(column, "count", other.type_name())),
        }
    }

    fn validate(&self) -> Result<()> {
        let table = self.name();
        for (index, spec) in self.schema.fields().iter().enumerate() {
            let array = self.batch.column(index);
            if array.null_count() > 0 {
                return Err(TrendsError::schema_violation(
                    table,
                    spec.name,
                    first_null(array.as_ref()),
                    "null values are not allowed",
                ));
            }

            match spec.kind {
                FieldKind::Identifier { prefix, width } => {
                    let values = downcast::<StringArray>(array, spec.name, "Utf8")?;
                    let mut seen = HashSet::with_capacity(values.len());
                    for (row, value) in values.iter().flatten().enumerate() {
                        let expected = format_identifier(prefix, width, row + 1);
                        if value != expected {
                            return Err(TrendsError::schema_violation(
                                table,
                                spec.name,
                                row,
                                format!("expected identifier '{expected}', found '{value}'"),
                            ));
                        }
                        if !seen.insert(value) {
                            return Err(TrendsError::schema_violation(
                                table,
                                spec.name,
                                row,
                                format!("duplicate identifier '{value}'"),
                            ));
                        }
                    }
                }
                FieldKind::Categorical(vocabulary) => {
                    let values = downcast::<StringArray>(array, spec.name, "Utf8")?;
                    if let Some((row, value)) = values
                        .iter()
                        .flatten()
                        .enumerate()
                        .find(|(_, v)| !vocabulary.contains(v))
                    {
                        return Err(TrendsError::schema_violation(
                            table,
                            spec.name,
                            row,
                            format!(
                                "'{value}' is not part of the {} vocabulary",
                                vocabulary.name
                            ),
                        ));
                    }
                }
                FieldKind::Continuous(range) => {
                    let values = downcast::<Float64Array>(array, spec.name, "Float64")?;
                    if let Some((row, value)) = values
                        .values()
                        .iter()
                        .enumerate()
                        .find(|(_, v)| !range.contains(**v))
                    {
                        return Err(TrendsError::schema_violation(
                            table,
                            spec.name,
                            row,
                            format!("{value} is outside {range}"),
                        ));
                    }
                }
                // Unsigned storage already guarantees non-negative counts.
                FieldKind::Count => {
                    downcast::<UInt64Array>(array, spec.name, "UInt64")?;
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for RecordTable {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.batch == other.batch
    }
}

impl fmt::Debug for RecordTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordTable")
            .field("name", &self.name())
            .field("rows", &self.num_rows())
            .field("columns", &self.schema.field_names())
            .finish()
    }
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef, column: &str, expected: &str) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        TrendsError::type_mismatch(column, expected, array.data_type().to_string())
    })
}

fn first_null(array: &dyn Array) -> usize {
    (0..array.len()).find(|i| array.is_null(*i)).unwrap_or(0)
}
