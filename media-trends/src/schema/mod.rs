//! Declared schemas for the generated record tables.
//!
//! A [`TableSchema`] is an ordered list of named fields, each carrying a
//! semantic [`FieldKind`]. The kind decides the Arrow storage type and the
//! checks a [`RecordTable`](crate::table::RecordTable) runs at construction:
//! identifiers must be unique, categorical values must belong to their
//! [`Vocabulary`], continuous values must fall inside their [`ValueRange`].

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub mod engagement;
pub mod usage;

/// A fixed, ordered set of labels with optional sampling weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vocabulary {
    /// Short name used in logs and error messages.
    pub name: &'static str,
    /// Labels in declaration order.
    pub labels: &'static [&'static str],
    /// Sampling probabilities aligned with `labels`; `None` means uniform.
    pub weights: Option<&'static [f64]>,
}

impl Vocabulary {
    /// Declares a vocabulary sampled uniformly.
    pub const fn uniform(name: &'static str, labels: &'static [&'static str]) -> Self {
        Self {
            name,
            labels,
            weights: None,
        }
    }

    /// Declares a vocabulary sampled with the given weights.
    pub const fn weighted(
        name: &'static str,
        labels: &'static [&'static str],
        weights: &'static [f64],
    ) -> Self {
        Self {
            name,
            labels,
            weights: Some(weights),
        }
    }

    /// Returns true if `label` is part of this vocabulary.
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(&label)
    }

    /// Returns the number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the vocabulary has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Support of a continuous field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    /// Whether `min` itself is excluded.
    pub min_exclusive: bool,
}

impl ValueRange {
    /// Strictly positive values.
    pub const fn positive() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
            min_exclusive: true,
        }
    }

    /// Values greater than or equal to `min`.
    pub const fn at_least(min: f64) -> Self {
        Self {
            min,
            max: f64::INFINITY,
            min_exclusive: false,
        }
    }

    /// Values in the closed interval `[min, max]`.
    pub const fn closed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            min_exclusive: false,
        }
    }

    /// Any finite value.
    pub const fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            min_exclusive: false,
        }
    }

    /// Returns true if `value` lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value > self.max {
            return false;
        }
        if self.min_exclusive {
            value > self.min
        } else {
            value >= self.min
        }
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.min_exclusive { '(' } else { '[' };
        let close = if self.max.is_infinite() { ')' } else { ']' };
        write!(f, "{open}{}, {}{close}", self.min, self.max)
    }
}

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FieldKind {
    /// Unique, zero-padded sequential identifier such as `U0001`.
    Identifier { prefix: &'static str, width: usize },
    /// Label drawn from a fixed vocabulary.
    Categorical(&'static Vocabulary),
    /// Floating point measure with a declared support.
    Continuous(ValueRange),
    /// Non-negative integer count.
    Count,
}

impl FieldKind {
    /// Arrow storage type for this kind.
    pub fn data_type(&self) -> DataType {
        match self {
            FieldKind::Identifier { .. } | FieldKind::Categorical(_) => DataType::Utf8,
            FieldKind::Continuous(_) => DataType::Float64,
            FieldKind::Count => DataType::UInt64,
        }
    }

    /// Returns true for kinds that support numeric reductions.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Continuous(_) | FieldKind::Count)
    }

    /// Returns true for kinds usable as a grouping key.
    pub fn is_label(&self) -> bool {
        matches!(self, FieldKind::Identifier { .. } | FieldKind::Categorical(_))
    }

    /// Short human-readable type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Identifier { .. } => "identifier",
            FieldKind::Categorical(_) => "categorical",
            FieldKind::Continuous(_) => "continuous",
            FieldKind::Count => "count",
        }
    }
}

/// Formats the 1-based `ordinal` as an identifier, e.g. `U0007`.
///
/// Ordinals wider than `width` are kept in full rather than truncated.
pub fn format_identifier(prefix: &str, width: usize, ordinal: usize) -> String {
    format!("{prefix}{ordinal:0width$}")
}

/// A named field of a table schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Ordered, named field list of a record table together with its Arrow schema.
#[derive(Debug, Clone)]
pub struct TableSchema {
    name: &'static str,
    fields: Vec<FieldSpec>,
    arrow: SchemaRef,
}

impl TableSchema {
    /// Creates a schema from fields in declaration order.
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        let arrow = Arc::new(Schema::new(
            fields
                .iter()
                .map(|f| Field::new(f.name, f.kind.data_type(), false))
                .collect::<Vec<_>>(),
        ));
        Self {
            name,
            fields,
            arrow,
        }
    }

    /// Table name, e.g. `usage`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Looks up a field and its position by name.
    pub fn field(&self, name: &str) -> Option<(usize, &FieldSpec)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }

    /// Names of the numeric fields in declaration order.
    pub fn numeric_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.kind.is_numeric())
            .map(|f| f.name)
            .collect()
    }

    /// The equivalent Arrow schema.
    pub fn arrow_schema(&self) -> SchemaRef {
        Arc::clone(&self.arrow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLORS: Vocabulary = Vocabulary::weighted("color", &["red", "blue"], &[0.7, 0.3]);

    #[test]
    fn test_value_range_contains() {
        assert!(!ValueRange::positive().contains(0.0));
        assert!(ValueRange::positive().contains(0.01));
        assert!(ValueRange::at_least(10.0).contains(10.0));
        assert!(!ValueRange::at_least(10.0).contains(9.99));
        assert!(ValueRange::closed(1.0, 5.0).contains(5.0));
        assert!(!ValueRange::closed(1.0, 5.0).contains(5.01));
        assert!(!ValueRange::unbounded().contains(f64::NAN));
    }

    #[test]
    fn test_value_range_display() {
        assert_eq!(ValueRange::closed(1.0, 5.0).to_string(), "[1, 5]");
        assert_eq!(ValueRange::positive().to_string(), "(0, inf)");
    }

    #[test]
    fn test_schema_maps_kinds_to_arrow_types() {
        let schema = TableSchema::new(
            "paint",
            vec![
                FieldSpec::new(
                    "id",
                    FieldKind::Identifier {
                        prefix: "P",
                        width: 3,
                    },
                ),
                FieldSpec::new("color", FieldKind::Categorical(&COLORS)),
                FieldSpec::new("litres", FieldKind::Continuous(ValueRange::positive())),
                FieldSpec::new("cans", FieldKind::Count),
            ],
        );

        let arrow = schema.arrow_schema();
        assert_eq!(arrow.field(0).data_type(), &DataType::Utf8);
        assert_eq!(arrow.field(1).data_type(), &DataType::Utf8);
        assert_eq!(arrow.field(2).data_type(), &DataType::Float64);
        assert_eq!(arrow.field(3).data_type(), &DataType::UInt64);
        assert_eq!(schema.numeric_fields(), vec!["litres", "cans"]);
        assert_eq!(schema.field("color").map(|(i, _)| i), Some(1));
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_format_identifier() {
        assert_eq!(format_identifier("U", 4, 1), "U0001");
        assert_eq!(format_identifier("S", 4, 1000), "S1000");
        assert_eq!(format_identifier("S", 4, 12345), "S12345");
    }

    #[test]
    fn test_vocabulary_membership() {
        assert!(COLORS.contains("red"));
        assert!(!COLORS.contains("green"));
        assert_eq!(COLORS.len(), 2);
    }
}
