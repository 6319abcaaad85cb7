//! Small hand-built tables for unit tests.

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use std::sync::Arc;

use crate::schema::{format_identifier, FieldKind, FieldSpec, TableSchema, ValueRange, Vocabulary};
use crate::table::RecordTable;

pub static TEAMS: Vocabulary = Vocabulary::uniform("team", &["a", "b", "c"]);

/// Schema with an identifier, a categorical key, a continuous score and a count.
pub fn scores_schema() -> Arc<TableSchema> {
    Arc::new(TableSchema::new(
        "scores",
        vec![
            FieldSpec::new(
                "id",
                FieldKind::Identifier {
                    prefix: "T",
                    width: 2,
                },
            ),
            FieldSpec::new("team", FieldKind::Categorical(&TEAMS)),
            FieldSpec::new("score", FieldKind::Continuous(ValueRange::at_least(0.0))),
            FieldSpec::new("goals", FieldKind::Count),
        ],
    ))
}

/// Builds a scores table; `goals` is the row index.
pub fn scores_table(teams: &[&'static str], scores: &[f64]) -> RecordTable {
    assert_eq!(teams.len(), scores.len());
    let ids: Vec<String> = (1..=teams.len())
        .map(|i| format_identifier("T", 2, i))
        .collect();
    let goals: Vec<u64> = (0..teams.len() as u64).collect();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(ids)),
        Arc::new(StringArray::from(teams.to_vec())),
        Arc::new(Float64Array::from(scores.to_vec())),
        Arc::new(UInt64Array::from(goals)),
    ];
    RecordTable::try_new(scores_schema(), columns).expect("valid scores table")
}
