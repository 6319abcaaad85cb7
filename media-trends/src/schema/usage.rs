//! Schema of the streaming-media usage table.

use arrow::array::{ArrayRef, Float64Array, StringArray};
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::{FieldKind, FieldSpec, TableSchema, ValueRange, Vocabulary};
use crate::error::Result;
use crate::table::RecordTable;

pub const TABLE_NAME: &str = "usage";
pub const ID_PREFIX: &str = "U";

pub const USER_ID: &str = "UserID";
pub const PLATFORM: &str = "Platform";
pub const CONTENT_TYPE: &str = "ContentType";
pub const GENRE: &str = "Genre";
pub const WATCH_TIME_HOURS: &str = "WatchTimeHours";
pub const SUBSCRIPTION_TYPE: &str = "SubscriptionType";
pub const AGE_GROUP: &str = "AgeGroup";
pub const DEVICE_TYPE: &str = "DeviceType";
pub const RATING: &str = "Rating";
pub const COMPLETION_RATE: &str = "CompletionRate";

pub static PLATFORMS: Vocabulary = Vocabulary::weighted(
    "streaming_platform",
    &["Netflix", "Amazon Prime", "Disney+", "HBO Max", "Hulu"],
    &[0.35, 0.25, 0.20, 0.12, 0.08],
);

pub static CONTENT_TYPES: Vocabulary = Vocabulary::weighted(
    "content_type",
    &["Movie", "TV Series", "Documentary", "Reality Show"],
    &[0.35, 0.40, 0.15, 0.10],
);

pub static GENRES: Vocabulary = Vocabulary::uniform(
    "genre",
    &[
        "Action", "Drama", "Comedy", "Thriller", "Sci-Fi", "Romance", "Horror",
    ],
);

pub static SUBSCRIPTION_TYPES: Vocabulary = Vocabulary::weighted(
    "subscription_type",
    &["Free", "Basic", "Premium"],
    &[0.15, 0.45, 0.40],
);

pub static AGE_GROUPS: Vocabulary = Vocabulary::weighted(
    "usage_age_group",
    &["13-18", "19-25", "26-35", "36-50", "50+"],
    &[0.10, 0.30, 0.35, 0.20, 0.05],
);

pub static DEVICE_TYPES: Vocabulary = Vocabulary::weighted(
    "device_type",
    &["Mobile", "Tablet", "Smart TV", "Desktop"],
    &[0.40, 0.15, 0.30, 0.15],
);

pub const RATING_RANGE: ValueRange = ValueRange::closed(1.0, 5.0);
pub const COMPLETION_RANGE: ValueRange = ValueRange::closed(0.0, 100.0);

/// The usage table schema, in export column order.
pub static SCHEMA: Lazy<Arc<TableSchema>> = Lazy::new(|| {
    Arc::new(TableSchema::new(
        TABLE_NAME,
        vec![
            FieldSpec::new(
                USER_ID,
                FieldKind::Identifier {
                    prefix: ID_PREFIX,
                    width: 4,
                },
            ),
            FieldSpec::new(PLATFORM, FieldKind::Categorical(&PLATFORMS)),
            FieldSpec::new(CONTENT_TYPE, FieldKind::Categorical(&CONTENT_TYPES)),
            FieldSpec::new(GENRE, FieldKind::Categorical(&GENRES)),
            FieldSpec::new(
                WATCH_TIME_HOURS,
                FieldKind::Continuous(ValueRange::positive()),
            ),
            FieldSpec::new(
                SUBSCRIPTION_TYPE,
                FieldKind::Categorical(&SUBSCRIPTION_TYPES),
            ),
            FieldSpec::new(AGE_GROUP, FieldKind::Categorical(&AGE_GROUPS)),
            FieldSpec::new(DEVICE_TYPE, FieldKind::Categorical(&DEVICE_TYPES)),
            FieldSpec::new(RATING, FieldKind::Continuous(RATING_RANGE)),
            FieldSpec::new(COMPLETION_RATE, FieldKind::Continuous(COMPLETION_RANGE)),
        ],
    ))
});

/// Column-wise contents of a usage table before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageColumns {
    pub user_id: Vec<String>,
    pub platform: Vec<&'static str>,
    pub content_type: Vec<&'static str>,
    pub genre: Vec<&'static str>,
    pub watch_time_hours: Vec<f64>,
    pub subscription_type: Vec<&'static str>,
    pub age_group: Vec<&'static str>,
    pub device_type: Vec<&'static str>,
    pub rating: Vec<f64>,
    pub completion_rate: Vec<f64>,
}

impl UsageColumns {
    /// Converts the columns into a schema-validated record table.
    pub fn into_table(self) -> Result<RecordTable> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(self.user_id)),
            Arc::new(StringArray::from(self.platform)),
            Arc::new(StringArray::from(self.content_type)),
            Arc::new(StringArray::from(self.genre)),
            Arc::new(Float64Array::from(self.watch_time_hours)),
            Arc::new(StringArray::from(self.subscription_type)),
            Arc::new(StringArray::from(self.age_group)),
            Arc::new(StringArray::from(self.device_type)),
            Arc::new(Float64Array::from(self.rating)),
            Arc::new(Float64Array::from(self.completion_rate)),
        ];
        RecordTable::try_new(Arc::clone(&SCHEMA), columns)
    }
}
