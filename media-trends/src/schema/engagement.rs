//! Schema of the social-media engagement table.

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::{FieldKind, FieldSpec, TableSchema, ValueRange, Vocabulary};
use crate::error::Result;
use crate::table::RecordTable;

pub const TABLE_NAME: &str = "engagement";
pub const ID_PREFIX: &str = "S";

pub const USER_ID: &str = "UserID";
pub const PLATFORM: &str = "Platform";
pub const CONTENT_CATEGORY: &str = "ContentCategory";
pub const ENGAGEMENT_TYPE: &str = "EngagementType";
pub const TIME_SPENT_MINUTES: &str = "TimeSpentMinutes";
pub const POSTS_VIEWED: &str = "PostsViewed";
pub const INTERACTIONS_COUNT: &str = "InteractionsCount";
pub const AGE_GROUP: &str = "AgeGroup";
pub const INFLUENCER_FOLLOWING: &str = "InfluencerFollowing";
pub const AD_CLICKS: &str = "AdClicks";

pub static PLATFORMS: Vocabulary = Vocabulary::weighted(
    "social_platform",
    &["Instagram", "TikTok", "YouTube", "Twitter", "Facebook"],
    &[0.30, 0.25, 0.25, 0.10, 0.10],
);

pub static CONTENT_CATEGORIES: Vocabulary = Vocabulary::uniform(
    "content_category",
    &[
        "Entertainment",
        "Education",
        "News",
        "Sports",
        "Lifestyle",
        "Technology",
    ],
);

pub static ENGAGEMENT_TYPES: Vocabulary = Vocabulary::weighted(
    "engagement_type",
    &["Like", "Comment", "Share", "View"],
    &[0.50, 0.20, 0.15, 0.15],
);

pub static AGE_GROUPS: Vocabulary = Vocabulary::weighted(
    "engagement_age_group",
    &["13-18", "19-25", "26-35", "36-50", "50+"],
    &[0.25, 0.35, 0.25, 0.12, 0.03],
);

pub static INFLUENCER_FLAGS: Vocabulary =
    Vocabulary::weighted("influencer_following", &["Yes", "No"], &[0.65, 0.35]);

/// Minimum time spent per user, in minutes.
pub const MIN_TIME_SPENT_MINUTES: f64 = 10.0;

/// The engagement table schema, in export column order.
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
            FieldSpec::new(
                CONTENT_CATEGORY,
                FieldKind::Categorical(&CONTENT_CATEGORIES),
            ),
            FieldSpec::new(ENGAGEMENT_TYPE, FieldKind::Categorical(&ENGAGEMENT_TYPES)),
            FieldSpec::new(
                TIME_SPENT_MINUTES,
                FieldKind::Continuous(ValueRange::at_least(MIN_TIME_SPENT_MINUTES)),
            ),
            FieldSpec::new(POSTS_VIEWED, FieldKind::Count),
            FieldSpec::new(INTERACTIONS_COUNT, FieldKind::Count),
            FieldSpec::new(AGE_GROUP, FieldKind::Categorical(&AGE_GROUPS)),
            FieldSpec::new(
                INFLUENCER_FOLLOWING,
                FieldKind::Categorical(&INFLUENCER_FLAGS),
            ),
            FieldSpec::new(AD_CLICKS, FieldKind::Count),
        ],
    ))
});

/// Column-wise contents of an engagement table before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngagementColumns {
    pub user_id: Vec<String>,
    pub platform: Vec<&'static str>,
    pub content_category: Vec<&'static str>,
    pub engagement_type: Vec<&'static str>,
    pub time_spent_minutes: Vec<f64>,
    pub posts_viewed: Vec<u64>,
    pub interactions_count: Vec<u64>,
    pub age_group: Vec<&'static str>,
    pub influencer_following: Vec<&'static str>,
    pub ad_clicks: Vec<u64>,
}

impl EngagementColumns {
    /// Converts the columns into a schema-validated record table.
    pub fn into_table(self) -> Result<RecordTable> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(self.user_id)),
            Arc::new(StringArray::from(self.platform)),
            Arc::new(StringArray::from(self.content_category)),
            Arc::new(StringArray::from(self.engagement_type)),
            Arc::new(Float64Array::from(self.time_spent_minutes)),
            Arc::new(UInt64Array::from(self.posts_viewed)),
            Arc::new(UInt64Array::from(self.interactions_count)),
            Arc::new(StringArray::from(self.age_group)),
            Arc::new(StringArray::from(self.influencer_following)),
            Arc::new(UInt64Array::from(self.ad_clicks)),
        ];
        RecordTable::try_new(Arc::clone(&SCHEMA), columns)
    }
}
