//! Aggregation layer: read-only reductions over record tables.
//!
//! Every function here takes an immutable [`RecordTable`](crate::table::RecordTable)
//! and returns a new value; nothing is cached between calls.
//!
//! - [`group_mean`] and [`value_counts`] produce the ranked summaries the
//!   report is built from.
//! - [`group_multi_agg`] reduces several columns per group at once.
//! - [`describe`], [`correlation_matrix`] and [`profile_table`] cover
//!   exploration.
//!
//! ```rust
//! use media_trends::analyzers::value_counts;
//! use media_trends::generator::generate_engagement_table;
//! use media_trends::sampler::Sampler;
//! use media_trends::schema::engagement;
//!
//! let table = generate_engagement_table(200, &mut Sampler::seeded(7)).unwrap();
//! let counts = value_counts(&table, engagement::INFLUENCER_FOLLOWING).unwrap();
//! assert_eq!(counts.total, 200);
//! ```

pub mod correlation;
pub mod counts;
pub mod describe;
pub mod grouped;
pub mod profile;
pub mod types;

pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use counts::value_counts;
pub use describe::{describe, quantile, ColumnStatistics, TableStatistics};
pub use grouped::{group_mean, group_multi_agg};
pub use profile::{profile_table, ColumnProfile, TableProfile};
pub use types::{
    AggregateFn, AggregateRow, GroupMean, GroupedAggregate, GroupedMean, LabelCount, RunningStats,
    ValueCounts,
};
