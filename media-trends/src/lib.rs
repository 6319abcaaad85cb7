//! # media-trends
//!
//! Synthetic streaming-media usage and social-media engagement datasets,
//! grouped statistics over them, and the presentation layers that consume
//! those statistics.
//!
//! ## Overview
//!
//! A run flows through four stages:
//!
//! 1. A single seeded [`Sampler`](sampler::Sampler) draws every random value,
//!    so a fixed seed reproduces the exact tables.
//! 2. The [`generator`] assembles the draws into two schema-validated
//!    [`RecordTable`](table::RecordTable)s backed by Arrow record batches.
//! 3. The [`analyzers`] reduce the tables into ranked, read-only summaries.
//! 4. [`report::TrendReport`] collects the summaries; [`formatters`],
//!    [`export`] and `charts` render them.
//!
//! ## Quick Start
//!
//! ```rust
//! use media_trends::prelude::*;
//! use media_trends::analyzers::group_mean;
//! use media_trends::schema::usage;
//!
//! # fn main() -> media_trends::error::Result<()> {
//! let tables = generate_tables(&GeneratorConfig::default().with_row_count(100))?;
//! let watch_time = group_mean(&tables.usage, usage::PLATFORM, usage::WATCH_TIME_HOURS)?;
//!
//! for group in &watch_time.groups {
//!     println!("{}: {:.2} hours", group.label, group.mean);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Determinism
//!
//! Sampling order is part of the contract: columns are drawn in schema order,
//! the usage table before the engagement table, from one random stream that
//! is never re-seeded. Two runs with the same seed and row count produce
//! identical tables.
//!
//! ## Features
//!
//! - `charts` (default): PNG dashboard and heatmap rendering with `plotters`.

pub mod analyzers;
#[cfg(feature = "charts")]
pub mod charts;
pub mod config;
pub mod error;
pub mod export;
pub mod formatters;
pub mod generator;
pub mod logging;
pub mod pipeline;
pub mod prelude;
pub mod report;
pub mod sampler;
pub mod schema;
pub mod table;

#[cfg(test)]
pub mod test_helpers;
