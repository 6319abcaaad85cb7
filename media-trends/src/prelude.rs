//! Prelude for commonly used types and traits in media-trends.

pub use crate::analyzers::{AggregateFn, GroupedAggregate, GroupedMean, ValueCounts};
pub use crate::config::{AnalysisConfig, GeneratorConfig, OutputConfig, OutputFormat};
pub use crate::error::{ErrorContext, Result, TrendsError};
pub use crate::formatters::{FormatterConfig, ReportFormatter};
pub use crate::generator::{generate_tables, GeneratedTables};
pub use crate::logging::LoggingConfig;
pub use crate::report::{ReportOptions, TrendReport};
pub use crate::sampler::Sampler;
pub use crate::table::RecordTable;
