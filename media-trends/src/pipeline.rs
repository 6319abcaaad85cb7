//! End-to-end analysis run.
//!
//! [`run`] is what the binary executes: generate both tables from one seeded
//! sampler, build the report, then write the configured outputs. Any failure
//! aborts the run.

use std::path::PathBuf;
use tracing::{info, instrument};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::export;
use crate::generator::{generate_tables, GeneratedTables};
use crate::report::{ReportOptions, TrendReport};

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub tables: GeneratedTables,
    pub report: TrendReport,
    /// Files written, in the order they were written.
    pub written: Vec<PathBuf>,
}

/// Runs generation, reporting, export and chart rendering per `config`.
#[instrument(skip(config), fields(rows = config.generator.row_count, seed = config.generator.seed))]
pub fn run(config: &AnalysisConfig) -> Result<RunOutcome> {
    config.validate()?;

    let tables = generate_tables(&config.generator)?;
    let options = ReportOptions::default().with_seed(config.generator.seed);
    let report = TrendReport::build(&tables.usage, &tables.engagement, &options)?;

    let mut written = Vec::new();
    if config.output.export_csv {
        written.extend(export::export_tables(&tables, &config.output)?);
    }

    #[cfg(feature = "charts")]
    {
        if config.output.render_charts {
            export::ensure_directory(config.output.directory())?;
            written.extend(crate::charts::render_all(&report, &config.output)?);
        }
    }

    info!(files = written.len(), "analysis complete");
    Ok(RunOutcome {
        tables,
        report,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeneratorConfig, OutputConfig};
    use crate::error::TrendsError;

    #[test]
    fn test_run_without_outputs() {
        let config = AnalysisConfig::default()
            .with_generator(GeneratorConfig::default().with_row_count(25))
            .with_output(OutputConfig::disabled());
        let outcome = run(&config).unwrap();

        assert!(outcome.written.is_empty());
        assert_eq!(outcome.tables.usage.num_rows(), 25);
        assert_eq!(outcome.report.metadata.seed, 42);
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let mut output = OutputConfig::disabled();
        output.usage_csv = String::new();
        let config = AnalysisConfig::default().with_output(output);
        assert!(matches!(run(&config), Err(TrendsError::Configuration(_))));
    }
}
