//! Digital media trends analysis.
//!
//! Generates the synthetic streaming and social media tables, prints the
//! trend report to stdout and writes the CSV exports and charts.

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

use media_trends::config::{
    AnalysisConfig, GeneratorConfig, OutputConfig, OutputFormat, DEFAULT_ROW_COUNT, DEFAULT_SEED,
};
use media_trends::error::TrendsError;
use media_trends::formatters::{formatter_for, write_report, FormatterConfig, ReportFormatter};
use media_trends::logging::{init_logging, LoggingConfig};
use media_trends::pipeline;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Rows generated for each table
    #[arg(long, env = "MEDIA_TRENDS_ROWS", default_value_t = DEFAULT_ROW_COUNT)]
    rows: usize,

    /// Seed of the random stream
    #[arg(long, env = "MEDIA_TRENDS_SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Directory receiving CSV exports and charts
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Report format printed to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Skip CSV export
    #[arg(long)]
    no_export: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Log debug details from the analysis
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn analysis_config(&self) -> AnalysisConfig {
        let output = OutputConfig::in_directory(&self.output_dir)
            .with_export(!self.no_export)
            .with_charts(cfg!(feature = "charts") && !self.no_charts);
        AnalysisConfig::default()
            .with_generator(
                GeneratorConfig::default()
                    .with_row_count(self.rows)
                    .with_seed(self.seed),
            )
            .with_output(output)
            .with_format(self.format)
    }

    fn logging_config(&self) -> LoggingConfig {
        let config = if self.verbose {
            LoggingConfig::development()
        } else {
            LoggingConfig::default()
        };
        config.with_json_format(self.log_json)
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(args.logging_config()) {
        eprintln!("error: {e}");
        process::exit(1);
    }

    let config = args.analysis_config();
    let outcome = match pipeline::run(&config) {
        Ok(outcome) => outcome,
        Err(e) => fail("analysis failed", &e),
    };

    let colors = config.format == OutputFormat::Human && std::io::stdout().is_terminal();
    let formatter_config = FormatterConfig::default().with_colors(colors);
    let printed = formatter_for(config.format, formatter_config)
        .format(&outcome.report)
        .and_then(|text| write_report(std::io::stdout().lock(), &text));
    if let Err(e) = printed {
        fail("failed to print report", &e);
    }

    for path in &outcome.written {
        info!(path = %path.display(), "wrote output");
    }
}

/// Reports a fatal error on stderr, whatever the log filter, and exits 1.
fn fail(context: &str, err: &TrendsError) -> ! {
    error!(error = %err, "{context}");
    eprintln!("error: {context}: {err}");
    process::exit(1);
}
