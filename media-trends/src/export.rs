//! Flat-file export.
//!
//! Tables are written as comma-separated values with a header row naming
//! the schema fields in declared order, one line per record.

use arrow::csv::WriterBuilder;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::config::OutputConfig;
use crate::error::{ErrorContext, Result};
use crate::generator::GeneratedTables;
use crate::table::RecordTable;

/// Writes `table` to `path` as CSV, replacing any existing file.
#[instrument(skip(table), fields(table = table.name(), rows = table.num_rows()))]
pub fn write_csv(table: &RecordTable, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    write_csv_to(table, file)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    info!(path = %path.display(), "exported table");
    Ok(())
}

/// Writes `table` as CSV into any writer.
pub fn write_csv_to<W: Write>(table: &RecordTable, sink: W) -> Result<()> {
    let mut writer = WriterBuilder::new().with_header(true).build(sink);
    writer.write(table.batch())?;
    let mut sink = writer.into_inner();
    sink.flush()?;
    Ok(())
}

/// Exports both tables into the configured directory, creating it if
/// missing, and returns the written paths.
pub fn export_tables(tables: &GeneratedTables, output: &OutputConfig) -> Result<Vec<PathBuf>> {
    ensure_directory(output.directory())?;
    let usage_path = output.usage_csv_path();
    let engagement_path = output.engagement_csv_path();
    write_csv(&tables.usage, &usage_path)?;
    write_csv(&tables.engagement, &engagement_path)?;
    Ok(vec![usage_path, engagement_path])
}

/// Creates `directory` and its parents if needed.
pub fn ensure_directory(directory: &Path) -> Result<()> {
    fs::create_dir_all(directory)
        .with_context(|| format!("failed to create directory '{}'", directory.display()))
}
