//! Writing derived tables as CSV or JSON.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::config::OutputFormat;
use crate::error::PipelineResult;
use crate::logs::log_success;
use crate::transform::pipeline::AnalysisReport;

/// Write `table` to `writer`.
///
/// CSV gets a header row and empty fields for nulls. JSON is an array of
/// objects whose keys follow the table's column order; nulls stay `null`.
pub fn write_table<W: Write>(table: &DataFrame, format: OutputFormat, mut writer: W) -> PipelineResult<()> {
    let mut frame = table.clone();
    match format {
        OutputFormat::Csv => {
            CsvWriter::new(&mut writer).include_header(true).finish(&mut frame)?;
        }
        OutputFormat::Json => {
            JsonWriter::new(&mut writer)
                .with_json_format(JsonFormat::Json)
                .finish(&mut frame)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write `table` to a file, or to stdout when `path` is `None`.
pub fn write_table_to(table: &DataFrame, format: OutputFormat, path: Option<&Path>) -> PipelineResult<()> {
    match path {
        Some(p) => {
            let file = io::BufWriter::new(fs::File::create(p)?);
            write_table(table, format, file)?;
            log_success(format!("💾 {} rows written to: {}", table.height(), p.display()));
        }
        None => {
            let stdout = io::stdout();
            write_table(table, format, stdout.lock())?;
        }
    }
    Ok(())
}

/// Write every table of `report` into `dir`, plus `metadata.json`.
///
/// Returns the written paths.
pub fn write_report(report: &AnalysisReport, dir: &Path, format: OutputFormat) -> PipelineResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for (name, table) in report.tables() {
        let path = dir.join(format!("{}.{}", name, format.extension()));
        write_table_to(table, format, Some(&path))?;
        written.push(path);
    }

    let metadata_path = dir.join("metadata.json");
    fs::write(&metadata_path, serde_json::to_string_pretty(&report.metadata)?)?;
    written.push(metadata_path);

    Ok(written)
}
