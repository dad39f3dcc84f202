//! CSV persistence for frames and sentiment summaries.
//!
//! The format-bound edge of the pipeline: readers hand raw cells to the
//! engines untouched (numeric coercion is the engine's job), writers
//! emit one file per processed table. Blank cells are the on-disk
//! representation of a missing value in both directions.

use crate::domain::article::DailySentiment;
use crate::domain::frame::{ColumnValues, Frame};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

/// Read a date-indexed table. The first column is the index (ISO dates,
/// datetime prefixes tolerated); every other column is kept as raw text
/// cells. Rows are sorted and duplicate dates collapsed (last wins).
pub fn read_frame(path: &Path) -> Result<Frame> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();

    let column_count = headers.len().saturating_sub(1);
    let mut index: Vec<NaiveDate> = Vec::new();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); column_count];

    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed row {} in {}", row + 2, path.display()))?;
        let raw_date = record.get(0).unwrap_or_default();
        let date = parse_date(raw_date)
            .with_context(|| format!("Invalid date '{}' in {}", raw_date, path.display()))?;
        index.push(date);
        for (i, slot) in cells.iter_mut().enumerate() {
            let cell = record.get(i + 1).unwrap_or_default();
            slot.push(if cell.trim().is_empty() {
                None
            } else {
                Some(cell.to_string())
            });
        }
    }

    let mut frame = Frame::new(index);
    for (i, name) in headers.iter().skip(1).enumerate() {
        frame
            .insert_text(name, std::mem::take(&mut cells[i]))
            .with_context(|| format!("Inconsistent column {} in {}", name, path.display()))?;
    }
    frame.sort_dedup();
    Ok(frame)
}

/// Write a frame with the date index as the leading `Date` column.
/// Missing values become blank cells.
pub fn write_frame(path: &Path, frame: &Frame) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = vec!["Date".to_string()];
    header.extend(frame.column_names().map(String::from));
    writer.write_record(&header)?;

    for (row, date) in frame.index().iter().enumerate() {
        let mut record = vec![date.to_string()];
        for column in frame.columns() {
            record.push(match column.values() {
                ColumnValues::Numeric(values) => {
                    let v = values[row];
                    if v.is_nan() { String::new() } else { v.to_string() }
                }
                ColumnValues::Text(values) => values[row].clone().unwrap_or_default(),
            });
        }
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Write the daily sentiment summary table.
pub fn write_daily_sentiment(path: &Path, rows: &[DailySentiment]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .context("Failed to serialize sentiment row")?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    // Datetime-indexed exports: keep the calendar-date prefix
    if let Some(prefix) = trimmed.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Ok(date);
        }
    }
    anyhow::bail!("Unrecognized date format: '{}'", trimmed)
}
