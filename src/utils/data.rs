use crate::error::Result;
use crate::models::{CsvRecord, MatchFailure};
use serde::de::DeserializeOwned;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Read the tournament list, one URL per line, skipping blank lines
pub fn read_tournament_urls(path: &Path) -> Result<Vec<String>> {
    read_lines(path)
}

/// Remove the link file left over from a previous run
pub fn reset_links_file(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Append match URLs to the link file, one per line
pub fn append_match_links(path: &Path, urls: &[String]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for url in urls {
        writeln!(file, "{}", url)?;
    }
    Ok(())
}

pub fn read_match_links(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_lines(path)
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

/// Overwrite `path` with a header row and one record per row. The header is
/// written even when `rows` is empty.
pub fn write_rows<T: CsvRecord>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(T::HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Save the matches skipped during a scrape as pretty JSON
pub fn save_failures(path: &Path, failures: &[MatchFailure]) -> Result<()> {
    let json = serde_json::to_string_pretty(failures)?;
    std::fs::write(path, json)?;
    Ok(())
}
