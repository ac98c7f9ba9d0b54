//! Dated CSV snapshots, one per source per day.
//!
//! A snapshot lives at `<data_dir>/<prefix>-<YYYY-MM-DD>.csv`. Its presence is
//! the only cache check: an existing file is returned as-is without looking
//! at its contents, and a missing one triggers a full crawl of the source.
//!
//! Files are written as UTF-8 with a byte order mark, comma separated, with
//! a header row, so spreadsheet tools pick up the Arabic text correctly.

use crate::crawler::crawl_all_categories;
use crate::error::AppError;
use crate::fetch::Fetch;
use crate::models::ArticleRecord;
use crate::scrapers::NewsSource;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// UTF-8 byte order mark written at the start of every CSV file.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Directory holding per-source snapshots and combined exports.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

/// Rows of a CSV file together with its header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot for `prefix` on `date`.
    pub fn path_for(&self, prefix: &str, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}-{}.csv", prefix, date.format("%Y-%m-%d")))
    }

    /// Return the snapshot for `source` on `date`, crawling the source first if
    /// no file exists yet.
    ///
    /// The records are written to the path of the requested date, whatever the
    /// wall-clock date is when the crawl runs.
    #[instrument(level = "info", skip(self, source, fetcher), fields(source = source.prefix()))]
    pub async fn ensure_snapshot(
        &self,
        source: &dyn NewsSource,
        fetcher: &dyn Fetch,
        date: NaiveDate,
    ) -> Result<PathBuf, AppError> {
        let path = self.path_for(source.prefix(), date);
        if fs::try_exists(&path).await? {
            info!(path = %path.display(), "Snapshot already exists; skipping crawl");
            return Ok(path);
        }

        let records = crawl_all_categories(source, fetcher).await;
        fs::create_dir_all(&self.dir).await?;
        write_records(&path, &source.columns(), &records).await?;
        info!(count = records.len(), path = %path.display(), "Saved snapshot");
        Ok(path)
    }
}

/// Write records as a BOM-prefixed CSV with the given header.
pub async fn write_records(
    path: &Path,
    columns: &[&str],
    records: &[ArticleRecord],
) -> Result<(), AppError> {
    let mut writer = bom_writer();
    writer.write_record(columns)?;
    for record in records {
        writer.write_record(record.to_row(columns))?;
    }
    persist(path, writer).await
}

/// Write a table as a BOM-prefixed CSV, replacing any existing file.
///
/// A table without columns produces a file holding only the BOM.
pub async fn write_table(path: &Path, table: &Table) -> Result<(), AppError> {
    let mut writer = bom_writer();
    if !table.columns.is_empty() {
        writer.write_record(&table.columns)?;
    }
    for row in &table.rows {
        writer.write_record(row)?;
    }
    persist(path, writer).await
}

/// Read a CSV file, ignoring a leading byte order mark.
///
/// An empty file reads as a table with no columns and no rows.
pub async fn read_table(path: &Path) -> Result<Table, AppError> {
    let bytes = fs::read(path).await?;
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes.as_slice());
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(Table::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);
    let columns = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|row| row.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;
    Ok(Table { columns, rows })
}

/// In-memory CSV writer whose buffer already starts with the BOM.
fn bom_writer() -> csv::Writer<Vec<u8>> {
    csv::Writer::from_writer(UTF8_BOM.to_vec())
}

async fn persist(path: &Path, writer: csv::Writer<Vec<u8>>) -> Result<(), AppError> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    fs::write(path, bytes).await?;
    Ok(())
}
