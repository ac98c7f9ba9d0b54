//! Combined daily export of every source.
//!
//! Unlike per-source snapshots, the combined file is rebuilt on every call:
//! the sources' snapshots are ensured (crawling if needed), read back, and
//! concatenated into `Combined-<date>.csv`, overwriting any previous file.

use crate::error::AppError;
use crate::fetch::Fetch;
use crate::scrapers::all_sources;
use crate::snapshot::{SnapshotStore, Table, read_table, write_table};
use chrono::{Local, NaiveDate};
use itertools::Itertools;
use std::path::PathBuf;
use tracing::{info, instrument};

/// File name prefix of the combined export.
pub const COMBINED_PREFIX: &str = "Combined";

/// Message returned to clients for a malformed date.
pub const INVALID_DATE: &str = "Invalid date format. Use YYYY-MM-DD";

/// Resolve an optional `YYYY-MM-DD` string, defaulting to today's local date.
pub fn resolve_date(date: Option<&str>) -> Result<NaiveDate, AppError> {
    match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidInput(INVALID_DATE.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

/// Build the combined export for `date` and return its path.
///
/// A malformed date fails before any network or file access.
#[instrument(level = "info", skip(store, fetcher))]
pub async fn export_combined(
    store: &SnapshotStore,
    fetcher: &dyn Fetch,
    date: Option<&str>,
) -> Result<PathBuf, AppError> {
    let date = resolve_date(date)?;

    let mut snapshots = Vec::new();
    for source in all_sources() {
        snapshots.push(store.ensure_snapshot(source, fetcher, date).await?);
    }

    let mut tables = Vec::with_capacity(snapshots.len());
    for path in &snapshots {
        tables.push(read_table(path).await?);
    }
    let combined = concat_tables(&tables);

    let path = store.path_for(COMBINED_PREFIX, date);
    write_table(&path, &combined).await?;
    info!(rows = combined.rows.len(), path = %path.display(), "Wrote combined export");
    Ok(path)
}

/// Stack tables vertically.
///
/// The header is the union of all columns in order of first appearance; cells
/// for columns a table lacks are left empty.
pub fn concat_tables(tables: &[Table]) -> Table {
    let columns: Vec<String> = tables
        .iter()
        .flat_map(|t| t.columns.iter().cloned())
        .unique()
        .collect();

    let rows = tables
        .iter()
        .flat_map(|table| {
            let positions: Vec<Option<usize>> = columns
                .iter()
                .map(|c| table.columns.iter().position(|own| own == c))
                .collect();
            table.rows.iter().map(move |row| {
                positions
                    .iter()
                    .map(|pos| pos.and_then(|i| row.get(i).cloned()).unwrap_or_default())
                    .collect::<Vec<String>>()
            })
        })
        .collect();

    Table { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticFetcher;
    use crate::snapshot::UTF8_BOM;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_date() {
        assert_eq!(
            resolve_date(Some("2024-03-05")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert_eq!(resolve_date(None).unwrap(), Local::now().date_naive());
        for bad in ["2024/01/01", "2024-13-01", "yesterday", "2024-01-01T00:00"] {
            assert!(matches!(resolve_date(Some(bad)), Err(AppError::InvalidInput(_))));
        }
    }

    #[tokio::test]
    async fn test_malformed_date_does_no_io() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("data"));
        let fetcher = StaticFetcher::new();

        let err = export_combined(&store, &fetcher, Some("2024/01/01")).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(ref msg) if msg == INVALID_DATE));
        assert_eq!(fetcher.calls(), 0);
        assert!(!store.dir().exists());
    }

    #[tokio::test]
    async fn test_export_combined_from_existing_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        write_table(
            &store.path_for("Ajnet", date),
            &Table {
                columns: strings(&["Category", "Title", "Link", "Text"]),
                rows: vec![
                    strings(&["sport", "a", "https://www.ajnet.me/a", "ta"]),
                    strings(&["tech", "b", "https://www.ajnet.me/b", "tb"]),
                ],
            },
        )
        .await
        .unwrap();
        write_table(
            &store.path_for("CNN-Arabic", date),
            &Table {
                columns: strings(&["Category", "Title", "Link", "Text", "ScrapedAt", "Label"]),
                rows: vec![strings(&[
                    "world",
                    "c",
                    "https://arabic.cnn.com/c",
                    "tc",
                    "2024-01-01 09:00:00",
                    "real",
                ])],
            },
        )
        .await
        .unwrap();
        let fetcher = StaticFetcher::new();

        let path = export_combined(&store, &fetcher, Some("2024-01-01")).await.unwrap();

        assert_eq!(fetcher.calls(), 0);
        assert_eq!(path, dir.path().join("Combined-2024-01-01.csv"));
        assert!(fs::read(&path).unwrap().starts_with(UTF8_BOM));
        let combined = read_table(&path).await.unwrap();
        assert_eq!(
            combined.columns,
            strings(&["Category", "Title", "Link", "Text", "ScrapedAt", "Label"])
        );
        assert_eq!(combined.rows.len(), 3);
        assert_eq!(combined.rows[0][4], "");
        assert_eq!(combined.rows[2][5], "real");
    }

    #[tokio::test]
    async fn test_combined_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let combined_path = store.path_for(COMBINED_PREFIX, date);
        fs::write(&combined_path, "stale").unwrap();

        export_combined(&store, &StaticFetcher::new(), Some("2024-01-02"))
            .await
            .unwrap();

        let combined = read_table(&combined_path).await.unwrap();
        assert_eq!(combined.columns.len(), 6);
        assert!(combined.rows.is_empty());
    }

    #[tokio::test]
    async fn test_empty_snapshots_give_headerless_combined_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        fs::write(store.path_for("Ajnet", date), "").unwrap();
        fs::write(store.path_for("CNN-Arabic", date), UTF8_BOM).unwrap();
        let fetcher = StaticFetcher::new();

        let path = export_combined(&store, &fetcher, Some("2024-01-03")).await.unwrap();

        assert_eq!(fetcher.calls(), 0);
        assert_eq!(fs::read(&path).unwrap(), UTF8_BOM);
        assert_eq!(read_table(&path).await.unwrap(), Table::default());
    }

    #[test]
    fn test_concat_tables_unions_columns() {
        let left = Table {
            columns: strings(&["A", "B"]),
            rows: vec![strings(&["1", "2"])],
        };
        let right = Table {
            columns: strings(&["B", "C"]),
            rows: vec![strings(&["3", "4"]), strings(&["5", "6"])],
        };

        let combined = concat_tables(&[left, right]);

        assert_eq!(combined.columns, strings(&["A", "B", "C"]));
        assert_eq!(
            combined.rows,
            vec![strings(&["1", "2", ""]), strings(&["", "3", "4"]), strings(&["", "5", "6"])]
        );
    }
}
