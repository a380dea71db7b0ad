//! Database module for the CREA-MG report
//! Disk cache of the reshaped workbook so restarts skip the spreadsheet parse

use crate::types::{InspectionRecord, YearDataset};
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const META_SOURCE_PATH: &str = "source_path";
const META_SOURCE_FINGERPRINT: &str = "source_fingerprint";
const META_LOADED_AT: &str = "loaded_at";

/// What the cached records were built from
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSource {
    pub path: String,
    pub fingerprint: String,
    pub loaded_at: DateTime<Local>,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        debug!(path = %path.display(), "Database opened");
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                year INTEGER NOT NULL,
                sheet_name TEXT NOT NULL,
                position INTEGER NOT NULL,
                city TEXT,
                registered_on TEXT,
                titles TEXT,
                activities TEXT NOT NULL,
                notes TEXT,
                activity TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_records_year ON records(year, position);

            CREATE TABLE IF NOT EXISTS metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Replace the cache contents with a fresh load
    pub fn store_report(
        &mut self,
        source_path: &str,
        fingerprint: &str,
        datasets: &BTreeMap<i32, YearDataset>,
        loaded_at: DateTime<Local>,
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM records", [])?;
        tx.execute("DELETE FROM metadata", [])?;

        let mut stored = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO records
                    (year, sheet_name, position, city, registered_on, titles, activities, notes, activity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for dataset in datasets.values() {
                for (position, record) in dataset.records.iter().enumerate() {
                    stmt.execute(params![
                        dataset.year,
                        dataset.sheet_name,
                        position as i64,
                        record.city,
                        record.registered_on,
                        record.titles,
                        record.activities,
                        record.notes,
                        record.activity,
                    ])?;
                    stored += 1;
                }
            }

            let mut meta = tx.prepare("INSERT INTO metadata (key, value) VALUES (?1, ?2)")?;
            meta.execute(params![META_SOURCE_PATH, source_path])?;
            meta.execute(params![META_SOURCE_FINGERPRINT, fingerprint])?;
            meta.execute(params![META_LOADED_AT, loaded_at.to_rfc3339()])?;
        }
        tx.commit()?;

        debug!(stored, years = datasets.len(), "Report cached");
        Ok(stored)
    }

    /// Source metadata of the cached report, if any
    pub fn cached_source(&self) -> Result<Option<CachedSource>> {
        let (Some(path), Some(fingerprint), Some(loaded_at)) = (
            self.get_meta(META_SOURCE_PATH)?,
            self.get_meta(META_SOURCE_FINGERPRINT)?,
            self.get_meta(META_LOADED_AT)?,
        ) else {
            return Ok(None);
        };
        // An unreadable timestamp means the cache cannot be trusted
        let Ok(loaded_at) = DateTime::parse_from_rfc3339(&loaded_at) else {
            return Ok(None);
        };
        Ok(Some(CachedSource {
            path,
            fingerprint,
            loaded_at: loaded_at.with_timezone(&Local),
        }))
    }

    /// Read every cached year back
    pub fn load_report(&self) -> Result<BTreeMap<i32, YearDataset>> {
        let mut stmt = self.conn.prepare(
            "SELECT year, sheet_name, city, registered_on, titles, activities, notes, activity
             FROM records ORDER BY year, position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i32>(0)?,
                row.get::<_, String>(1)?,
                InspectionRecord {
                    city: row.get(2)?,
                    registered_on: row.get(3)?,
                    titles: row.get(4)?,
                    activities: row.get(5)?,
                    notes: row.get(6)?,
                    activity: row.get(7)?,
                },
            ))
        })?;

        let mut datasets: BTreeMap<i32, YearDataset> = BTreeMap::new();
        for row in rows {
            let (year, sheet_name, record) = row?;
            datasets
                .entry(year)
                .or_insert_with(|| YearDataset {
                    year,
                    sheet_name,
                    records: Vec::new(),
                })
                .records
                .push(record);
        }
        Ok(datasets)
    }

    /// Drop all cached data
    pub fn clear(&self) -> Result<()> {
        self.conn
            .execute_batch("DELETE FROM records; DELETE FROM metadata;")?;
        debug!("Cache cleared");
        Ok(())
    }

    /// Get cached record count
    pub fn record_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn get_meta(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM metadata WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }
}
