//! Report loading: serve the disk cache when it is fresh, otherwise parse the
//! workbook and refresh the cache.

use crate::db::{CachedSource, Database};
use crate::types::{DataOrigin, Report};
use crate::workbook::load_workbook;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, UNIX_EPOCH};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub workbook: PathBuf,
    pub db_path: PathBuf,
    pub ttl: Duration,
    /// Skip the cache and parse the workbook
    pub force_reload: bool,
}

/// Length and modification time of the workbook file
pub fn source_fingerprint(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("Workbook not found: {}", path.display()))?;
    let modified = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Ok(format!("{}:{}", meta.len(), modified))
}

/// Whether the cached report may be served for `path`.
///
/// With no fingerprint (the workbook is unreadable) only the path and age are checked.
pub fn cache_is_fresh(
    cached: &CachedSource,
    path: &str,
    fingerprint: Option<&str>,
    ttl: Duration,
    now: DateTime<Local>,
) -> bool {
    if cached.path != path {
        return false;
    }
    if fingerprint.is_some_and(|f| f != cached.fingerprint) {
        return false;
    }
    let age = now.signed_duration_since(cached.loaded_at);
    match age.to_std() {
        Ok(age) => age < ttl,
        // Cache written in the future: clock moved back, do not trust it
        Err(_) => false,
    }
}

fn try_cache(
    db: &Database,
    path: &str,
    fingerprint: Option<&str>,
    ttl: Duration,
) -> Option<Report> {
    let cached = match db.cached_source() {
        Ok(Some(cached)) => cached,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "Failed to read cache metadata");
            return None;
        }
    };
    if !cache_is_fresh(&cached, path, fingerprint, ttl, Local::now()) {
        debug!(cached_path = %cached.path, loaded_at = %cached.loaded_at, "Cache is stale");
        return None;
    }
    match db.load_report() {
        Ok(years) if !years.is_empty() => Some(Report {
            years,
            origin: DataOrigin::Cache,
            loaded_at: cached.loaded_at,
            load_time: Duration::ZERO,
        }),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "Failed to read cached records");
            None
        }
    }
}

/// Load the report described by `request`.
pub fn load_report(request: &LoadRequest) -> Result<Report> {
    let start = Instant::now();
    let path_str = request.workbook.to_string_lossy().to_string();

    let fingerprint = match source_fingerprint(&request.workbook) {
        Ok(f) => Some(f),
        Err(e) => {
            warn!(error = %e, "Workbook unavailable, only the cache can serve it");
            None
        }
    };

    let mut db = match Database::open(&request.db_path) {
        Ok(db) => Some(db),
        Err(e) => {
            warn!(error = %e, path = %request.db_path.display(), "Cache unavailable");
            None
        }
    };

    if !request.force_reload {
        if let Some(mut report) = db
            .as_ref()
            .and_then(|db| try_cache(db, &path_str, fingerprint.as_deref(), request.ttl))
        {
            report.load_time = start.elapsed();
            info!(
                years = report.years.len(),
                records = report.record_count(),
                elapsed_ms = report.load_time.as_millis() as u64,
                "Report served from cache"
            );
            return Ok(report);
        }
    }

    let years = load_workbook(&request.workbook)?;
    let loaded_at = Local::now();

    if let (Some(db), Some(fingerprint)) = (db.as_mut(), fingerprint.as_deref()) {
        if let Err(e) = db.store_report(&path_str, fingerprint, &years, loaded_at) {
            warn!(error = %e, "Failed to cache report");
        }
    }

    let report = Report {
        years,
        origin: DataOrigin::Workbook,
        loaded_at,
        load_time: start.elapsed(),
    };
    info!(
        path = %path_str,
        years = report.years.len(),
        records = report.record_count(),
        elapsed_ms = report.load_time.as_millis() as u64,
        "Report loaded from workbook"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InspectionRecord, YearDataset};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    const WEEK: Duration = Duration::from_secs(604_800);

    fn cached(path: &str, fingerprint: &str, loaded_at: DateTime<Local>) -> CachedSource {
        CachedSource {
            path: path.to_string(),
            fingerprint: fingerprint.to_string(),
            loaded_at,
        }
    }

    fn years() -> BTreeMap<i32, YearDataset> {
        let mut map = BTreeMap::new();
        map.insert(
            2023,
            YearDataset {
                year: 2023,
                sheet_name: "2023".to_string(),
                records: vec![InspectionRecord {
                    activities: "a|b|Obras |".to_string(),
                    activity: Some("Obras".to_string()),
                    ..Default::default()
                }],
            },
        );
        map
    }

    #[test]
    fn test_cache_fresh_within_ttl() {
        let now = Local::now();
        let c = cached("p.xlsx", "1:2", now - chrono::Duration::days(6));
        assert!(cache_is_fresh(&c, "p.xlsx", Some("1:2"), WEEK, now));
    }

    #[test]
    fn test_cache_stale_after_ttl() {
        let now = Local::now();
        let c = cached("p.xlsx", "1:2", now - chrono::Duration::days(8));
        assert!(!cache_is_fresh(&c, "p.xlsx", Some("1:2"), WEEK, now));
    }

    #[test]
    fn test_cache_stale_on_changed_source() {
        let now = Local::now();
        let c = cached("p.xlsx", "1:2", now);
        assert!(!cache_is_fresh(&c, "p.xlsx", Some("1:3"), WEEK, now));
        assert!(!cache_is_fresh(&c, "q.xlsx", Some("1:2"), WEEK, now));
    }

    #[test]
    fn test_cache_without_fingerprint_checks_path_and_age() {
        let now = Local::now();
        let c = cached("p.xlsx", "1:2", now - chrono::Duration::hours(1));
        assert!(cache_is_fresh(&c, "p.xlsx", None, WEEK, now));
    }

    #[test]
    fn test_cache_from_the_future_is_stale() {
        let now = Local::now();
        let c = cached("p.xlsx", "1:2", now + chrono::Duration::hours(1));
        assert!(!cache_is_fresh(&c, "p.xlsx", Some("1:2"), WEEK, now));
    }

    #[test]
    fn test_source_fingerprint_tracks_length() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("pesquisa.xlsx");
        std::fs::write(&path, b"12345").expect("write");
        let fingerprint = source_fingerprint(&path).expect("fingerprint");
        assert!(fingerprint.starts_with("5:"));
        assert!(source_fingerprint(&dir.path().join("missing.xlsx")).is_err());
    }

    #[test]
    fn test_load_report_serves_fresh_cache() {
        let dir = TempDir::new().expect("create temp dir");
        let workbook = dir.path().join("pesquisa.xlsx");
        std::fs::write(&workbook, b"not really a workbook").expect("write");
        let db_path = dir.path().join("report.db");

        let path_str = workbook.to_string_lossy().to_string();
        let fingerprint = source_fingerprint(&workbook).expect("fingerprint");
        let mut db = Database::open(&db_path).expect("open");
        db.store_report(&path_str, &fingerprint, &years(), Local::now())
            .expect("store");
        drop(db);

        let request = LoadRequest {
            workbook,
            db_path,
            ttl: WEEK,
            force_reload: false,
        };
        let report = load_report(&request).expect("load");
        assert_eq!(report.origin, DataOrigin::Cache);
        assert_eq!(report.available_years(), vec![2023]);
    }

    #[test]
    fn test_load_report_force_reload_bypasses_cache() {
        let dir = TempDir::new().expect("create temp dir");
        let workbook = dir.path().join("pesquisa.xlsx");
        std::fs::write(&workbook, b"not really a workbook").expect("write");
        let db_path = dir.path().join("report.db");

        let path_str = workbook.to_string_lossy().to_string();
        let fingerprint = source_fingerprint(&workbook).expect("fingerprint");
        let mut db = Database::open(&db_path).expect("open");
        db.store_report(&path_str, &fingerprint, &years(), Local::now())
            .expect("store");
        drop(db);

        let request = LoadRequest {
            workbook,
            db_path,
            ttl: WEEK,
            force_reload: true,
        };
        // The file is not a real workbook, so a forced parse fails
        assert!(load_report(&request).is_err());
    }

    #[test]
    fn test_load_report_missing_workbook_and_cache_fails() {
        let dir = TempDir::new().expect("create temp dir");
        let request = LoadRequest {
            workbook: dir.path().join("missing.xlsx"),
            db_path: dir.path().join("report.db"),
            ttl: WEEK,
            force_reload: false,
        };
        assert!(load_report(&request).is_err());
    }
}
