//! Common types and data structures

use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::time::Duration;

/// One row of a year sheet after reshaping
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InspectionRecord {
    pub city: Option<String>,
    pub registered_on: Option<String>,
    pub titles: Option<String>,
    pub activities: String,
    pub notes: Option<String>,
    /// Normalized activity, `None` when the raw field could not be cut
    pub activity: Option<String>,
}

/// All records of one year sheet
#[derive(Debug, Clone, PartialEq)]
pub struct YearDataset {
    pub year: i32,
    pub sheet_name: String,
    pub records: Vec<InspectionRecord>,
}

impl YearDataset {
    pub fn unclassified_count(&self) -> usize {
        self.records.iter().filter(|r| r.activity.is_none()).count()
    }
}

/// Where a report was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Workbook,
    Cache,
}

/// Everything the dashboard renders from
#[derive(Debug, Clone)]
pub struct Report {
    pub years: BTreeMap<i32, YearDataset>,
    pub origin: DataOrigin,
    pub loaded_at: DateTime<Local>,
    pub load_time: Duration,
}

impl Report {
    pub fn available_years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }

    pub fn record_count(&self) -> usize {
        self.years.values().map(|d| d.records.len()).sum()
    }
}

/// Background load progress shared with the UI thread
#[derive(Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Done(Report),
    Failed(String),
}

/// Central panel content
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Chart,
    Table,
}
