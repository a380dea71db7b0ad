//! Activity frequency ranking for one year

use crate::types::YearDataset;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityShare {
    pub activity: String,
    pub count: usize,
    /// Share of classified records, 0-100
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRanking {
    pub year: i32,
    /// Records with a classified activity
    pub total: usize,
    pub unclassified: usize,
    /// Most frequent first
    pub entries: Vec<ActivityShare>,
}

impl ActivityRanking {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_percent(&self) -> f64 {
        self.entries.iter().map(|e| e.percent).fold(0.0, f64::max)
    }
}

/// Count records per activity and keep the `top_n` most frequent.
///
/// Ties keep the order in which activities first appear in the sheet.
pub fn rank_activities(dataset: &YearDataset, top_n: usize) -> ActivityRanking {
    // activity -> (count, first row)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut total = 0;
    for (row, activity) in dataset
        .records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.activity.as_deref().map(|a| (i, a)))
    {
        total += 1;
        counts.entry(activity).or_insert((0, row)).0 += 1;
    }

    let mut ordered: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(activity, (count, first))| (activity, count, first))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let entries = ordered
        .into_iter()
        .take(top_n)
        .map(|(activity, count, _)| ActivityShare {
            activity: activity.to_string(),
            count,
            percent: count as f64 / total as f64 * 100.0,
        })
        .collect();

    ActivityRanking {
        year: dataset.year,
        total,
        unclassified: dataset.records.len() - total,
        entries,
    }
}
