//! Derived engagement metrics
//!
//! Pure functions over the stored records. Nothing here is cached;
//! callers recompute from the collections on every read.

use serde::Serialize;

use crate::store::models::{CourseStat, Email};

/// Aggregate engagement numbers for a set of sent emails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailStats {
    pub total_sent: usize,
    pub total_opened: usize,
    pub total_clicked: usize,
    /// Percent of sent emails opened, one decimal place
    pub open_rate: f64,
    /// Percent of sent emails with at least one clicked link
    pub click_rate: f64,
}

pub fn email_stats(emails: &[Email]) -> EmailStats {
    let total_sent = emails.len();
    let total_opened = emails.iter().filter(|e| e.opened).count();
    let total_clicked = emails
        .iter()
        .filter(|e| e.links.iter().any(|l| l.clicked))
        .count();

    EmailStats {
        total_sent,
        total_opened,
        total_clicked,
        open_rate: percent(total_opened, total_sent),
        click_rate: percent(total_clicked, total_sent),
    }
}

/// Share of lessons completed, as a percentage with one decimal place.
/// A course with no lessons counts as 0.
pub fn completion_percent(stat: &CourseStat) -> f64 {
    percent(stat.lessons_completed as usize, stat.total_lessons as usize)
}

pub fn total_points(stats: &[CourseStat]) -> i64 {
    stats.iter().map(|s| s.points_earned).sum()
}

/// Mean completion percentage across the given progress rows, 0 when
/// there are none.
pub fn average_progress(stats: &[CourseStat]) -> f64 {
    if stats.is_empty() {
        return 0.0;
    }
    let sum: f64 = stats.iter().map(completion_percent).sum();
    round1(sum / stats.len() as f64)
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(100.0 * part as f64 / whole as f64)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
