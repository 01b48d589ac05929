//! Productivity score.
//!
//! The score blends three rates over the tasks touched in the last week:
//!
//! | component                          | weight |
//! |------------------------------------|--------|
//! | completion rate                    | 0.60   |
//! | completion rate of important tasks | 0.25   |
//! | activity (distinct active days / 7)| 0.15   |
//!
//! Important means high or medium priority. With no important tasks that
//! component counts as fully met.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::task::Task;
use crate::time_utils::local_date;

const COMPLETION_WEIGHT: f64 = 0.60;
const IMPORTANT_WEIGHT: f64 = 0.25;
const ACTIVITY_WEIGHT: f64 = 0.15;
const WINDOW_DAYS: i64 = 7;

/// Weighted 0-100 score. Zero when there are no recent tasks.
///
/// A task is recent when it was created within the last seven days or its
/// deadline falls on or after the local date seven days ago.
pub fn productivity_score<'a, I>(tasks: I, now: DateTime<Utc>) -> u8
where
    I: IntoIterator<Item = &'a Task>,
{
    let week_ago = now - Duration::days(WINDOW_DAYS);
    let week_ago_date = local_date(week_ago);
    let recent: Vec<&Task> = tasks
        .into_iter()
        .filter(|t| t.created_at >= week_ago || t.deadline.is_some_and(|d| d >= week_ago_date))
        .collect();
    if recent.is_empty() {
        return 0;
    }

    let completion = percent(recent.iter().filter(|t| t.is_completed()).count(), recent.len());

    let important: Vec<&&Task> = recent.iter().filter(|t| t.priority.is_important()).collect();
    let important_completion = if important.is_empty() {
        100.0
    } else {
        percent(important.iter().filter(|t| t.is_completed()).count(), important.len())
    };

    let active_days: HashSet<_> = recent
        .iter()
        .flat_map(|t| [local_date(t.created_at), local_date(t.updated_at)])
        .collect();
    let activity = active_days.len() as f64 / WINDOW_DAYS as f64 * 100.0;

    let score = completion * COMPLETION_WEIGHT
        + important_completion * IMPORTANT_WEIGHT
        + activity * ACTIVITY_WEIGHT;
    score.round().clamp(0.0, 100.0) as u8
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Rounded percentage, 0 when `total` is 0.
pub fn completion_rate(completed: usize, total: usize) -> u8 {
    percent(completed, total).round().min(100.0) as u8
}

/// [`completion_rate`] as `"NN%"`.
pub fn format_completion_rate(completed: usize, total: usize) -> String {
    format!("{}%", completion_rate(completed, total))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductivityLevel {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ProductivityLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ProductivityLevel::Excellent,
            60.. => ProductivityLevel::Good,
            _ => ProductivityLevel::NeedsImprovement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductivityLevel::Excellent => "Excellent!",
            ProductivityLevel::Good => "Good",
            ProductivityLevel::NeedsImprovement => "Needs improvement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Steady,
    Falling,
}

impl Trend {
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => Trend::Rising,
            60.. => Trend::Steady,
            _ => Trend::Falling,
        }
    }
}
