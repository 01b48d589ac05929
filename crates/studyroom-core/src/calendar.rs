//! Week calendar helpers. Weeks start on Monday.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::task::Task;
use crate::time_utils::days_from;

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn previous_week(start: NaiveDate) -> NaiveDate {
    start - Duration::days(7)
}

pub fn next_week(start: NaiveDate) -> NaiveDate {
    start + Duration::days(7)
}

pub fn week_days(start: NaiveDate) -> Vec<NaiveDate> {
    days_from(start, 7).collect()
}

/// `"13/10 - 19/10/2026"`; the year is taken from the last day.
pub fn format_week_range(start: NaiveDate) -> String {
    let end = start + Duration::days(6);
    format!(
        "{}/{} - {}/{}/{}",
        start.day(),
        start.month(),
        end.day(),
        end.month(),
        end.year()
    )
}

/// `"00:00"` through `"23:00"`.
pub fn time_slots() -> Vec<String> {
    (0..24).map(|h| format!("{h:02}:00")).collect()
}

/// Whether `task` is drawn in the slot for `hour`.
///
/// Timed tasks occupy every hour from the start hour up to, but excluding,
/// the end hour, and always their start hour. Untimed tasks sit in the
/// first slot.
pub fn task_in_time_slot(task: &Task, hour: u16) -> bool {
    match task.time_range() {
        Some((start, end)) => {
            hour == start.hour() || (start.hour() < hour && hour < end.hour())
        }
        None => hour == 0,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotView<'a> {
    pub time: String,
    pub tasks: Vec<&'a Task>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayView<'a> {
    pub date: NaiveDate,
    pub weekday: String,
    /// Only the hours that hold at least one task.
    pub slots: Vec<SlotView<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekView<'a> {
    pub start: NaiveDate,
    pub range: String,
    pub days: Vec<DayView<'a>>,
}

impl<'a> WeekView<'a> {
    /// Lay out tasks grouped by day (as returned by `TaskStore::tasks_for_week`)
    /// into hourly slots.
    pub fn build(start: NaiveDate, by_day: &BTreeMap<NaiveDate, Vec<&'a Task>>) -> Self {
        let days = week_days(start)
            .into_iter()
            .map(|date| {
                let due = by_day.get(&date).map(Vec::as_slice).unwrap_or_default();
                let slots = (0..24u16)
                    .filter_map(|hour| {
                        let tasks: Vec<&Task> = due
                            .iter()
                            .copied()
                            .filter(|t| task_in_time_slot(t, hour))
                            .collect();
                        (!tasks.is_empty()).then(|| SlotView {
                            time: format!("{hour:02}:00"),
                            tasks,
                        })
                    })
                    .collect();
                DayView {
                    date,
                    weekday: date.format("%A").to_string(),
                    slots,
                }
            })
            .collect();

        Self {
            start,
            range: format_week_range(start),
            days,
        }
    }
}
