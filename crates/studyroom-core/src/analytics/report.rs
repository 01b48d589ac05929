//! Analytics page data: weekly chart, distributions and key metrics.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use super::score::{completion_rate, productivity_score, ProductivityLevel, Trend};
use crate::pomodoro::PomodoroStats;
use crate::task::{Priority, Task, TaskCategory};
use crate::time_utils::{days_from, local_date};

/// One bar of the weekly productivity chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayProductivity {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub day: String,
    pub productivity: u8,
}

/// Per-day productivity for the seven days ending `today`, oldest first.
///
/// A day's value comes from tasks due that day:
/// `round(completion * 0.6 + important_completion * 0.4)`, or 0 when nothing
/// is due.
pub fn weekly_productivity(tasks: &[&Task], today: NaiveDate) -> Vec<DayProductivity> {
    days_from(today - Duration::days(6), 7)
        .map(|date| {
            let due: Vec<&&Task> = tasks.iter().filter(|t| t.deadline == Some(date)).collect();
            let productivity = if due.is_empty() {
                0
            } else {
                let done = due.iter().filter(|t| t.is_completed()).count();
                let completion = done as f64 / due.len() as f64 * 100.0;

                let important: Vec<_> = due.iter().filter(|t| t.priority.is_important()).collect();
                let important_completion = if important.is_empty() {
                    100.0
                } else {
                    important.iter().filter(|t| t.is_completed()).count() as f64
                        / important.len() as f64
                        * 100.0
                };
                (completion * 0.6 + important_completion * 0.4).round() as u8
            };
            DayProductivity {
                date,
                day: date.format("%a").to_string(),
                productivity,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: TaskCategory,
    pub label: &'static str,
    pub count: usize,
}

/// Count per fixed category, most used first. Ties keep the fixed order.
pub fn category_distribution(tasks: &[&Task]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = TaskCategory::ALL
        .into_iter()
        .map(|category| CategoryCount {
            category,
            label: category.label(),
            count: tasks.iter().filter(|t| t.category == category).count(),
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub label: &'static str,
    pub count: usize,
}

/// Count per priority in the order high, medium, low.
pub fn priority_distribution(tasks: &[&Task]) -> Vec<PriorityCount> {
    [
        (Priority::High, "High priority tasks"),
        (Priority::Medium, "Medium priority tasks"),
        (Priority::Low, "Low priority tasks"),
    ]
    .into_iter()
    .map(|(priority, label)| PriorityCount {
        priority,
        label,
        count: tasks.iter().filter(|t| t.priority == priority).count(),
    })
    .collect()
}

/// Completed tasks last updated within the seven days before `now`.
pub fn completed_last_week(tasks: &[&Task], now: DateTime<Utc>) -> usize {
    let week_ago = now - Duration::days(7);
    tasks
        .iter()
        .filter(|t| t.is_completed() && t.updated_at >= week_ago)
        .count()
}

/// Everything the analytics view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub productivity_score: u8,
    pub level: ProductivityLevel,
    pub description: &'static str,
    pub trend: Trend,
    pub completed_last_week: usize,
    pub total_tasks: usize,
    /// `completed_last_week` against all tasks, in percent.
    pub completion_rate: u8,
    pub today_tasks: usize,
    pub pomodoro: PomodoroStats,
    pub weekly: Vec<DayProductivity>,
    pub categories: Vec<CategoryCount>,
    pub priorities: Vec<PriorityCount>,
    pub quote: &'static str,
}

impl AnalyticsReport {
    pub fn build(
        tasks: &[&Task],
        pomodoro: PomodoroStats,
        now: DateTime<Utc>,
        quote: &'static str,
    ) -> Self {
        let today = local_date(now);
        let score = productivity_score(tasks.iter().copied(), now);
        let completed = completed_last_week(tasks, now);
        let level = ProductivityLevel::from_score(score);

        Self {
            productivity_score: score,
            level,
            description: level.label(),
            trend: Trend::from_score(score),
            completed_last_week: completed,
            total_tasks: tasks.len(),
            completion_rate: completion_rate(completed, tasks.len()),
            today_tasks: tasks.iter().filter(|t| t.deadline == Some(today)).count(),
            pomodoro,
            weekly: weekly_productivity(tasks, today),
            categories: category_distribution(tasks),
            priorities: priority_distribution(tasks),
            quote,
        }
    }
}
