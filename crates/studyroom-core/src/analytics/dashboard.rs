//! Home screen summary: today's progress, allocated time and deadlines.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use super::score::{productivity_score, ProductivityLevel};
use super::report::completed_last_week;
use crate::storage::DashboardConfig;
use crate::task::Task;
use crate::time_utils::{local_date, local_start_of_day};

/// Minutes scheduled across tasks that have both a start and an end time.
pub fn allocated_minutes(tasks: &[&Task]) -> i64 {
    tasks.iter().map(|t| t.scheduled_minutes()).sum()
}

/// `150` -> `"2h 30m"`, `120` -> `"2h"`.
pub fn format_allocated(total_minutes: i64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if minutes == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {minutes}m")
    }
}

/// Open tasks with a deadline, soonest first.
pub fn upcoming_deadlines<'a>(tasks: &[&'a Task], limit: usize) -> Vec<&'a Task> {
    let mut open: Vec<&Task> = tasks
        .iter()
        .copied()
        .filter(|t| !t.is_completed() && t.deadline.is_some())
        .collect();
    open.sort_by_key(|t| t.deadline);
    open.truncate(limit);
    open
}

/// Whether the start of `deadline` is less than `within_days` away from
/// `now`. Past deadlines are urgent.
pub fn is_deadline_urgent(deadline: NaiveDate, now: DateTime<Utc>, within_days: i64) -> bool {
    local_start_of_day(deadline) - now < Duration::days(within_days)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionSummary {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

impl CompletionSummary {
    pub fn from_tasks(tasks: &[&Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.is_completed()).count();
        Self {
            completed,
            total: tasks.len(),
            percentage: super::completion_rate(completed, tasks.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadline {
    pub id: String,
    pub title: String,
    pub deadline: NaiveDate,
    pub urgent: bool,
}

/// Home screen summary for the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user_name: String,
    pub today: CompletionSummary,
    pub allocated_minutes: i64,
    pub allocated: String,
    pub productivity_score: u8,
    pub description: &'static str,
    pub completed_last_week: usize,
    pub upcoming: Vec<UpcomingDeadline>,
}

impl Dashboard {
    pub fn build(
        user_name: &str,
        tasks: &[&Task],
        now: DateTime<Utc>,
        config: &DashboardConfig,
    ) -> Self {
        let today = local_date(now);
        let today_tasks: Vec<&Task> = tasks
            .iter()
            .copied()
            .filter(|t| t.deadline == Some(today))
            .collect();
        let allocated = allocated_minutes(&today_tasks);
        let score = productivity_score(tasks.iter().copied(), now);

        let upcoming = upcoming_deadlines(tasks, config.upcoming_limit)
            .into_iter()
            .filter_map(|t| {
                let deadline = t.deadline?;
                Some(UpcomingDeadline {
                    id: t.id.clone(),
                    title: t.title.clone(),
                    deadline,
                    urgent: is_deadline_urgent(deadline, now, config.urgent_within_days),
                })
            })
            .collect();

        Self {
            user_name: if user_name.trim().is_empty() {
                "User".to_string()
            } else {
                user_name.to_string()
            },
            today: CompletionSummary::from_tasks(&today_tasks),
            allocated_minutes: allocated,
            allocated: format_allocated(allocated),
            productivity_score: score,
            description: ProductivityLevel::from_score(score).label(),
            completed_last_week: completed_last_week(tasks, now),
            upcoming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, TaskCategory, TaskStatus, TimeOfDay};
    use crate::time_utils::local_noon;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn task(title: &str, deadline: Option<NaiveDate>, status: TaskStatus) -> Task {
        let at = local_noon(today());
        Task {
            id: title.to_string(),
            user_id: "u@x.edu".into(),
            title: title.to_string(),
            description: String::new(),
            category: TaskCategory::Study,
            priority: Priority::Medium,
            status,
            deadline,
            start_time: None,
            end_time: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn timed(title: &str, start: &str, end: &str) -> Task {
        let mut t = task(title, Some(today()), TaskStatus::Todo);
        t.start_time = Some(start.parse::<TimeOfDay>().unwrap());
        t.end_time = Some(end.parse::<TimeOfDay>().unwrap());
        t
    }

    #[test]
    fn allocated_time_sums_timed_tasks() {
        let tasks = [
            timed("a", "08:00", "09:30"),
            timed("b", "13:00", "14:00"),
            task("untimed", Some(today()), TaskStatus::Todo),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        assert_eq!(allocated_minutes(&refs), 150);
        assert_eq!(format_allocated(150), "2h 30m");
        assert_eq!(format_allocated(120), "2h");
        assert_eq!(format_allocated(0), "0h");
    }

    #[test]
    fn upcoming_skips_done_and_undated() {
        let tasks = [
            task("later", Some(today() + Duration::days(9)), TaskStatus::Todo),
            task("done", Some(today()), TaskStatus::Completed),
            task("none", None, TaskStatus::Todo),
            task("soon", Some(today() + Duration::days(1)), TaskStatus::Miss),
            task("mid", Some(today() + Duration::days(4)), TaskStatus::Todo),
            task("last", Some(today() + Duration::days(20)), TaskStatus::Todo),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let titles: Vec<_> = upcoming_deadlines(&refs, 3)
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["soon", "mid", "later"]);
    }

    #[test]
    fn urgency_window() {
        let now = local_noon(today());
        assert!(is_deadline_urgent(today(), now, 2));
        assert!(is_deadline_urgent(today() - Duration::days(3), now, 2));
        assert!(is_deadline_urgent(today() + Duration::days(2), now, 2));
        assert!(!is_deadline_urgent(today() + Duration::days(3), now, 2));
    }

    #[test]
    fn completion_summary() {
        let tasks = [
            task("a", Some(today()), TaskStatus::Completed),
            task("b", Some(today()), TaskStatus::Todo),
            task("c", Some(today()), TaskStatus::Todo),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        assert_eq!(
            CompletionSummary::from_tasks(&refs),
            CompletionSummary {
                completed: 1,
                total: 3,
                percentage: 33
            }
        );
        assert_eq!(CompletionSummary::from_tasks(&[]).percentage, 0);
    }

    #[test]
    fn dashboard_defaults_name_and_limits_upcoming() {
        let tasks: Vec<Task> = (1..=5)
            .map(|d| task(&format!("t{d}"), Some(today() + Duration::days(d)), TaskStatus::Todo))
            .collect();
        let refs: Vec<&Task> = tasks.iter().collect();
        let dash = Dashboard::build(" ", &refs, local_noon(today()), &DashboardConfig::default());
        assert_eq!(dash.user_name, "User");
        assert_eq!(dash.upcoming.len(), 3);
        assert!(dash.upcoming[0].urgent);
        assert!(!dash.upcoming[2].urgent);
        assert_eq!(dash.today.total, 0);
    }
}
