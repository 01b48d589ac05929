//! Task model.
//!
//! A task belongs to exactly one user (by email), sits in one of four fixed
//! categories, and may be pinned to a calendar day and a time slot on it.

pub mod filter;
mod store;

pub use filter::{paginate, Page, TaskFilter, TaskStats};
pub use store::TaskStore;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Fixed task categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum TaskCategory {
    Study,
    PersonalGrowth,
    Entertainment,
    Family,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 4] = [
        TaskCategory::Study,
        TaskCategory::PersonalGrowth,
        TaskCategory::Entertainment,
        TaskCategory::Family,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Study => "study",
            TaskCategory::PersonalGrowth => "personal-growth",
            TaskCategory::Entertainment => "entertainment",
            TaskCategory::Family => "family",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskCategory::Study => "Study",
            TaskCategory::PersonalGrowth => "Personal growth",
            TaskCategory::Entertainment => "Entertainment",
            TaskCategory::Family => "Family",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// High and medium tasks count as important for scoring.
    pub fn is_important(&self) -> bool {
        matches!(self, Priority::High | Priority::Medium)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Task status. `Miss` marks a task the user gave up on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Miss,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Miss => "miss",
            TaskStatus::Completed => "completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

macro_rules! impl_from_str {
    ($ty:ty, $what:literal, [$($variant:expr),+]) => {
        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| ValidationError::invalid($what, format!("unknown value '{s}'")))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_from_str!(TaskCategory, "category", [
    TaskCategory::Study,
    TaskCategory::PersonalGrowth,
    TaskCategory::Entertainment,
    TaskCategory::Family
]);
impl_from_str!(Priority, "priority", [Priority::Low, Priority::Medium, Priority::High]);
impl_from_str!(TaskStatus, "status", [TaskStatus::Todo, TaskStatus::Miss, TaskStatus::Completed]);

/// Clock time within a day, stored as minutes since midnight and written as
/// `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self(hour * 60 + minute))
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::invalid("time", format!("expected HH:MM, got '{s}'"));
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u16 = h.parse().map_err(|_| invalid())?;
        let minute: u16 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// Email of the owning user.
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: TaskCategory,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<TimeOfDay>,
    #[serde(default)]
    pub end_time: Option<TimeOfDay>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Start and end time when both are set.
    pub fn time_range(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        Some((self.start_time?, self.end_time?))
    }

    /// Scheduled length in minutes; zero for untimed tasks.
    pub fn scheduled_minutes(&self) -> i64 {
        self.time_range()
            .map(|(start, end)| {
                end.minutes_since_midnight() as i64 - start.minutes_since_midnight() as i64
            })
            .unwrap_or(0)
    }

    /// Whether this task's slot on `date` overlaps `[start, end)`.
    pub fn overlaps(&self, date: NaiveDate, start: TimeOfDay, end: TimeOfDay) -> bool {
        if self.deadline != Some(date) {
            return false;
        }
        match self.time_range() {
            Some((task_start, task_end)) => start < task_end && task_start < end,
            None => false,
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, category: TaskCategory) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category,
            priority: Priority::default(),
            deadline: None,
            start_time: None,
            end_time: None,
        }
    }

    /// Form-level checks: a title, and both-or-neither times with the end
    /// after the start.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::invalid("title", "must not be empty"));
        }
        validate_times(self.start_time, self.end_time)
    }
}

pub(crate) fn validate_times(
    start: Option<TimeOfDay>,
    end: Option<TimeOfDay>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end <= start => Err(ValidationError::InvalidTimeRange {
            start: start.to_string(),
            end: end.to_string(),
        }),
        (Some(_), None) | (None, Some(_)) => Err(ValidationError::invalid(
            "time",
            "start and end time must be given together",
        )),
        _ => Ok(()),
    }
}

/// Partial update; `None` leaves a field unchanged.
///
/// The optional schedule fields use a nested option so they can be cleared:
/// `Some(None)` removes the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<TaskCategory>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub deadline: Option<Option<NaiveDate>>,
    pub start_time: Option<Option<TimeOfDay>>,
    pub end_time: Option<Option<TimeOfDay>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(self, task: &mut Task) {
        if let Some(t) = self.title {
            task.title = t;
        }
        if let Some(d) = self.description {
            task.description = d;
        }
        if let Some(c) = self.category {
            task.category = c;
        }
        if let Some(p) = self.priority {
            task.priority = p;
        }
        if let Some(s) = self.status {
            task.status = s;
        }
        if let Some(d) = self.deadline {
            task.deadline = d;
        }
        if let Some(t) = self.start_time {
            task.start_time = t;
        }
        if let Some(t) = self.end_time {
            task.end_time = t;
        }
    }
}
