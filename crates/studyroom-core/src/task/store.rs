//! Task state scoped to the signed-in user.
//!
//! The store keeps every user's tasks (they share one storage key) but only
//! ever exposes or mutates those of `current_user_id`.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{Task, TaskCategory, TaskDraft, TaskPatch, TaskStatus, TimeOfDay};
use crate::analytics;
use crate::error::{AuthError, Result, ValidationError};
use crate::storage::{load_json, save_json, KvStore, TASKS_KEY};
use crate::time_utils::days_from;

#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    current_user_id: Option<String>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            current_user_id: None,
        }
    }

    pub fn load(store: &dyn KvStore) -> Self {
        Self::new(load_json(store, TASKS_KEY))
    }

    /// Write every user's tasks back under [`TASKS_KEY`].
    pub fn save(&self, store: &dyn KvStore) -> Result<()> {
        save_json(store, TASKS_KEY, &self.tasks)
    }

    pub fn set_current_user(&mut self, user_id: Option<String>) {
        self.current_user_id = user_id;
    }

    pub fn current_user_id(&self) -> Option<&str> {
        self.current_user_id.as_deref()
    }

    fn require_user(&self) -> Result<String> {
        self.current_user_id
            .clone()
            .ok_or_else(|| AuthError::NotSignedIn.into())
    }

    fn user_tasks(&self) -> impl Iterator<Item = &Task> {
        let user = self.current_user_id.as_deref();
        self.tasks
            .iter()
            .filter(move |t| Some(t.user_id.as_str()) == user)
    }

    fn owned_mut(&mut self, id: &str) -> Result<&mut Task> {
        let user = self.require_user()?;
        self.tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user)
            .ok_or_else(|| {
                ValidationError::NotFound {
                    entity: "Task",
                    id: id.to_string(),
                }
                .into()
            })
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The current user's tasks, in creation order.
    pub fn tasks(&self) -> Vec<&Task> {
        self.user_tasks().collect()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.user_tasks().find(|t| t.id == id)
    }

    /// Tasks whose deadline falls on `today`.
    pub fn today_tasks(&self, today: NaiveDate) -> Vec<&Task> {
        self.user_tasks()
            .filter(|t| t.deadline == Some(today))
            .collect()
    }

    pub fn completed_count(&self) -> usize {
        self.user_tasks().filter(|t| t.is_completed()).count()
    }

    pub fn tasks_by_category(&self, category: TaskCategory) -> Vec<&Task> {
        self.user_tasks()
            .filter(|t| t.category == category)
            .collect()
    }

    /// High-priority tasks.
    pub fn important_tasks(&self) -> Vec<&Task> {
        self.user_tasks()
            .filter(|t| t.priority == super::Priority::High)
            .collect()
    }

    /// First task on `date` whose time slot overlaps `[start, end)`.
    ///
    /// Untimed tasks never conflict; `exclude_id` skips the task being edited.
    pub fn check_time_conflict(
        &self,
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        exclude_id: Option<&str>,
    ) -> Option<&Task> {
        self.user_tasks()
            .filter(|t| Some(t.id.as_str()) != exclude_id)
            .find(|t| t.overlaps(date, start, end))
    }

    /// Seven days starting at `start`, each with the tasks due that day.
    pub fn tasks_for_week(&self, start: NaiveDate) -> BTreeMap<NaiveDate, Vec<&Task>> {
        days_from(start, 7)
            .map(|day| {
                let due = self
                    .user_tasks()
                    .filter(|t| t.deadline == Some(day))
                    .collect();
                (day, due)
            })
            .collect()
    }

    /// Weighted 0-100 score over the last seven days of activity.
    pub fn productivity_score(&self, now: DateTime<Utc>) -> u8 {
        if self.current_user_id.is_none() {
            return 0;
        }
        analytics::productivity_score(self.user_tasks(), now)
    }

    /// Check a draft the way the task form does: field rules first, then an
    /// overlap with another task on the same day.
    pub fn validate_draft(&self, draft: &TaskDraft, exclude_id: Option<&str>) -> Result<()> {
        draft.validate()?;
        if let (Some(date), Some(start), Some(end)) = (draft.deadline, draft.start_time, draft.end_time) {
            if let Some(other) = self.check_time_conflict(date, start, end, exclude_id) {
                let (other_start, other_end) = other.time_range().unwrap_or((start, end));
                return Err(ValidationError::TimeConflict {
                    task_id: other.id.clone(),
                    title: other.title.clone(),
                    start: other_start.to_string(),
                    end: other_end.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a task owned by the current user.
    ///
    /// Time-range rules are the caller's concern (see [`Self::validate_draft`]).
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<&Task> {
        let user_id = self.require_user()?;
        let now = Utc::now();
        self.tasks.push(Task {
            id: Uuid::new_v4().to_string(),
            user_id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            priority: draft.priority,
            status: TaskStatus::Todo,
            deadline: draft.deadline,
            start_time: draft.start_time,
            end_time: draft.end_time,
            created_at: now,
            updated_at: now,
        });
        let task = &self.tasks[self.tasks.len() - 1];
        tracing::debug!(id = %task.id, "task added");
        Ok(&*task)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<&Task> {
        let task = self.owned_mut(id)?;
        patch.apply_to(task);
        task.updated_at = Utc::now();
        Ok(&*task)
    }

    /// Remove one task; every other task is left untouched.
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let user = self.require_user()?;
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id && t.user_id == user)
            .ok_or_else(|| ValidationError::NotFound {
                entity: "Task",
                id: id.to_string(),
            })?;
        tracing::debug!(id, "task deleted");
        Ok(self.tasks.remove(index))
    }

    /// Flip between completed and todo. A missed task becomes completed.
    pub fn toggle_task(&mut self, id: &str) -> Result<&Task> {
        let task = self.owned_mut(id)?;
        task.status = if task.is_completed() {
            TaskStatus::Todo
        } else {
            TaskStatus::Completed
        };
        task.updated_at = Utc::now();
        Ok(&*task)
    }

    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<&Task> {
        let task = self.owned_mut(id)?;
        task.status = status;
        task.updated_at = Utc::now();
        Ok(&*task)
    }
}
