//! Application façade.
//!
//! [`Studyroom`] owns the storage pair, the configuration and every store.
//! It keeps the stores scoped to the signed-in user and writes the affected
//! list back after each successful mutation.

use chrono::{DateTime, NaiveDate, Utc};

use crate::analytics::{random_quote, AnalyticsReport, Dashboard};
use crate::calendar::WeekView;
use crate::error::Result;
use crate::pomodoro::{PomodoroLog, PomodoroTimer, TimerEvent, TimerType};
use crate::storage::{load_record, save_json, Config, Storage, TIMER_ENGINE_KEY};
use crate::task::{paginate, Page, Task, TaskDraft, TaskFilter, TaskPatch, TaskStatus, TaskStore};
use crate::time_utils::local_today;
use crate::user::{ProfileUpdate, Registration, Session, User, UserStore};

pub struct Studyroom {
    storage: Storage,
    config: Config,
    users: UserStore,
    tasks: TaskStore,
    pomodoro: PomodoroLog,
    timer: PomodoroTimer,
}

impl Studyroom {
    /// Load every store and scope them to the stored session, if any.
    pub fn open(storage: Storage, config: Config) -> Self {
        let users = UserStore::load(&storage);
        let tasks = TaskStore::load(storage.local.as_ref());
        let pomodoro = PomodoroLog::load(storage.local.as_ref());
        let mut timer = load_record::<PomodoroTimer>(storage.local.as_ref(), TIMER_ENGINE_KEY)
            .unwrap_or_else(|| PomodoroTimer::new(config.timer.clone()));
        timer.set_durations(config.timer.clone());

        let mut app = Self {
            storage,
            config,
            users,
            tasks,
            pomodoro,
            timer,
        };
        app.sync_current_user();
        app
    }

    /// On-disk storage and `config.toml` from the data directory.
    pub fn open_default() -> Result<Self> {
        let storage = Storage::open_default()?;
        Ok(Self::open(storage, Config::load_or_default()))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn sync_current_user(&mut self) {
        let user_id = self.users.current_user_id().map(str::to_string);
        tracing::debug!(user = ?user_id, "current user");
        self.tasks.set_current_user(user_id.clone());
        self.pomodoro.set_current_user(user_id);
    }

    // ── Account ──────────────────────────────────────────────────────

    pub fn register(&mut self, registration: Registration) -> Result<User> {
        let user = self.users.register(registration)?.clone();
        self.users.save(&self.storage)?;
        Ok(user)
    }

    pub fn login(&mut self, email: &str, password: &str, remember_me: bool) -> Result<Session> {
        let session = self.users.login(email, password, remember_me)?.clone();
        self.users.save(&self.storage)?;
        self.sync_current_user();
        Ok(session)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.users.logout();
        self.users.save(&self.storage)?;
        self.sync_current_user();
        Ok(())
    }

    pub fn session(&self) -> Option<&Session> {
        self.users.session()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.users.current_user()
    }

    /// Returns `false` when nothing changed.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<bool> {
        let changed = self.users.update_profile(update, local_today())?;
        if changed {
            self.users.save(&self.storage)?;
        }
        Ok(changed)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    /// Validate like the task form, then create and persist.
    pub fn create_task(&mut self, draft: TaskDraft) -> Result<Task> {
        self.tasks.validate_draft(&draft, None)?;
        let task = self.tasks.add_task(draft)?.clone();
        self.save_tasks()?;
        Ok(task)
    }

    /// Validate the task as it would look after `patch`, then apply it.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        if let Some(existing) = self.tasks.get(id) {
            let mut merged = existing.clone();
            patch.clone().apply_to(&mut merged);
            let draft = TaskDraft {
                title: merged.title,
                description: merged.description,
                category: merged.category,
                priority: merged.priority,
                deadline: merged.deadline,
                start_time: merged.start_time,
                end_time: merged.end_time,
            };
            self.tasks.validate_draft(&draft, Some(id))?;
        }
        let task = self.tasks.update_task(id, patch)?.clone();
        self.save_tasks()?;
        Ok(task)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let task = self.tasks.delete_task(id)?;
        self.save_tasks()?;
        Ok(task)
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<Task> {
        let task = self.tasks.toggle_task(id)?.clone();
        self.save_tasks()?;
        Ok(task)
    }

    pub fn set_task_status(&mut self, id: &str, status: TaskStatus) -> Result<Task> {
        let task = self.tasks.set_status(id, status)?.clone();
        self.save_tasks()?;
        Ok(task)
    }

    /// Filtered tasks, one page at a time, sized by `calendar.page_size`.
    pub fn search(&self, filter: &TaskFilter, page: usize) -> Page<&Task> {
        let found = filter.apply(self.tasks.tasks());
        paginate(found, page, self.config.calendar.page_size)
    }

    fn save_tasks(&self) -> Result<()> {
        self.tasks.save(self.storage.local.as_ref())
    }

    // ── Pomodoro ─────────────────────────────────────────────────────

    pub fn pomodoro(&self) -> &PomodoroLog {
        &self.pomodoro
    }

    pub fn timer(&self) -> &PomodoroTimer {
        &self.timer
    }

    /// Advance the timer. A completed run is recorded for the current user.
    pub fn timer_tick(&mut self) -> Result<Option<TimerEvent>> {
        let event = self.timer.tick();
        if let Some(TimerEvent::TimerCompleted {
            timer_type,
            duration_minutes,
            at,
        }) = &event
        {
            self.record_session(*timer_type, *duration_minutes, *at)?;
        }
        self.save_timer()?;
        Ok(event)
    }

    /// Start or pause; a completed timer is reset. Pending completion is
    /// flushed first, so the returned list may hold two events.
    pub fn timer_toggle(&mut self) -> Result<Vec<TimerEvent>> {
        let mut events: Vec<TimerEvent> = self.timer_tick()?.into_iter().collect();
        events.push(self.timer.toggle());
        self.save_timer()?;
        Ok(events)
    }

    pub fn timer_reset(&mut self) -> Result<TimerEvent> {
        let event = self.timer.reset();
        self.save_timer()?;
        Ok(event)
    }

    pub fn timer_change_type(&mut self, timer_type: TimerType) -> Result<TimerEvent> {
        let event = self.timer.change_type(timer_type);
        self.save_timer()?;
        Ok(event)
    }

    /// Log a finished run. Without a signed-in user the run is dropped.
    pub fn record_session(
        &mut self,
        timer_type: TimerType,
        duration_minutes: u32,
        at: DateTime<Utc>,
    ) -> Result<()> {
        if self.users.current_user_id().is_none() {
            tracing::warn!(%timer_type, "timer completed while signed out, session not recorded");
            return Ok(());
        }
        self.pomodoro.add_session(timer_type, duration_minutes, at)?;
        self.pomodoro.save(self.storage.local.as_ref())
    }

    fn save_timer(&self) -> Result<()> {
        save_json(self.storage.local.as_ref(), TIMER_ENGINE_KEY, &self.timer)
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn productivity_score(&self, now: DateTime<Utc>) -> u8 {
        self.tasks.productivity_score(now)
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> Dashboard {
        let name = self
            .users
            .session()
            .map(|s| s.full_name.as_str())
            .unwrap_or_default();
        Dashboard::build(name, &self.tasks.tasks(), now, &self.config.dashboard)
    }

    pub fn analytics(&self, now: DateTime<Utc>) -> AnalyticsReport {
        AnalyticsReport::build(&self.tasks.tasks(), self.pomodoro.stats(), now, random_quote())
    }

    pub fn week(&self, start: NaiveDate) -> WeekView<'_> {
        WeekView::build(start, &self.tasks.tasks_for_week(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, CoreError, ValidationError};
    use crate::storage::{KvStore, SESSION_KEY, TASKS_KEY};
    use crate::task::TaskCategory;

    fn registration(email: &str) -> Registration {
        Registration {
            email: email.into(),
            password: "pw".into(),
            full_name: "Tran Thi Binh".into(),
            university: "VNU".into(),
            ..Default::default()
        }
    }

    fn signed_in(email: &str) -> Studyroom {
        let mut app = Studyroom::open(Storage::in_memory().unwrap(), Config::default());
        app.register(registration(email)).unwrap();
        app.login(email, "pw", true).unwrap();
        app
    }

    fn timed(title: &str, start: &str, end: &str) -> TaskDraft {
        let mut draft = TaskDraft::new(title, TaskCategory::Study);
        draft.deadline = NaiveDate::from_ymd_opt(2026, 10, 20);
        draft.start_time = Some(start.parse().unwrap());
        draft.end_time = Some(end.parse().unwrap());
        draft
    }

    #[test]
    fn mutations_persist_immediately() {
        let mut app = signed_in("a@uni.edu");
        app.create_task(TaskDraft::new("Read", TaskCategory::Study)).unwrap();
        let raw = app.storage.local.get(TASKS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"Read\""));
        assert!(app.storage.local.get(SESSION_KEY).unwrap().is_some());
    }

    #[test]
    fn logout_unscopes_tasks() {
        let mut app = signed_in("a@uni.edu");
        app.create_task(TaskDraft::new("Read", TaskCategory::Study)).unwrap();
        app.logout().unwrap();
        assert!(app.tasks().tasks().is_empty());
        assert!(matches!(
            app.create_task(TaskDraft::new("x", TaskCategory::Study)),
            Err(CoreError::Auth(AuthError::NotSignedIn))
        ));
    }

    #[test]
    fn create_rejects_conflict_and_bad_range() {
        let mut app = signed_in("a@uni.edu");
        app.create_task(timed("Lecture", "09:00", "11:00")).unwrap();
        assert!(matches!(
            app.create_task(timed("Gym", "10:00", "12:00")),
            Err(CoreError::Validation(ValidationError::TimeConflict { .. }))
        ));
        assert!(matches!(
            app.create_task(timed("Backwards", "15:00", "14:00")),
            Err(CoreError::Validation(ValidationError::InvalidTimeRange { .. }))
        ));
        assert_eq!(app.tasks().tasks().len(), 1);
    }

    #[test]
    fn update_may_keep_own_slot_but_not_take_anothers() {
        let mut app = signed_in("a@uni.edu");
        let lecture = app.create_task(timed("Lecture", "09:00", "11:00")).unwrap();
        let lab = app.create_task(timed("Lab", "13:00", "15:00")).unwrap();

        let rename = TaskPatch {
            title: Some("Lecture 2".into()),
            ..Default::default()
        };
        assert_eq!(app.update_task(&lecture.id, rename).unwrap().title, "Lecture 2");

        let clash = TaskPatch {
            start_time: Some(Some("10:00".parse().unwrap())),
            ..Default::default()
        };
        assert!(app.update_task(&lab.id, clash).is_err());
        assert_eq!(app.tasks().get(&lab.id).unwrap().start_time, lab.start_time);
    }

    #[test]
    fn reopen_restores_session_and_scope() {
        let mut app = signed_in("a@uni.edu");
        app.create_task(TaskDraft::new("Keep", TaskCategory::Family)).unwrap();
        let storage = app.storage;

        let reopened = Studyroom::open(storage, Config::default());
        assert_eq!(reopened.session().unwrap().email, "a@uni.edu");
        assert_eq!(reopened.tasks().tasks().len(), 1);
    }

    #[test]
    fn record_session_needs_user() {
        let mut app = Studyroom::open(Storage::in_memory().unwrap(), Config::default());
        app.record_session(TimerType::Focus, 25, Utc::now()).unwrap();
        assert_eq!(app.pomodoro().stats().total_focus_sessions, 0);

        let mut app = signed_in("a@uni.edu");
        app.record_session(TimerType::Focus, 25, Utc::now()).unwrap();
        assert_eq!(app.pomodoro().stats().total_minutes, 25);
    }

    #[test]
    fn timer_state_survives_reopen() {
        let mut app = signed_in("a@uni.edu");
        app.timer_change_type(TimerType::LongBreak).unwrap();
        let reopened = Studyroom::open(app.storage, Config::default());
        assert_eq!(reopened.timer().timer_type(), TimerType::LongBreak);
        assert_eq!(reopened.timer().remaining_secs(), 15 * 60);
    }

    #[test]
    fn search_pages_by_config() {
        let mut app = signed_in("a@uni.edu");
        for i in 0..7 {
            app.create_task(TaskDraft::new(format!("Task {i}"), TaskCategory::Study))
                .unwrap();
        }
        let page = app.search(&TaskFilter::default(), 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 2);
    }
}
