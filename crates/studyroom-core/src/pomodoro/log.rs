use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TimerType;
use crate::error::{AuthError, Result};
use crate::storage::{load_json, save_json, KvStore, POMODORO_KEY};
use crate::time_utils::local_date;

/// One finished timer run. Never edited once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSession {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub timer_type: TimerType,
    /// Length of the run in minutes.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroStats {
    pub total_focus_sessions: usize,
    pub total_short_breaks: usize,
    pub total_long_breaks: usize,
    pub total_minutes: u64,
}

impl PomodoroStats {
    pub fn from_sessions<'a, I>(sessions: I) -> Self
    where
        I: IntoIterator<Item = &'a PomodoroSession>,
    {
        sessions.into_iter().fold(Self::default(), |mut stats, s| {
            match s.timer_type {
                TimerType::Focus => stats.total_focus_sessions += 1,
                TimerType::ShortBreak => stats.total_short_breaks += 1,
                TimerType::LongBreak => stats.total_long_breaks += 1,
            }
            stats.total_minutes += u64::from(s.duration_minutes);
            stats
        })
    }
}

/// Append-only record of completed runs, shared by all users and filtered to
/// the current one.
#[derive(Debug, Clone, Default)]
pub struct PomodoroLog {
    sessions: Vec<PomodoroSession>,
    current_user_id: Option<String>,
}

impl PomodoroLog {
    pub fn load(store: &dyn KvStore) -> Self {
        Self {
            sessions: load_json(store, POMODORO_KEY),
            current_user_id: None,
        }
    }

    pub fn save(&self, store: &dyn KvStore) -> Result<()> {
        save_json(store, POMODORO_KEY, &self.sessions)
    }

    pub fn set_current_user(&mut self, user_id: Option<String>) {
        self.current_user_id = user_id;
    }

    fn user_sessions(&self) -> impl Iterator<Item = &PomodoroSession> {
        let user = self.current_user_id.as_deref();
        self.sessions
            .iter()
            .filter(move |s| Some(s.user_id.as_str()) == user)
    }

    pub fn sessions(&self) -> Vec<&PomodoroSession> {
        self.user_sessions().collect()
    }

    pub fn add_session(
        &mut self,
        timer_type: TimerType,
        duration_minutes: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<&PomodoroSession> {
        let user_id = self
            .current_user_id
            .clone()
            .ok_or(AuthError::NotSignedIn)?;
        self.sessions.push(PomodoroSession {
            id: Uuid::new_v4().to_string(),
            user_id,
            timer_type,
            duration_minutes,
            completed_at,
        });
        tracing::debug!(%timer_type, duration_minutes, "pomodoro session recorded");
        Ok(&self.sessions[self.sessions.len() - 1])
    }

    /// Sessions completed on `today` in local time.
    pub fn today_sessions(&self, today: NaiveDate) -> Vec<&PomodoroSession> {
        self.user_sessions()
            .filter(|s| local_date(s.completed_at) == today)
            .collect()
    }

    pub fn stats(&self) -> PomodoroStats {
        PomodoroStats::from_sessions(self.user_sessions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use crate::time_utils::local_noon;
    use chrono::Duration;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn log_for(user: &str) -> PomodoroLog {
        let mut log = PomodoroLog::default();
        log.set_current_user(Some(user.into()));
        log
    }

    #[test]
    fn requires_sign_in() {
        let mut log = PomodoroLog::default();
        assert!(log.add_session(TimerType::Focus, 25, Utc::now()).is_err());
    }

    #[test]
    fn today_and_stats() {
        let mut log = log_for("a@uni.edu");
        log.add_session(TimerType::Focus, 25, local_noon(day(17))).unwrap();
        log.add_session(TimerType::ShortBreak, 5, local_noon(day(17)) + Duration::hours(1))
            .unwrap();
        log.add_session(TimerType::Focus, 25, local_noon(day(16))).unwrap();

        assert_eq!(log.today_sessions(day(17)).len(), 2);
        assert_eq!(
            log.stats(),
            PomodoroStats {
                total_focus_sessions: 2,
                total_short_breaks: 1,
                total_long_breaks: 0,
                total_minutes: 55,
            }
        );
    }

    #[test]
    fn other_users_sessions_hidden() {
        let mut log = log_for("a@uni.edu");
        log.add_session(TimerType::LongBreak, 15, Utc::now()).unwrap();
        log.set_current_user(Some("b@uni.edu".into()));
        assert!(log.sessions().is_empty());
        assert_eq!(log.stats(), PomodoroStats::default());
    }

    #[test]
    fn stored_shape_and_reload() {
        let db = Database::open_memory().unwrap();
        let mut log = log_for("a@uni.edu");
        log.add_session(TimerType::ShortBreak, 5, Utc::now()).unwrap();
        log.save(&db).unwrap();

        let raw = db.kv_get(POMODORO_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["type"], "shortBreak");
        assert_eq!(json[0]["duration"], 5);
        assert_eq!(json[0]["userId"], "a@uni.edu");

        let mut reloaded = PomodoroLog::load(&db);
        reloaded.set_current_user(Some("a@uni.edu".into()));
        assert_eq!(reloaded.sessions().len(), 1);
    }
}
