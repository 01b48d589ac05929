//! Pomodoro countdown.
//!
//! The timer is a wall-clock-based state machine with no internal thread.
//! The caller is responsible for calling `tick()` periodically; each call
//! flushes the time elapsed since the previous one.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!        Completed -> (toggle/reset) -> Idle
//! ```
//!
//! Changing the timer type always returns to `Idle` with a full countdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TimerType;
use crate::storage::TimerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Emitted by timer commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    TimerStarted {
        timer_type: TimerType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A run reached zero. Emitted exactly once per run.
    TimerCompleted {
        timer_type: TimerType,
        duration_minutes: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        timer_type: TimerType,
        at: DateTime<Utc>,
    },
}

/// Read-only view for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub timer_type: TimerType,
    pub label: &'static str,
    pub state: TimerState,
    pub remaining_secs: u64,
    pub total_secs: u64,
    /// `remaining_secs` as `MM:SS`.
    pub display: String,
    pub progress_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroTimer {
    timer_type: TimerType,
    state: TimerState,
    remaining_ms: u64,
    /// Epoch milliseconds of the last flush while running.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
    #[serde(default)]
    durations: TimerConfig,
    /// Length of the current run, fixed when the countdown is refilled.
    #[serde(default)]
    run_minutes: u32,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

impl PomodoroTimer {
    /// A focus timer, idle, with a full countdown.
    pub fn new(durations: TimerConfig) -> Self {
        let mut timer = Self {
            timer_type: TimerType::Focus,
            state: TimerState::Idle,
            remaining_ms: 0,
            last_tick_epoch_ms: None,
            durations,
            run_minutes: 0,
        };
        timer.refill();
        timer
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer_type(&self) -> TimerType {
        self.timer_type
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_completed(&self) -> bool {
        self.state == TimerState::Completed
    }

    /// Length of the current run. Config changes apply from the next run.
    pub fn duration_minutes(&self) -> u32 {
        if self.run_minutes == 0 {
            self.durations.minutes(self.timer_type)
        } else {
            self.run_minutes
        }
    }

    pub fn total_secs(&self) -> u64 {
        u64::from(self.duration_minutes()) * 60
    }

    fn total_ms(&self) -> u64 {
        self.total_secs() * 1000
    }

    /// Whole seconds left, rounded up so a fresh timer shows its full length.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }

    /// 0.0 .. 100.0 through the current run.
    pub fn progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (total - self.remaining_secs().min(total)) as f64 / total as f64 * 100.0
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            timer_type: self.timer_type,
            label: self.timer_type.label(),
            state: self.state,
            remaining_secs: self.remaining_secs(),
            total_secs: self.total_secs(),
            display: format_time(self.remaining_secs()),
            progress_pct: self.progress_pct(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch type; the countdown restarts from the new type's full length.
    pub fn change_type(&mut self, timer_type: TimerType) -> TimerEvent {
        self.timer_type = timer_type;
        self.reset()
    }

    /// Start or pause. A completed timer is reset instead.
    pub fn toggle(&mut self) -> TimerEvent {
        self.toggle_at(now_ms())
    }

    pub(crate) fn toggle_at(&mut self, now: u64) -> TimerEvent {
        match self.state {
            TimerState::Completed => self.reset(),
            TimerState::Running => {
                self.flush_elapsed(now);
                self.state = TimerState::Paused;
                self.last_tick_epoch_ms = None;
                TimerEvent::TimerPaused {
                    remaining_secs: self.remaining_secs(),
                    at: Utc::now(),
                }
            }
            TimerState::Idle | TimerState::Paused => {
                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now);
                TimerEvent::TimerStarted {
                    timer_type: self.timer_type,
                    remaining_secs: self.remaining_secs(),
                    at: Utc::now(),
                }
            }
        }
    }

    pub fn reset(&mut self) -> TimerEvent {
        self.state = TimerState::Idle;
        self.last_tick_epoch_ms = None;
        self.refill();
        TimerEvent::TimerReset {
            timer_type: self.timer_type,
            at: Utc::now(),
        }
    }

    /// Call periodically. Returns `Some(TimerCompleted)` when the run ends.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        self.tick_at(now_ms())
    }

    pub(crate) fn tick_at(&mut self, now: u64) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        let zero_at = self
            .last_tick_epoch_ms
            .map(|last| last.saturating_add(self.remaining_ms));
        self.flush_elapsed(now);
        if self.remaining_ms > 0 {
            return None;
        }
        self.state = TimerState::Completed;
        self.last_tick_epoch_ms = None;
        // The countdown may have reached zero long before this tick.
        let at = zero_at
            .and_then(|ms| i64::try_from(ms).ok())
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_else(Utc::now);
        Some(TimerEvent::TimerCompleted {
            timer_type: self.timer_type,
            duration_minutes: self.duration_minutes(),
            at,
        })
    }

    /// Replace the configured durations. An idle timer picks up the new
    /// length immediately; a run in progress keeps its countdown.
    pub fn set_durations(&mut self, durations: TimerConfig) {
        self.durations = durations;
        if self.state == TimerState::Idle {
            self.refill();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn refill(&mut self) {
        self.run_minutes = self.durations.minutes(self.timer_type);
        self.remaining_ms = self.total_ms();
    }

    fn flush_elapsed(&mut self, now: u64) {
        if let Some(last) = self.last_tick_epoch_ms {
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick_epoch_ms = Some(now);
        }
    }
}

/// Seconds as zero-padded `MM:SS`; minutes are not wrapped into hours.
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
