//! Pomodoro timer and the log of completed runs.

mod log;
mod timer;

pub use log::{PomodoroLog, PomodoroSession, PomodoroStats};
pub use timer::{format_time, PomodoroTimer, TimerEvent, TimerSnapshot, TimerState};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerType {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerType {
    pub const ALL: [TimerType; 3] = [TimerType::Focus, TimerType::ShortBreak, TimerType::LongBreak];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerType::Focus => "focus",
            TimerType::ShortBreak => "shortBreak",
            TimerType::LongBreak => "longBreak",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerType::Focus => "Focus session",
            TimerType::ShortBreak => "Short break",
            TimerType::LongBreak => "Long break",
        }
    }
}

impl Default for TimerType {
    fn default() -> Self {
        TimerType::Focus
    }
}

impl fmt::Display for TimerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the stored names as well as kebab-case (`short-break`).
impl FromStr for TimerType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        TimerType::ALL
            .into_iter()
            .find(|t| t.as_str().to_lowercase() == wanted)
            .ok_or_else(|| ValidationError::invalid("timer_type", format!("unknown value '{s}'")))
    }
}
