//! # Studyroom Core Library
//!
//! Domain logic for Studyroom, a personal productivity tool for students:
//! tasks on a weekly calendar, a pomodoro timer and productivity analytics.
//! The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Storage**: JSON lists under fixed keys in a SQLite-backed key-value
//!   store, plus TOML configuration
//! - **Stores**: accounts and session ([`UserStore`]), tasks ([`TaskStore`])
//!   and completed timer runs ([`PomodoroLog`]), each scoped to the signed-in
//!   user
//! - **Timer**: a wall-clock-based state machine that requires the caller to
//!   periodically invoke `tick()`
//! - **Analytics**: pure aggregates over the stores' contents
//!
//! ## Key Components
//!
//! - [`Studyroom`]: façade that loads, scopes and persists everything
//! - [`PomodoroTimer`]: countdown state machine
//! - [`Database`]: key-value persistence
//! - [`Config`]: application configuration management

pub mod analytics;
pub mod app;
pub mod calendar;
pub mod error;
pub mod pomodoro;
pub mod storage;
pub mod task;
pub mod time_utils;
pub mod user;

pub use app::Studyroom;
pub use error::{AuthError, ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use pomodoro::{PomodoroLog, PomodoroSession, PomodoroStats, PomodoroTimer, TimerEvent, TimerState, TimerType};
pub use storage::{Config, Database, KvStore, Storage};
pub use task::{
    Priority, Task, TaskCategory, TaskDraft, TaskFilter, TaskPatch, TaskStatus, TaskStore,
    TimeOfDay,
};
pub use user::{ProfileUpdate, Registration, Session, SessionScope, User, UserStore};
