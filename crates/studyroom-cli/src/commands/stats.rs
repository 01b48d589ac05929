use chrono::Utc;
use clap::Subcommand;
use studyroom_core::analytics::{ProductivityLevel, Trend};
use studyroom_core::time_utils::local_today;
use studyroom_core::PomodoroStats;

use super::{open_app, print_json};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Pomodoro sessions today and overall
    Pomodoro,
    /// Productivity score for the last seven days
    Score,
    /// Home screen summary
    Dashboard,
    /// Full analytics report
    Analytics,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let app = open_app()?;
    let now = Utc::now();

    match action {
        StatsAction::Pomodoro => {
            let today = app.pomodoro().today_sessions(local_today());
            print_json(&serde_json::json!({
                "today": PomodoroStats::from_sessions(today.iter().copied()),
                "todaySessions": today,
                "total": app.pomodoro().stats(),
            }))?;
        }
        StatsAction::Score => {
            let score = app.productivity_score(now);
            let level = ProductivityLevel::from_score(score);
            print_json(&serde_json::json!({
                "score": score,
                "level": level,
                "description": level.label(),
                "trend": Trend::from_score(score),
            }))?;
        }
        StatsAction::Dashboard => {
            print_json(&app.dashboard(now))?;
        }
        StatsAction::Analytics => {
            print_json(&app.analytics(now))?;
        }
    }
    Ok(())
}
