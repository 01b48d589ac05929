use chrono::NaiveDate;
use clap::Subcommand;
use studyroom_core::calendar::{next_week, previous_week, week_start};
use studyroom_core::time_utils::local_today;

use super::{open_app, print_json};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Show one week laid out in hourly slots
    Week {
        /// Any date in the week (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Weeks to move from that date; negative goes back
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,
    },
}

pub fn run(action: CalendarAction) -> Result<(), Box<dyn std::error::Error>> {
    let app = open_app()?;

    match action {
        CalendarAction::Week { date, offset } => {
            let mut start = week_start(date.unwrap_or_else(local_today));
            for _ in 0..offset.unsigned_abs() {
                start = if offset < 0 {
                    previous_week(start)
                } else {
                    next_week(start)
                };
            }
            print_json(&app.week(start))?;
        }
    }
    Ok(())
}
