use clap::Subcommand;
use studyroom_core::TimerType;

use super::{open_app, print_json};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause a running countdown
    Pause,
    /// Start if stopped, pause if running, reset if finished
    Toggle,
    /// Refill the countdown for the current type
    Reset,
    /// Switch between focus, short-break and long-break
    Type {
        timer_type: TimerType,
    },
    /// Print current timer state as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;

    // Flush elapsed time first; a run that finished since the last command
    // is recorded here.
    if let Some(event) = app.timer_tick()? {
        print_json(&event)?;
    }

    match action {
        TimerAction::Start => {
            if !app.timer().is_running() {
                for event in app.timer_toggle()? {
                    print_json(&event)?;
                }
            }
        }
        TimerAction::Pause => {
            if app.timer().is_running() {
                for event in app.timer_toggle()? {
                    print_json(&event)?;
                }
            }
        }
        TimerAction::Toggle => {
            for event in app.timer_toggle()? {
                print_json(&event)?;
            }
        }
        TimerAction::Reset => {
            print_json(&app.timer_reset()?)?;
        }
        TimerAction::Type { timer_type } => {
            print_json(&app.timer_change_type(timer_type)?)?;
        }
        TimerAction::Status => {}
    }

    print_json(&app.timer().snapshot())?;
    Ok(())
}
