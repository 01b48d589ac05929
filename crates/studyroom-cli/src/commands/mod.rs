pub mod auth;
pub mod calendar;
pub mod config;
pub mod profile;
pub mod stats;
pub mod task;
pub mod timer;

use serde::Serialize;
use studyroom_core::Studyroom;

/// Open the on-disk stores and configuration.
pub fn open_app() -> Result<Studyroom, Box<dyn std::error::Error>> {
    Ok(Studyroom::open_default()?)
}

/// Pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
