//! Heading text stamped with the local time of day.

use chrono::Local;

pub const TIME_MESSAGE_PREFIX: &str = "TODO list: ";

/// Local wall-clock time of day, `HH:MM:SS.mmm`. No date, no offset.
pub fn local_time_of_day() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

pub fn time_message() -> String {
    format!("{TIME_MESSAGE_PREFIX}{}", local_time_of_day())
}
