//! Error types for roomsched.
//!
//! The timetable projector itself never fails; these errors come from
//! config loading and from parsing user input (dates, slots, statuses).

use thiserror::Error;

/// Errors that can occur in roomsched operations.
#[derive(Error, Debug)]
pub enum RoomschedError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid status '{0}'. Expected one of: scheduled, in_progress, completed, cancelled")]
    InvalidStatus(String),

    #[error("Invalid view '{0}'. Expected 'week' or 'room'")]
    InvalidView(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
}

/// Result type alias for roomsched operations.
pub type RoomschedResult<T> = Result<T, RoomschedError>;
