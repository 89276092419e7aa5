//! Core types for roomsched.
//!
//! This crate holds everything that does not talk to the network:
//! - `schedule` and `room` for the records served by the scheduling API
//! - `week` and `timetable` for projecting a snapshot onto a weekly grid
//! - `config` for the global config file

pub mod config;
pub mod error;
pub mod room;
pub mod schedule;
pub mod timetable;
pub mod week;

pub use schedule::{ClockTime, DisplayCategory, ScheduleDraft, ScheduleRecord, ScheduleStatus, status_category};
pub use timetable::{GridAssignment, Orientation, RoomFilter, ViewParameters, project};
pub use week::{WeekShift, WeekWindow, compute_week_window, shift_week};
