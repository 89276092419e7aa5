//! Monday-first week windows and week navigation.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{RoomschedError, RoomschedResult};

/// Seven consecutive dates, Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekWindow {
    monday: NaiveDate,
}

/// The Monday..Sunday week containing `reference_date`.
///
/// Never panics. At the edges of the representable calendar the window is
/// clamped to `NaiveDate::MIN`/`MAX`, so its days may repeat there.
pub fn compute_week_window(reference_date: NaiveDate) -> WeekWindow {
    let offset = reference_date.weekday().num_days_from_monday() as u64;
    WeekWindow {
        monday: reference_date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN),
    }
}

/// Whether the whole week around `date` is representable.
fn full_week_exists(date: NaiveDate) -> bool {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(offset))
        .and_then(|monday| monday.checked_add_days(Days::new(6)))
        .is_some()
}

impl WeekWindow {
    pub const LEN: usize = 7;

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    pub fn sunday(&self) -> NaiveDate {
        self.day(6)
    }

    pub fn days(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.day(i as u64))
    }

    fn day(&self, offset: u64) -> NaiveDate {
        self.monday.checked_add_days(Days::new(offset)).unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.monday <= date && date <= self.sunday()
    }

    /// e.g. "Week of Jun 03, 2024"
    pub fn label(&self) -> String {
        format!("Week of {}", self.monday.format("%b %d, %Y"))
    }
}

/// Week navigation from the timetable controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekShift {
    Previous,
    Today,
    Next,
}

impl WeekShift {
    /// -1, 0 and +1. Anything else is not a week shift.
    pub fn from_direction(direction: i32) -> Option<Self> {
        match direction {
            -1 => Some(WeekShift::Previous),
            0 => Some(WeekShift::Today),
            1 => Some(WeekShift::Next),
            _ => None,
        }
    }
}

/// Move the reference date by one week, or reset it to `today`.
///
/// A shift past the end of the calendar leaves the date where it is.
pub fn shift_week(reference_date: NaiveDate, shift: WeekShift, today: NaiveDate) -> NaiveDate {
    let week = Days::new(7);
    match shift {
        WeekShift::Previous => reference_date.checked_sub_days(week).unwrap_or(reference_date),
        WeekShift::Today => today,
        WeekShift::Next => reference_date.checked_add_days(week).unwrap_or(reference_date),
    }
}

/// Parse a YYYY-MM-DD date from user input.
///
/// Dates whose Monday..Sunday week runs off the calendar are rejected.
pub fn parse_date(s: &str) -> RoomschedResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .filter(|date| full_week_exists(*date))
        .ok_or_else(|| RoomschedError::InvalidDate(s.to_string()))
}
