//! Rooms and their booking availability.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::schedule::{ClockTime, ScheduleRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomType {
    Classroom,
    Laboratory,
    Auditorium,
    Conference,
    Office,
    Other(String),
}

impl RoomType {
    pub fn as_str(&self) -> &str {
        match self {
            RoomType::Classroom => "classroom",
            RoomType::Laboratory => "laboratory",
            RoomType::Auditorium => "auditorium",
            RoomType::Conference => "conference",
            RoomType::Office => "office",
            RoomType::Other(s) => s,
        }
    }
}

impl From<String> for RoomType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "classroom" => RoomType::Classroom,
            "laboratory" => RoomType::Laboratory,
            "auditorium" => RoomType::Auditorium,
            "conference" => RoomType::Conference,
            "office" => RoomType::Office,
            _ => RoomType::Other(value),
        }
    }
}

impl From<RoomType> for String {
    fn from(value: RoomType) -> Self {
        match value {
            RoomType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable room as listed by the API. QR code data is not carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: u64,
    pub name: String,
    pub number: String,
    #[serde(default)]
    pub department_name: Option<String>,
    pub room_type: RoomType,
    pub capacity: u32,
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub building: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.number)
    }
}

/// Whether a room is free right now, and what holds it next.
#[derive(Debug, Clone, PartialEq)]
pub struct Availability<'a> {
    pub is_available: bool,
    pub current: Option<&'a ScheduleRecord>,
    pub next: Option<&'a ScheduleRecord>,
}

/// Availability of `room_name` at `now`, from a snapshot of records.
///
/// Only scheduled and in-progress bookings count. `current` covers `now`
/// half-open; `next` is the earliest active booking starting later today.
pub fn room_availability<'a>(
    records: &'a [ScheduleRecord],
    room_name: &str,
    now: NaiveDateTime,
) -> Availability<'a> {
    let now_time = ClockTime::from_time(&now.time());
    let today: Vec<&ScheduleRecord> = records
        .iter()
        .filter(|r| r.room_name == room_name && r.date == now.date() && r.status.is_active())
        .collect();

    let current = today.iter().copied().find(|r| r.covers(now_time));
    let next = today
        .iter()
        .copied()
        .filter(|r| r.start().is_some_and(|start| start > now_time))
        .min_by_key(|r| r.start());

    Availability {
        is_available: current.is_none(),
        current,
        next,
    }
}
