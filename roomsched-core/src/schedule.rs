//! Schedule records as returned by the room-scheduling API.
//!
//! Records are treated as an immutable snapshot: nothing in this crate
//! mutates them after deserialization.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RoomschedError;

/// A time of day at minute granularity.
///
/// Seconds are truncated on parse, so `09:00:59` and `09:00` are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(ClockTime(hour as u16 * 60 + minute as u16))
        } else {
            None
        }
    }

    /// Parse `HH:MM` or `HH:MM:SS`. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split(':');
        let hour = parse_component(parts.next()?)?;
        let minute = parse_component(parts.next()?)?;

        if let Some(seconds) = parts.next() {
            // Seconds only need to look like seconds; their value is dropped
            let seconds = seconds.split('.').next().unwrap_or(seconds);
            parse_component(seconds).filter(|s| *s < 60)?;
        }
        if parts.next().is_some() {
            return None;
        }

        ClockTime::new(hour, minute)
    }

    pub fn from_time(time: &impl Timelike) -> Self {
        ClockTime((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn hour(&self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.0 % 60) as u8
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.0
    }
}

fn parse_component(s: &str) -> Option<u8> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = RoomschedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClockTime::parse(s).ok_or_else(|| RoomschedError::InvalidTime(s.to_string()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = RoomschedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Lifecycle status of a booking.
///
/// Unknown wire values are kept as `Other` instead of failing the whole
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScheduleStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl ScheduleStatus {
    /// Statuses that can be sent back to the API.
    pub const KNOWN: [ScheduleStatus; 4] = [
        ScheduleStatus::Scheduled,
        ScheduleStatus::InProgress,
        ScheduleStatus::Completed,
        ScheduleStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ScheduleStatus::Scheduled => "scheduled",
            ScheduleStatus::InProgress => "in_progress",
            ScheduleStatus::Completed => "completed",
            ScheduleStatus::Cancelled => "cancelled",
            ScheduleStatus::Other(s) => s,
        }
    }

    /// Human label, e.g. "In Progress"
    pub fn label(&self) -> &str {
        match self {
            ScheduleStatus::Scheduled => "Scheduled",
            ScheduleStatus::InProgress => "In Progress",
            ScheduleStatus::Completed => "Completed",
            ScheduleStatus::Cancelled => "Cancelled",
            ScheduleStatus::Other(s) => s,
        }
    }

    /// Scheduled and in-progress bookings hold the room.
    pub fn is_active(&self) -> bool {
        matches!(self, ScheduleStatus::Scheduled | ScheduleStatus::InProgress)
    }

    /// Strict parse for user input: only the four known statuses are accepted.
    pub fn parse_known(s: &str) -> Result<Self, RoomschedError> {
        match ScheduleStatus::from(s.trim().to_string()) {
            ScheduleStatus::Other(_) => Err(RoomschedError::InvalidStatus(s.to_string())),
            status => Ok(status),
        }
    }
}

impl From<String> for ScheduleStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "scheduled" => ScheduleStatus::Scheduled,
            "in_progress" => ScheduleStatus::InProgress,
            "completed" => ScheduleStatus::Completed,
            "cancelled" => ScheduleStatus::Cancelled,
            _ => ScheduleStatus::Other(value),
        }
    }
}

impl From<ScheduleStatus> for String {
    fn from(value: ScheduleStatus) -> Self {
        match value {
            ScheduleStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display category used to color a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayCategory {
    Primary,
    Success,
    Neutral,
    Error,
}

/// Map a status onto its display category. Unknown statuses are `Neutral`.
pub fn status_category(status: &ScheduleStatus) -> DisplayCategory {
    match status {
        ScheduleStatus::Scheduled => DisplayCategory::Primary,
        ScheduleStatus::InProgress => DisplayCategory::Success,
        ScheduleStatus::Completed => DisplayCategory::Neutral,
        ScheduleStatus::Cancelled => DisplayCategory::Error,
        ScheduleStatus::Other(_) => DisplayCategory::Neutral,
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single room booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: u64,
    pub room_name: String,
    pub date: NaiveDate,
    /// Raw `HH:MM[:SS]` from the API; see [`ScheduleRecord::start`].
    /// Missing or null reads as empty, which never parses.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start_time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub end_time: String,
    pub title: String,
    #[serde(default)]
    pub instructor: Option<String>,
    pub status: ScheduleStatus,

    // Pass-through fields, never inspected by the projector
    #[serde(default)]
    pub room: Option<u64>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
}

impl ScheduleRecord {
    pub fn start(&self) -> Option<ClockTime> {
        ClockTime::parse(&self.start_time)
    }

    pub fn end(&self) -> Option<ClockTime> {
        ClockTime::parse(&self.end_time)
    }

    /// Instructor, treating the API's blank string as absent.
    pub fn instructor(&self) -> Option<&str> {
        self.instructor.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn category(&self) -> DisplayCategory {
        status_category(&self.status)
    }

    /// Half-open `start <= slot < end`. Malformed times never match.
    pub fn covers(&self, slot: ClockTime) -> bool {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => start <= slot && slot < end,
            _ => false,
        }
    }

    /// `HH:MM - HH:MM`, falling back to the raw strings when unparseable.
    pub fn time_range(&self) -> String {
        let start = self.start().map(|t| t.to_string()).unwrap_or_else(|| self.start_time.clone());
        let end = self.end().map(|t| t.to_string()).unwrap_or_else(|| self.end_time.clone());
        format!("{} - {}", start, end)
    }

    pub fn duration_minutes(&self) -> Option<i64> {
        let start = self.start()?;
        let end = self.end()?;
        Some(end.minutes_since_midnight() as i64 - start.minutes_since_midnight() as i64)
    }

    /// In progress right now. The end minute is inclusive here.
    pub fn is_current(&self, now: NaiveDateTime) -> bool {
        let now_time = ClockTime::from_time(&now.time());
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => {
                self.date == now.date()
                    && start <= now_time
                    && now_time <= end
                    && self.status == ScheduleStatus::InProgress
            }
            _ => false,
        }
    }

    /// Whether two active bookings hold the same room at the same time.
    pub fn overlaps(&self, other: &ScheduleRecord) -> bool {
        if self.room_name != other.room_name || self.date != other.date {
            return false;
        }
        if !self.status.is_active() || !other.status.is_active() {
            return false;
        }
        match (self.start(), self.end(), other.start(), other.end()) {
            (Some(a_start), Some(a_end), Some(b_start), Some(b_end)) => a_start < b_end && a_end > b_start,
            _ => false,
        }
    }
}

/// The writable fields of a booking, as sent to create or replace one.
///
/// Times are always well-formed here; `validate` checks their order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub room: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub course_code: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub status: ScheduleStatus,
}

impl ScheduleDraft {
    /// Editable copy of an existing booking. Fails when the record lacks a
    /// room id or has unreadable times, since the server would reject it.
    pub fn from_record(record: &ScheduleRecord) -> Result<Self, RoomschedError> {
        let room = record
            .room
            .ok_or_else(|| RoomschedError::InvalidSchedule(format!("booking #{} has no room id", record.id)))?;
        let start_time = record.start_time.parse::<ClockTime>()?;
        let end_time = record.end_time.parse::<ClockTime>()?;

        Ok(ScheduleDraft {
            room,
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
            instructor: record.instructor.clone().unwrap_or_default(),
            course_code: record.course_code.clone().unwrap_or_default(),
            date: record.date,
            start_time,
            end_time,
            status: record.status.clone(),
        })
    }

    /// Checks the server would otherwise refuse.
    pub fn validate(&self) -> Result<(), RoomschedError> {
        if self.title.trim().is_empty() {
            return Err(RoomschedError::InvalidSchedule("title must not be empty".into()));
        }
        if self.end_time <= self.start_time {
            return Err(RoomschedError::InvalidSchedule("end time must be after start time".into()));
        }
        if let ScheduleStatus::Other(s) = &self.status {
            return Err(RoomschedError::InvalidStatus(s.clone()));
        }
        Ok(())
    }

    /// Active bookings in `records` that would collide with this draft.
    /// `exclude` skips the booking being edited.
    pub fn conflicts<'a>(&self, records: &'a [ScheduleRecord], exclude: Option<u64>) -> Vec<&'a ScheduleRecord> {
        if !self.status.is_active() {
            return Vec::new();
        }
        records
            .iter()
            .filter(|r| Some(r.id) != exclude)
            .filter(|r| r.room == Some(self.room) && r.date == self.date && r.status.is_active())
            .filter(|r| match (r.start(), r.end()) {
                (Some(start), Some(end)) => self.start_time < end && self.end_time > start,
                _ => false,
            })
            .collect()
    }
}

impl fmt::Display for ScheduleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({} {})", self.title, self.room_name, self.date, self.time_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(start: &str, end: &str, status: &str) -> ScheduleRecord {
        serde_json::from_value(json!({
            "id": 1,
            "room_name": "A101",
            "date": "2024-06-03",
            "start_time": start,
            "end_time": end,
            "title": "Algebra",
            "status": status,
        }))
        .unwrap()
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    // --- ClockTime ---

    #[test]
    fn clock_time_truncates_seconds() {
        assert_eq!(ClockTime::parse("09:00:59"), ClockTime::parse("09:00"));
        assert_eq!(ClockTime::parse("09:00:00.000").unwrap().to_string(), "09:00");
    }

    #[test]
    fn clock_time_rejects_garbage() {
        assert_eq!(ClockTime::parse(""), None);
        assert_eq!(ClockTime::parse("nine"), None);
        assert_eq!(ClockTime::parse("24:00"), None);
        assert_eq!(ClockTime::parse("09:60"), None);
        assert_eq!(ClockTime::parse("09"), None);
        assert_eq!(ClockTime::parse("09:00:00:00"), None);
        assert_eq!(ClockTime::parse("-1:00"), None);
    }

    #[test]
    fn clock_time_orders_by_minutes() {
        let nine = ClockTime::parse("9:00").unwrap();
        let ten = ClockTime::parse("10:00").unwrap();
        assert!(nine < ten);
        assert_eq!(nine.to_string(), "09:00");
    }

    #[test]
    fn clock_time_from_str_reports_input() {
        let err = "25:00".parse::<ClockTime>().unwrap_err();
        assert!(err.to_string().contains("25:00"));
    }

    // --- ScheduleStatus ---

    #[test]
    fn status_unknown_wire_value_is_kept() {
        let r = record("09:00", "10:00", "postponed");
        assert_eq!(r.status, ScheduleStatus::Other("postponed".into()));
        assert_eq!(r.category(), DisplayCategory::Neutral);
    }

    #[test]
    fn status_category_mapping() {
        assert_eq!(status_category(&ScheduleStatus::Scheduled), DisplayCategory::Primary);
        assert_eq!(status_category(&ScheduleStatus::InProgress), DisplayCategory::Success);
        assert_eq!(status_category(&ScheduleStatus::Completed), DisplayCategory::Neutral);
        assert_eq!(status_category(&ScheduleStatus::Cancelled), DisplayCategory::Error);
    }

    #[test]
    fn status_parse_known_rejects_other() {
        assert_eq!(ScheduleStatus::parse_known("in_progress").unwrap(), ScheduleStatus::InProgress);
        assert!(ScheduleStatus::parse_known("done").is_err());
    }

    #[test]
    fn status_serializes_as_wire_string() {
        let value = serde_json::to_value(ScheduleStatus::InProgress).unwrap();
        assert_eq!(value, json!("in_progress"));
    }

    // --- ScheduleRecord ---

    #[test]
    fn covers_is_half_open() {
        let r = record("09:00", "10:00", "scheduled");
        assert!(r.covers(ClockTime::new(9, 0).unwrap()));
        assert!(r.covers(ClockTime::new(9, 59).unwrap()));
        assert!(!r.covers(ClockTime::new(10, 0).unwrap()));
        assert!(!r.covers(ClockTime::new(8, 59).unwrap()));
    }

    #[test]
    fn covers_never_matches_malformed_or_inverted_times() {
        let slot = ClockTime::new(9, 0).unwrap();
        assert!(!record("9am", "10:00", "scheduled").covers(slot));
        assert!(!record("10:00", "09:00", "scheduled").covers(slot));
        assert!(!record("09:00", "09:00", "scheduled").covers(slot));
    }

    #[test]
    fn missing_or_null_times_deserialize_as_unplaceable() {
        let slot = ClockTime::new(9, 0).unwrap();
        let null_start: ScheduleRecord = serde_json::from_value(json!({
            "id": 2, "room_name": "A101", "date": "2024-06-03",
            "start_time": null, "end_time": "10:00", "title": "Orphan", "status": "scheduled",
        }))
        .unwrap();
        assert_eq!(null_start.start(), None);
        assert!(!null_start.covers(slot));
        assert_eq!(null_start.time_range(), " - 10:00");

        let no_times: ScheduleRecord = serde_json::from_value(json!({
            "id": 3, "room_name": "A101", "date": "2024-06-03", "title": "Orphan", "status": "scheduled",
        }))
        .unwrap();
        assert_eq!((no_times.start(), no_times.end()), (None, None));
        assert_eq!(no_times.duration_minutes(), None);
    }

    // --- ScheduleDraft ---

    fn booked(id: u64, room: u64, start: &str, end: &str, status: &str) -> ScheduleRecord {
        serde_json::from_value(json!({
            "id": id, "room": room, "room_name": "A101", "date": "2024-06-03",
            "start_time": start, "end_time": end, "title": "Algebra", "status": status,
            "description": "Weekly", "instructor": "", "course_code": "MATH101",
        }))
        .unwrap()
    }

    #[test]
    fn draft_from_record_copies_writable_fields() {
        let draft = ScheduleDraft::from_record(&booked(7, 5, "09:00:00", "10:30:00", "scheduled")).unwrap();
        assert_eq!(draft.room, 5);
        assert_eq!(draft.start_time.to_string(), "09:00");
        assert_eq!(draft.end_time.to_string(), "10:30");
        assert_eq!(draft.description, "Weekly");
        assert_eq!(draft.course_code, "MATH101");
        assert_eq!(draft.status, ScheduleStatus::Scheduled);
    }

    #[test]
    fn draft_from_record_needs_room_and_times() {
        assert!(ScheduleDraft::from_record(&record("09:00", "10:00", "scheduled")).is_err());
        assert!(ScheduleDraft::from_record(&booked(7, 5, "soon", "10:00", "scheduled")).is_err());
    }

    #[test]
    fn draft_validation() {
        let mut draft = ScheduleDraft::from_record(&booked(7, 5, "09:00", "10:00", "scheduled")).unwrap();
        assert!(draft.validate().is_ok());

        draft.end_time = draft.start_time;
        assert!(matches!(draft.validate(), Err(RoomschedError::InvalidSchedule(_))));

        draft.end_time = ClockTime::new(11, 0).unwrap();
        draft.title = " ".into();
        assert!(draft.validate().is_err());

        draft.title = "Algebra".into();
        draft.status = ScheduleStatus::Other("postponed".into());
        assert!(matches!(draft.validate(), Err(RoomschedError::InvalidStatus(_))));
    }

    #[test]
    fn draft_serializes_wire_times() {
        let draft = ScheduleDraft::from_record(&booked(7, 5, "09:00:00", "10:00:00", "in_progress")).unwrap();
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["start_time"], json!("09:00"));
        assert_eq!(value["status"], json!("in_progress"));
        assert_eq!(value["room"], json!(5));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn draft_conflicts_follow_server_rules() {
        let records = vec![
            booked(1, 5, "09:00", "10:00", "scheduled"),
            booked(2, 5, "09:30", "11:00", "cancelled"),
            booked(3, 6, "09:00", "10:00", "scheduled"),
            booked(4, 5, "10:00", "11:00", "in_progress"),
        ];
        let mut draft = ScheduleDraft::from_record(&booked(9, 5, "09:30", "10:15", "scheduled")).unwrap();
        let ids: Vec<u64> = draft.conflicts(&records, None).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);

        let ids: Vec<u64> = draft.conflicts(&records, Some(1)).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4]);

        draft.status = ScheduleStatus::Cancelled;
        assert!(draft.conflicts(&records, None).is_empty());
    }

    #[test]
    fn blank_instructor_is_absent() {
        let mut r = record("09:00", "10:00", "scheduled");
        r.instructor = Some("  ".into());
        assert_eq!(r.instructor(), None);
        r.instructor = Some("Dr. Lee".into());
        assert_eq!(r.instructor(), Some("Dr. Lee"));
    }

    #[test]
    fn duration_in_minutes() {
        assert_eq!(record("09:00:00", "10:30:00", "scheduled").duration_minutes(), Some(90));
        assert_eq!(record("09:00", "oops", "scheduled").duration_minutes(), None);
    }

    #[test]
    fn is_current_requires_in_progress() {
        let r = record("09:00", "10:00", "in_progress");
        assert!(r.is_current(at("2024-06-03", "09:30")));
        assert!(r.is_current(at("2024-06-03", "10:00")));
        assert!(!r.is_current(at("2024-06-04", "09:30")));

        let scheduled = record("09:00", "10:00", "scheduled");
        assert!(!scheduled.is_current(at("2024-06-03", "09:30")));
    }

    #[test]
    fn overlaps_same_room_and_day_only() {
        let a = record("09:00", "10:00", "scheduled");
        let b = record("09:30", "10:30", "in_progress");
        assert!(a.overlaps(&b));

        let adjacent = record("10:00", "11:00", "scheduled");
        assert!(!a.overlaps(&adjacent));

        let mut other_room = b.clone();
        other_room.room_name = "B2".into();
        assert!(!a.overlaps(&other_room));

        let cancelled = record("09:30", "10:30", "cancelled");
        assert!(!a.overlaps(&cancelled));
    }

    #[test]
    fn ignores_unknown_wire_fields() {
        let r: ScheduleRecord = serde_json::from_value(json!({
            "id": 7,
            "room": 3,
            "room_name": "Lab 2",
            "room_number": "L2",
            "department_name": "Physics",
            "title": "Optics",
            "description": "",
            "instructor": "",
            "course_code": "PHY201",
            "date": "2024-06-04",
            "start_time": "13:00:00",
            "end_time": "15:00:00",
            "status": "completed",
            "is_current": false,
            "duration_minutes": 120,
            "created_by": null,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(r.room, Some(3));
        assert_eq!(r.course_code.as_deref(), Some("PHY201"));
        assert_eq!(r.time_range(), "13:00 - 15:00");
    }
}
