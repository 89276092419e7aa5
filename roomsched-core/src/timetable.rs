//! Timetable projection: schedule records onto a time-slot × day/room grid.
//!
//! Everything here is a pure function of its arguments. The caller owns the
//! view state (week, room filter, orientation) and passes it in on every
//! call; the grid holds references into the caller's records.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RoomschedError;
use crate::schedule::{ClockTime, ScheduleRecord};
use crate::week::{WeekWindow, compute_week_window};

/// Which records the timetable shows, by room.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoomFilter {
    #[default]
    All,
    Room(String),
}

impl RoomFilter {
    /// `"all"` (or nothing) means every room; anything else is a room name.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("all") => RoomFilter::All,
            Some(room) => RoomFilter::Room(room.to_string()),
        }
    }

    pub fn matches(&self, room_name: &str) -> bool {
        match self {
            RoomFilter::All => true,
            RoomFilter::Room(room) => room == room_name,
        }
    }
}

/// Column axis of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// One column per day of the week, at most one booking per cell
    #[default]
    Week,
    /// One column per room, every overlapping booking per cell
    Room,
}

impl FromStr for Orientation {
    type Err = RoomschedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Orientation::Week),
            "room" => Ok(Orientation::Room),
            _ => Err(RoomschedError::InvalidView(s.to_string())),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Week => f.write_str("week"),
            Orientation::Room => f.write_str("room"),
        }
    }
}

/// Hourly marks from 08:00 to 20:00.
pub fn default_time_slots() -> Vec<ClockTime> {
    (8..=20).filter_map(|hour| ClockTime::new(hour, 0)).collect()
}

/// Parse a comma-separated list of `HH:MM` slots, sorted and deduplicated.
pub fn parse_time_slots(s: &str) -> Result<Vec<ClockTime>, RoomschedError> {
    let slots: BTreeSet<ClockTime> = s
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse::<ClockTime>)
        .collect::<Result<_, _>>()?;

    if slots.is_empty() {
        return Err(RoomschedError::InvalidTime(s.to_string()));
    }
    Ok(slots.into_iter().collect())
}

/// Everything the projector needs besides the records.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewParameters {
    pub reference_date: NaiveDate,
    pub room_filter: RoomFilter,
    pub time_slots: Vec<ClockTime>,
    pub orientation: Orientation,
}

impl ViewParameters {
    pub fn new(reference_date: NaiveDate) -> Self {
        ViewParameters {
            reference_date,
            room_filter: RoomFilter::All,
            time_slots: default_time_slots(),
            orientation: Orientation::Week,
        }
    }
}

/// Records in `window` that pass `room_filter`, in input order.
pub fn filter_records<'a>(
    records: &'a [ScheduleRecord],
    window: &WeekWindow,
    room_filter: &RoomFilter,
) -> Vec<&'a ScheduleRecord> {
    records
        .iter()
        .filter(|r| window.contains(r.date) && room_filter.matches(&r.room_name))
        .collect()
}

/// Room names, deduplicated and sorted.
pub fn distinct_rooms<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a ScheduleRecord>,
{
    records
        .into_iter()
        .map(|r| r.room_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Week-view cell: the first record on `day` covering `slot`.
///
/// Later overlapping records are not reported.
pub fn first_in_slot<'a>(
    filtered: &[&'a ScheduleRecord],
    day: NaiveDate,
    slot: ClockTime,
) -> Option<&'a ScheduleRecord> {
    filtered.iter().copied().find(|r| r.date == day && r.covers(slot))
}

/// Room-view cell for a single day: every record in `room` on `day` covering `slot`.
pub fn all_in_slot<'a>(
    filtered: &[&'a ScheduleRecord],
    day: NaiveDate,
    slot: ClockTime,
    room: &str,
) -> Vec<&'a ScheduleRecord> {
    filtered
        .iter()
        .copied()
        .filter(|r| r.date == day && r.room_name == room && r.covers(slot))
        .collect()
}

/// A grid column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Day(NaiveDate),
    Room(String),
}

/// The projected grid. `cells[row][col]` lines up with `slots[row]` and
/// `columns[col]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAssignment<'a> {
    pub window: WeekWindow,
    pub orientation: Orientation,
    pub slots: Vec<ClockTime>,
    pub columns: Vec<Column>,
    pub cells: Vec<Vec<Vec<&'a ScheduleRecord>>>,
    /// Records that passed the week and room filter
    pub filtered: Vec<&'a ScheduleRecord>,
}

impl<'a> GridAssignment<'a> {
    pub fn cell(&self, row: usize, col: usize) -> &[&'a ScheduleRecord] {
        self.cells
            .get(row)
            .and_then(|cols| cols.get(col))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nothing in this week for this filter.
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// Filtered records that never made it into any cell, e.g. because their
    /// times are malformed or fall outside every slot, or (week-view) because
    /// an earlier record holds the same cell.
    pub fn unplaced(&self) -> Vec<&'a ScheduleRecord> {
        self.filtered
            .iter()
            .copied()
            .filter(|r| {
                !self
                    .cells
                    .iter()
                    .flatten()
                    .flatten()
                    .any(|placed| std::ptr::eq(*placed, *r))
            })
            .collect()
    }

    /// Week-view only: `(shown, hidden)` for every filtered record that
    /// covers a cell already held by an earlier one, whatever its room or
    /// status. Each pair is reported once.
    pub fn hidden_pairs(&self) -> Vec<(&'a ScheduleRecord, &'a ScheduleRecord)> {
        let mut pairs: Vec<(&'a ScheduleRecord, &'a ScheduleRecord)> = Vec::new();
        if self.orientation != Orientation::Week {
            return pairs;
        }

        for (row, slot) in self.slots.iter().enumerate() {
            for (col, column) in self.columns.iter().enumerate() {
                let Column::Day(day) = column else { continue };
                let Some(&shown) = self.cell(row, col).first() else { continue };

                for &other in &self.filtered {
                    let seen = pairs
                        .iter()
                        .any(|(a, b)| std::ptr::eq(*a, shown) && std::ptr::eq(*b, other));
                    if !std::ptr::eq(other, shown) && other.date == *day && other.covers(*slot) && !seen {
                        pairs.push((shown, other));
                    }
                }
            }
        }
        pairs
    }
}

/// Project `records` onto a grid for `params`.
pub fn project<'a>(records: &'a [ScheduleRecord], params: &ViewParameters) -> GridAssignment<'a> {
    let window = compute_week_window(params.reference_date);
    let filtered = filter_records(records, &window, &params.room_filter);

    let columns: Vec<Column> = match params.orientation {
        Orientation::Week => window.days().into_iter().map(Column::Day).collect(),
        // Every room keeps its column; the filter only empties the others
        Orientation::Room => distinct_rooms(records).into_iter().map(Column::Room).collect(),
    };

    let cells: Vec<Vec<Vec<&ScheduleRecord>>> = params
        .time_slots
        .iter()
        .map(|&slot| {
            columns
                .iter()
                .map(|column| match column {
                    Column::Day(day) => first_in_slot(&filtered, *day, slot).into_iter().collect(),
                    Column::Room(room) => window
                        .days()
                        .into_iter()
                        .flat_map(|day| all_in_slot(&filtered, day, slot, room))
                        .collect(),
                })
                .collect()
        })
        .collect();

    tracing::debug!(
        total = records.len(),
        in_view = filtered.len(),
        columns = columns.len(),
        slots = params.time_slots.len(),
        "projected timetable for {}",
        window.label()
    );

    GridAssignment {
        window,
        orientation: params.orientation,
        slots: params.time_slots.clone(),
        columns,
        cells,
        filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleStatus;

    fn date(s: &str) -> NaiveDate {
        crate::week::parse_date(s).unwrap()
    }

    fn slot(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn rec(id: u64, room: &str, day: &str, start: &str, end: &str) -> ScheduleRecord {
        ScheduleRecord {
            id,
            room_name: room.to_string(),
            date: date(day),
            start_time: start.to_string(),
            end_time: end.to_string(),
            title: format!("Class {id}"),
            instructor: None,
            status: ScheduleStatus::Scheduled,
            room: None,
            room_number: None,
            department_name: None,
            description: None,
            course_code: None,
        }
    }

    #[test]
    fn room_filter_from_arg() {
        assert_eq!(RoomFilter::from_arg(None), RoomFilter::All);
        assert_eq!(RoomFilter::from_arg(Some("all")), RoomFilter::All);
        assert_eq!(RoomFilter::from_arg(Some("A101")), RoomFilter::Room("A101".into()));
    }

    #[test]
    fn orientation_parse() {
        assert_eq!("Week".parse::<Orientation>().unwrap(), Orientation::Week);
        assert_eq!("room".parse::<Orientation>().unwrap(), Orientation::Room);
        assert!("month".parse::<Orientation>().is_err());
    }

    #[test]
    fn default_slots_are_hourly() {
        let slots = default_time_slots();
        assert_eq!(slots.len(), 13);
        assert_eq!(slots.first().unwrap().to_string(), "08:00");
        assert_eq!(slots.last().unwrap().to_string(), "20:00");
    }

    #[test]
    fn parse_slots_sorts_and_dedups() {
        let slots = parse_time_slots("10:00, 09:00,09:00,").unwrap();
        assert_eq!(slots, vec![slot("09:00"), slot("10:00")]);
        assert!(parse_time_slots("").is_err());
        assert!(parse_time_slots("09:00,noon").is_err());
    }

    #[test]
    fn filter_preserves_order_and_window() {
        let records = vec![
            rec(3, "B2", "2024-06-07", "09:00", "10:00"),
            rec(1, "A1", "2024-06-02", "09:00", "10:00"),
            rec(2, "A1", "2024-06-03", "09:00", "10:00"),
            rec(4, "A1", "2024-06-10", "09:00", "10:00"),
        ];
        let window = compute_week_window(date("2024-06-05"));

        let all: Vec<u64> = filter_records(&records, &window, &RoomFilter::All).iter().map(|r| r.id).collect();
        assert_eq!(all, vec![3, 2]);

        let a1 = filter_records(&records, &window, &RoomFilter::Room("A1".into()));
        assert_eq!(a1.len(), 1);
        assert_eq!(a1[0].id, 2);
    }

    #[test]
    fn distinct_rooms_sorted() {
        let records = vec![
            rec(1, "B2", "2024-06-03", "09:00", "10:00"),
            rec(2, "A1", "2024-06-03", "09:00", "10:00"),
            rec(3, "A1", "2024-06-04", "09:00", "10:00"),
        ];
        assert_eq!(distinct_rooms(&records), vec!["A1".to_string(), "B2".to_string()]);
        assert!(distinct_rooms(&Vec::<ScheduleRecord>::new()).is_empty());
    }

    #[test]
    fn first_in_slot_picks_input_order() {
        let records = vec![
            rec(1, "A1", "2024-06-03", "09:00", "10:00"),
            rec(2, "A1", "2024-06-03", "09:30", "10:30"),
        ];
        let filtered: Vec<&ScheduleRecord> = records.iter().collect();
        let monday = date("2024-06-03");

        assert_eq!(first_in_slot(&filtered, monday, slot("09:30")).map(|r| r.id), Some(1));
        assert_eq!(first_in_slot(&filtered, monday, slot("10:00")).map(|r| r.id), Some(2));
        assert_eq!(first_in_slot(&filtered, monday, slot("10:30")), None);
        assert_eq!(first_in_slot(&filtered, date("2024-06-04"), slot("09:30")), None);
    }

    #[test]
    fn all_in_slot_returns_every_overlap_in_room() {
        let records = vec![
            rec(1, "A1", "2024-06-03", "09:00", "10:00"),
            rec(2, "A1", "2024-06-03", "09:30", "10:30"),
            rec(3, "B2", "2024-06-03", "09:00", "11:00"),
        ];
        let filtered: Vec<&ScheduleRecord> = records.iter().collect();
        let ids: Vec<u64> = all_in_slot(&filtered, date("2024-06-03"), slot("09:30"), "A1")
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn week_grid_has_seven_day_columns() {
        let records = vec![rec(1, "A101", "2024-06-03", "09:00", "10:00")];
        let grid = project(&records, &ViewParameters::new(date("2024-06-05")));

        assert_eq!(grid.columns.len(), 7);
        assert_eq!(grid.columns[0], Column::Day(date("2024-06-03")));
        assert_eq!(grid.cells.len(), grid.slots.len());
        // 09:00 is row 1 of the default slots
        assert_eq!(grid.cell(1, 0).len(), 1);
        assert!(grid.cell(2, 0).is_empty());
        assert!(grid.cell(99, 99).is_empty());
    }

    #[test]
    fn room_grid_keeps_every_room_column() {
        let records = vec![
            rec(1, "B2", "2024-06-03", "09:00", "10:00"),
            rec(2, "A1", "2024-05-20", "09:00", "10:00"),
        ];
        let mut params = ViewParameters::new(date("2024-06-05"));
        params.orientation = Orientation::Room;

        let grid = project(&records, &params);
        assert_eq!(grid.columns, vec![Column::Room("A1".into()), Column::Room("B2".into())]);
        assert!(grid.cell(1, 0).is_empty());
        assert_eq!(grid.cell(1, 1).len(), 1);

        params.room_filter = RoomFilter::Room("A1".into());
        let grid = project(&records, &params);
        assert_eq!(grid.columns, vec![Column::Room("A1".into()), Column::Room("B2".into())]);
        assert!(grid.cells.iter().flatten().all(Vec::is_empty));
    }

    #[test]
    fn room_lane_spans_whole_week() {
        let records = vec![
            rec(1, "A1", "2024-06-04", "09:00", "10:00"),
            rec(2, "A1", "2024-06-03", "09:00", "10:00"),
        ];
        let mut params = ViewParameters::new(date("2024-06-05"));
        params.orientation = Orientation::Room;
        params.time_slots = vec![slot("09:00")];

        let grid = project(&records, &params);
        let ids: Vec<u64> = grid.cell(0, 0).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn unplaced_reports_hidden_and_malformed() {
        let records = vec![
            rec(1, "A1", "2024-06-03", "09:00", "10:00"),
            rec(2, "A1", "2024-06-03", "09:00", "10:00"),
            rec(3, "A1", "2024-06-04", "xx", "10:00"),
            rec(4, "A1", "2024-06-05", "11:00", "12:00"),
        ];
        let grid = project(&records, &ViewParameters::new(date("2024-06-05")));
        let ids: Vec<u64> = grid.unplaced().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn hidden_pairs_cover_every_collision_in_week_view() {
        let mut cancelled = rec(4, "A1", "2024-06-03", "09:00", "10:00");
        cancelled.status = ScheduleStatus::Cancelled;
        let records = vec![
            rec(1, "A1", "2024-06-03", "09:00", "11:00"),
            rec(2, "A1", "2024-06-03", "09:30", "10:30"),
            rec(3, "B2", "2024-06-03", "10:00", "11:00"),
            cancelled,
            rec(5, "A1", "2024-06-04", "09:00", "10:00"),
        ];
        let grid = project(&records, &ViewParameters::new(date("2024-06-05")));
        let pairs: Vec<(u64, u64)> = grid.hidden_pairs().iter().map(|(a, b)| (a.id, b.id)).collect();
        // 2 only covers 10:00 (its 09:30 start misses the 09:00 slot)
        assert_eq!(pairs, vec![(1, 4), (1, 2), (1, 3)]);

        let mut params = ViewParameters::new(date("2024-06-05"));
        params.orientation = Orientation::Room;
        assert!(project(&records, &params).hidden_pairs().is_empty());
    }
}
