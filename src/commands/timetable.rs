use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use roomsched_core::timetable::{distinct_rooms, parse_time_slots};
use roomsched_core::week::parse_date;
use roomsched_core::{
    ClockTime, GridAssignment, Orientation, RoomFilter, ScheduleRecord, ViewParameters, WeekShift, project,
    shift_week,
};
use tracing::warn;

use crate::client::ScheduleQuery;
use crate::render::{pluralize, render_grid, render_legend, render_schedule_table, Render};

use super::Source;

pub struct TimetableArgs {
    pub date: Option<String>,
    pub shift: Option<WeekShift>,
    pub room: Option<String>,
    pub view: Option<Orientation>,
    pub slots: Option<String>,
    pub list: bool,
}

/// Resolve command-line arguments into view parameters.
pub fn view_parameters(
    args: &TimetableArgs,
    default_view: Orientation,
    default_slots: &[ClockTime],
    today: NaiveDate,
) -> Result<ViewParameters> {
    let reference = match args.date.as_deref() {
        Some(date) => parse_date(date)?,
        None => today,
    };
    let reference_date = match args.shift {
        Some(shift) => shift_week(reference, shift, today),
        None => reference,
    };

    let time_slots = match &args.slots {
        Some(slots) => parse_time_slots(slots)?,
        None => default_slots.to_vec(),
    };

    Ok(ViewParameters {
        reference_date,
        room_filter: RoomFilter::from_arg(args.room.as_deref()),
        time_slots,
        orientation: args.view.unwrap_or(default_view),
    })
}

pub async fn run(source: &Source, params: ViewParameters, list: bool) -> Result<()> {
    let records = source.schedules(&ScheduleQuery::default()).await?;
    let grid = project(&records, &params);

    if let RoomFilter::Room(room) = &params.room_filter {
        let known = distinct_rooms(&records);
        if !known.contains(room) {
            warn!(room = %room, "no bookings for this room in the snapshot");
            println!("{} Known rooms: {}", format!("Unknown room '{}'.", room).yellow(), known.join(", "));
        }
    }

    println!("{}", grid.window.label().bold());
    println!();
    println!("{}", render_grid(&grid));
    println!();
    println!("{}", render_legend());

    if grid.is_empty() {
        println!();
        println!("{}", "No schedules found for the selected week and room filter.".dimmed());
        return Ok(());
    }

    report_hidden(&grid);

    if list {
        let mut in_view: Vec<&ScheduleRecord> = grid.filtered.clone();
        in_view.sort_by_key(|r| (r.date, r.start(), r.id));
        println!();
        println!("{}", render_schedule_table(&in_view));
    }

    Ok(())
}

/// Tell the user about bookings the grid could not show.
fn report_hidden(grid: &GridAssignment<'_>) {
    let unplaced = grid.unplaced();
    for record in &unplaced {
        if record.start().is_none() || record.end().is_none() {
            warn!(id = record.id, start = %record.start_time, end = %record.end_time, "booking has unreadable times");
        }
    }

    if let Some(lines) = hidden_lines(grid) {
        println!();
        for line in lines {
            println!("{}", line);
        }
    }

    if !unplaced.is_empty() {
        println!();
        println!(
            "{}",
            format!(
                "{} {} in this week not shown on the grid (use --list to see all)",
                unplaced.len(),
                pluralize("booking", unplaced.len())
            )
            .dimmed()
        );
    }
}

/// Week view keeps one booking per cell; list what each shown booking hides.
fn hidden_lines(grid: &GridAssignment<'_>) -> Option<Vec<String>> {
    let pairs = grid.hidden_pairs();
    if pairs.is_empty() {
        return None;
    }

    let mut lines = vec![format!(
        "{} {} hidden behind an earlier booking in week view (use --view room to see them side by side):",
        pairs.len(),
        pluralize("cell overlap", pairs.len())
    )
    .yellow()
    .to_string()];
    for (shown, hidden) in pairs {
        let clash = if shown.overlaps(hidden) { " (double booking)" } else { "" };
        lines.push(format!("  {} hides {}{}", shown.render(), hidden.render(), clash.red()));
    }
    Some(lines)
}
