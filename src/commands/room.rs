use anyhow::Result;
use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;
use roomsched_core::room::room_availability;
use roomsched_core::{compute_week_window, ScheduleRecord};

use crate::render::{render_schedule_table, Render};

use super::Source;

/// One room's week, grouped by day, with its availability right now.
pub async fn run(source: &Source, room_id: u64, reference_date: NaiveDate) -> Result<()> {
    let client = source.client("room")?;
    let window = compute_week_window(reference_date);
    let schedule = client.room_schedule(room_id, window.monday(), window.sunday()).await?;

    let room = &schedule.room;
    println!("{} {}", format!("{} ({})", room.name, room.number).bold(), format!("#{}", room.id).dimmed());
    println!(
        "{}",
        format!("{} · {} · {} seats", room.department, room.room_type, room.capacity).dimmed()
    );
    println!();

    let records = schedule.records();
    let now = Local::now().naive_local();
    if window.contains(now.date()) {
        println!("{}", room_availability(&records, &room.name, now).render());
        println!();
    }

    println!(
        "{} {}",
        format!("Week of {}", schedule.start_date.format("%b %-d, %Y")).bold(),
        format!("(through {})", schedule.end_date.format("%a %b %-d")).dimmed()
    );
    let refs: Vec<&ScheduleRecord> = records.iter().collect();
    println!("{}", render_schedule_table(&refs));

    Ok(())
}
