use anyhow::Result;
use owo_colors::OwoColorize;
use roomsched_core::ScheduleRecord;

use crate::client::ScheduleQuery;
use crate::render::Render;

use super::Source;

/// Full details of one booking (what a timetable cell opens).
pub async fn run(source: &Source, id: u64) -> Result<()> {
    let record = match source {
        Source::Api(client) => client.get_schedule(id).await?,
        Source::File(_) => source
            .schedules(&ScheduleQuery::default())
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| anyhow::anyhow!("Schedule #{} not found in snapshot", id))?,
    };

    println!("{}", render_details(&record));
    Ok(())
}

fn render_details(record: &ScheduleRecord) -> String {
    let mut lines = vec![
        format!("{} {}", record.title.bold(), format!("#{}", record.id).dimmed()),
        format!("  {:<11} {}", "Status", record.status.render()),
        format!("  {:<11} {}", "Room", room_label(record)),
        format!("  {:<11} {}", "Date", record.date.format("%A, %b %-d, %Y")),
        format!("  {:<11} {}", "Time", record.time_range()),
    ];

    if let Some(minutes) = record.duration_minutes() {
        lines.push(format!("  {:<11} {} min", "Duration", minutes));
    }
    if let Some(instructor) = record.instructor() {
        lines.push(format!("  {:<11} {}", "Instructor", instructor));
    }
    if let Some(code) = record.course_code.as_deref().filter(|c| !c.is_empty()) {
        lines.push(format!("  {:<11} {}", "Course", code));
    }
    if let Some(dept) = record.department_name.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("  {:<11} {}", "Department", dept));
    }
    if let Some(description) = record.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(String::new());
        lines.push(format!("  {}", description));
    }

    lines.join("\n")
}

fn room_label(record: &ScheduleRecord) -> String {
    match record.room_number.as_deref().filter(|n| !n.is_empty()) {
        Some(number) => format!("{} ({})", record.room_name, number),
        None => record.room_name.clone(),
    }
}
