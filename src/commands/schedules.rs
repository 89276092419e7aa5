use anyhow::Result;
use owo_colors::OwoColorize;
use roomsched_core::ScheduleRecord;

use crate::client::ScheduleQuery;
use crate::render::{pluralize, render_schedule_table};

use super::Source;

pub async fn run(source: &Source, query: ScheduleQuery) -> Result<()> {
    let mut records = source.schedules(&query).await?;
    records.sort_by_key(|r| (r.date, r.start(), r.id));

    let refs: Vec<&ScheduleRecord> = records.iter().collect();
    println!("{}", render_schedule_table(&refs));

    if !records.is_empty() {
        println!();
        println!("{}", format!("{} {}", records.len(), pluralize("schedule", records.len())).dimmed());
    }

    Ok(())
}
