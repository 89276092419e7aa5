use anyhow::Result;
use owo_colors::OwoColorize;
use roomsched_core::ScheduleRecord;

use crate::client::ScheduleQuery;
use crate::render::render_schedule_table;

use super::{today, Source};

/// Today's scheduled and in-progress bookings across all rooms.
pub async fn run(source: &Source) -> Result<()> {
    let (date, mut records) = match source {
        Source::Api(client) => {
            let today = client.today().await?;
            (today.date, today.schedules)
        }
        Source::File(_) => {
            let date = today();
            let query = ScheduleQuery {
                date: Some(date),
                ..Default::default()
            };
            (date, source.schedules(&query).await?)
        }
    };

    records.retain(|r| r.status.is_active());
    records.sort_by_key(|r| (r.start(), r.id));

    println!("{}", format!("Today's Schedule ({})", date.format("%B %-d, %Y")).bold());
    println!();

    if records.is_empty() {
        println!("{}", "No schedules for today.".dimmed());
        return Ok(());
    }

    let refs: Vec<&ScheduleRecord> = records.iter().collect();
    println!("{}", render_schedule_table(&refs));
    Ok(())
}
