use anyhow::Result;
use owo_colors::OwoColorize;
use roomsched_core::timetable::distinct_rooms;

use crate::client::{ScheduleQuery, RoomQuery};
use crate::render::{pluralize, Render};

use super::Source;

/// List rooms from the API, or the distinct room names of a snapshot.
pub async fn run(source: &Source, query: RoomQuery) -> Result<()> {
    match source {
        Source::Api(client) => {
            let rooms = client.list_rooms(&query).await?;
            if rooms.is_empty() {
                println!("{}", "No rooms found".dimmed());
                return Ok(());
            }
            for room in &rooms {
                println!("{}", room.render());
            }
            println!();
            println!("{}", format!("{} {}", rooms.len(), pluralize("room", rooms.len())).dimmed());
        }
        Source::File(_) => {
            ensure_snapshot_filters(&query)?;
            let records = source.schedules(&ScheduleQuery::default()).await?;
            let names: Vec<String> = distinct_rooms(&records)
                .into_iter()
                .filter(|name| {
                    query
                        .search
                        .as_deref()
                        .is_none_or(|s| name.to_lowercase().contains(&s.to_lowercase()))
                })
                .collect();

            if names.is_empty() {
                println!("{}", "No rooms found".dimmed());
                return Ok(());
            }
            for name in &names {
                println!("{}", name.bold());
            }
        }
    }

    Ok(())
}

/// A snapshot only knows room names, so only `--search` can apply.
fn ensure_snapshot_filters(query: &RoomQuery) -> Result<()> {
    if query.room_type.is_some() || query.department.is_some() {
        anyhow::bail!("--type and --department need the scheduling API and cannot be used with --file");
    }
    Ok(())
}
