use anyhow::Result;
use owo_colors::OwoColorize;
use roomsched_core::ScheduleStatus;
use tracing::info;

use crate::render::Render;

use super::Source;

/// Change a booking's status.
pub async fn run(source: &Source, id: u64, status: &str) -> Result<()> {
    let status = ScheduleStatus::parse_known(status)?;
    let client = source.client("status")?;

    let before = client.get_schedule(id).await?;
    if before.status == status {
        println!("{} {}", "Unchanged:".dimmed(), before.render());
        return Ok(());
    }

    let update = client.update_status(id, &status).await?;
    info!(id, from = %before.status, to = %status, "updated schedule status");

    println!("{} {}", "✓".green(), update.message);
    println!("  {}", update.schedule.render());
    Ok(())
}
