use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::info;

use crate::render::Render;

use super::{ensure_no_conflicts, ScheduleFields, Source};

/// Book a room.
pub async fn run(source: &Source, fields: ScheduleFields) -> Result<()> {
    let client = source.client("create")?;

    let draft = fields.into_draft()?;
    draft.validate()?;
    ensure_no_conflicts(client, &draft, None).await?;

    let created = client.create_schedule(&draft).await?;
    info!(room = created.room, date = %created.date, title = %created.title, "created schedule");

    println!("{} {}", "✓ Created".green(), created.render());
    Ok(())
}
