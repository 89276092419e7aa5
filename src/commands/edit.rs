use anyhow::Result;
use owo_colors::OwoColorize;
use roomsched_core::ScheduleDraft;
use tracing::info;

use crate::render::Render;

use super::{ensure_no_conflicts, ScheduleFields, Source};

/// Change any fields of an existing booking. The whole booking is sent back.
pub async fn run(source: &Source, id: u64, fields: ScheduleFields) -> Result<()> {
    let client = source.client("edit")?;

    if fields.is_empty() {
        anyhow::bail!("Nothing to change. Pass the fields to update, e.g. --title or --start");
    }

    let before = client.get_schedule(id).await?;
    let original = ScheduleDraft::from_record(&before)?;
    let mut draft = original.clone();
    fields.apply(&mut draft)?;

    if draft == original {
        println!("{} {}", "Unchanged:".dimmed(), before.render());
        return Ok(());
    }

    draft.validate()?;
    ensure_no_conflicts(client, &draft, Some(id)).await?;

    let updated = client.update_schedule(id, &draft).await?;
    info!(id, "updated schedule");

    println!("{} {}", "✓ Updated".green(), updated.render());
    Ok(())
}
