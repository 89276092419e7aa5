use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::info;

use crate::render::Render;

use super::Source;

/// Delete a booking. Without `--yes` only shows what would be deleted.
pub async fn run(source: &Source, id: u64, yes: bool) -> Result<()> {
    let client = source.client("delete")?;
    let record = client.get_schedule(id).await?;

    if !yes {
        println!("{} {}", "Would delete:".yellow(), record.render());
        anyhow::bail!("Pass --yes to delete schedule #{}", id);
    }

    client.delete_schedule(id).await?;
    info!(id, "deleted schedule");

    println!("{} {}", "✓ Deleted".green(), record.render());
    Ok(())
}
