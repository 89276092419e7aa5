use anyhow::Result;
use owo_colors::OwoColorize;
use roomsched_core::config::RoomschedConfig;

/// Write a commented default config unless one already exists.
pub fn run(force: bool) -> Result<()> {
    let path = RoomschedConfig::config_path()?;

    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}\n\
            Pass --force to overwrite it.",
            path.display()
        );
    }

    RoomschedConfig::create_default_config(&path)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}
