//! Show or write the effective configuration.

use posture_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    if write {
        let path = config.save()?;
        println!("Configuration written to: {}", path.display());
        return Ok(());
    }

    let path = config_file_path();
    let origin = if path.exists() { "file" } else { "defaults" };
    println!("# {} ({origin})", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
