//! Preset command implementation.

use std::time::SystemTime;

use anyhow::Result;
use lit_graph_filter::{FilterPreset, KeyValueStore, PresetManager};

use super::preset_manager;
use crate::config::Config;

/// Find a preset by id, falling back to name.
pub fn resolve<S: KeyValueStore>(
    presets: &PresetManager<S>,
    name_or_id: &str,
) -> Result<FilterPreset> {
    if let Some(preset) = presets.get_preset(name_or_id)? {
        return Ok(preset);
    }
    presets
        .find_by_name(name_or_id)?
        .ok_or_else(|| anyhow::anyhow!("No filter preset named {name_or_id}"))
}

fn age(time: SystemTime) -> String {
    match SystemTime::now().duration_since(time) {
        Ok(elapsed) if elapsed.as_secs() < 60 => "just now".to_string(),
        Ok(elapsed) if elapsed.as_secs() < 3_600 => format!("{}m ago", elapsed.as_secs() / 60),
        Ok(elapsed) if elapsed.as_secs() < 86_400 => format!("{}h ago", elapsed.as_secs() / 3_600),
        Ok(elapsed) => format!("{}d ago", elapsed.as_secs() / 86_400),
        Err(_) => "in the future".to_string(),
    }
}

/// List saved presets.
pub fn list(config: &Config) -> Result<()> {
    let presets = preset_manager(config).load_presets()?;
    if presets.is_empty() {
        println!("No saved presets in {}", config.presets_dir.display());
        return Ok(());
    }

    println!("🗂️  Filter presets ({})", presets.len());
    println!("{:─<50}", "");
    for preset in &presets {
        let last_used = preset.last_used.map(age).unwrap_or_else(|| "never".to_string());
        println!(
            "{:<24} {:>2} criteria  created {:<10} used {}",
            preset.name,
            preset.criteria.len(),
            age(preset.created_at),
            last_used
        );
        if !preset.description.is_empty() {
            println!("   {}", preset.description);
        }
    }
    Ok(())
}

/// Print a preset as JSON.
pub fn show(config: &Config, name_or_id: &str) -> Result<()> {
    let preset = resolve(&preset_manager(config), name_or_id)?;
    println!("{}", serde_json::to_string_pretty(&preset)?);
    Ok(())
}

/// Delete a preset.
pub fn delete(config: &Config, name_or_id: &str) -> Result<()> {
    let mut presets = preset_manager(config);
    let preset = resolve(&presets, name_or_id)?;
    presets.delete_preset(&preset.id)?;
    println!("🗑️  Deleted preset {}", preset.name);
    Ok(())
}
