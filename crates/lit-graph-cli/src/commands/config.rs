//! Config command implementation.

use anyhow::Result;

use crate::config::Config;

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    let layout = &config.layout;

    println!("lit-graph CLI Configuration");
    println!("{:-<40}", "");
    println!("Presets Directory:   {}", config.presets_dir.display());
    println!("Max Ticks:           {}", config.max_ticks);
    println!("Canvas:              {} x {}", layout.width, layout.height);
    println!("Node Radius:         {}", layout.node_radius);
    println!("Link Distance:       {}", layout.link_distance);
    println!("Charge Strength:     {}", layout.charge_strength);
    println!("Collision:           {}", layout.enable_collision);
    println!("Cluster By Type:     {}", layout.cluster_by_type);
    println!("Release Pin On Drop: {}", layout.release_pin_on_drag_end);

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value and persist it.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    config.set(key, value)?;
    config.save()?;
    println!("Set {} to: {}", key, value);
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    println!("{}", config.get(key)?);
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
