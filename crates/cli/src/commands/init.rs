//! `topicwise init`: Write the default configuration file.

use std::path::Path;

use anyhow::Context;
use topicwise_config::EngineConfig;

pub fn run(config_path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let default_path = EngineConfig::config_dir().join("config.toml");
    let path = config_path.unwrap_or(default_path.as_path());

    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        println!("   Run with --force to overwrite it.");
        return Ok(());
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    std::fs::write(path, EngineConfig::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote default config to {}", path.display());
    Ok(())
}
