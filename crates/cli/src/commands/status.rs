//! `topicwise status`: Show effective configuration.

use std::path::Path;

use topicwise_config::EngineConfig;

use super::{load_config, open_store};

pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    println!("Topicwise Status");
    println!("================");
    println!("  Config dir:     {}", EngineConfig::config_dir().display());
    println!("  Sample budget:  {} chars", config.sampler.max_chars);
    println!("  History:        {}", config.history.backend);
    if matches!(config.history.backend.as_str(), "sqlite" | "file") {
        println!("  History path:   {}", config.history.resolved_path().display());
    }
    println!(
        "  Lookback:       {} sessions (x{} records)",
        config.history.lookback_sessions, config.history.fetch_multiplier
    );
    println!(
        "  Batch size:     {}..={} items",
        config.allocation.min_items, config.allocation.max_items
    );
    println!("  Topics/session: {}", config.coverage.topics_per_session);

    let store = open_store(&config).await?;
    println!("\n  History store \"{}\" is reachable", store.name());

    let default_path = EngineConfig::config_dir().join("config.toml");
    if config_path.unwrap_or(default_path.as_path()).exists() {
        println!("  Config file found");
    } else {
        println!("  No config file; run `topicwise init` to create one");
    }

    Ok(())
}
