//! `topicwise history`: Inspect or clear the generation history of a scope.

use std::path::Path;

use super::{load_config, open_store};

pub async fn run(config_path: Option<&Path>, scope: &str, clear: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config).await?;

    if clear {
        let removed = store.clear(scope).await?;
        println!("Removed {removed} records from \"{scope}\"");
    } else {
        let count = store.count(scope).await?;
        println!("\"{scope}\": {count} records in {} history", store.name());
    }
    Ok(())
}
