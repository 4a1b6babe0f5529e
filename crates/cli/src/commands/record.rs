//! `topicwise record`: Store a generated batch as a new session.

use std::path::Path;

use anyhow::bail;
use topicwise_engine::BatchPlanner;

use super::{load_config, open_store, read_file, read_lines};

pub async fn run(
    config_path: Option<&Path>,
    scope: &str,
    items_file: &Path,
    session: Option<String>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let labels = read_lines(&read_file(items_file)?);
    if labels.is_empty() {
        bail!("No item labels in {}", items_file.display());
    }

    let store = open_store(&config).await?;
    let session_id = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let planner = BatchPlanner::from_config(store, &config);
    let written = planner.record(scope, &session_id, &labels).await?;

    println!("Recorded {written} items for \"{scope}\" in session {session_id}");
    Ok(())
}
