//! `topicwise plan`: Topic quotas for the next batch of a scope.

use std::path::Path;

use topicwise_engine::{format_distribution, BatchPlanner};

use super::{load_config, open_store, read_topics};

pub async fn run(
    config_path: Option<&Path>,
    scope: &str,
    topics_file: &Path,
    total: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let topics = read_topics(topics_file)?;
    let store = open_store(&config).await?;

    let planner = BatchPlanner::from_config(store, &config);
    let plan = planner.plan(scope, &topics, total).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    eprintln!("{} items: {}", plan.total, plan.reason);
    if plan.is_cold_start() {
        eprintln!("No recent history for \"{scope}\"; splitting evenly");
    } else if !plan.uncovered.is_empty() {
        eprintln!(
            "{} of {} topics absent from the last {} sessions",
            plan.uncovered.len(),
            topics.len(),
            planner.lookback()
        );
    }
    println!("{}", format_distribution(&plan.quotas));
    Ok(())
}
