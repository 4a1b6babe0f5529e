//! `topicwise coverage`: Source topics covered by generated items.

use std::path::Path;

use topicwise_engine::{tally_topics, CoverageAnalyzer};

use super::{load_config, read_file, read_lines, read_topics};

pub fn run(
    config_path: Option<&Path>,
    source_file: &Path,
    generated_file: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let source = read_topics(source_file)?;
    let generated = read_lines(&read_file(generated_file)?);

    let report = CoverageAnalyzer::default().analyze(&source, &generated);
    let remaining = report.estimate_remaining_sessions(config.coverage.topics_per_session);

    if json {
        let out = serde_json::json!({
            "covered": report.covered,
            "uncovered": report.uncovered,
            "coverage_ratio": report.coverage_ratio,
            "sessions_to_full_coverage": remaining,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Coverage Report");
    println!("===============");
    match report.coverage_ratio {
        Some(ratio) => println!(
            "  Covered:   {}/{} ({:.1}%)",
            report.covered.len(),
            report.source_count(),
            ratio * 100.0
        ),
        None => println!("  Covered:   no source topics"),
    }
    for topic in &report.uncovered {
        println!("  - missing: {topic}");
    }
    println!("  Sessions to full coverage: {remaining}");

    let tally = tally_topics(&generated, &config.history.fallback_topic);
    if !tally.is_empty() {
        println!("\n  Items per label:");
        for (label, count) in tally {
            println!("    {count:>3}  {label}");
        }
    }
    Ok(())
}
