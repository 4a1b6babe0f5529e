//! Subcommand implementations and the helpers they share.

pub mod coverage;
pub mod history;
pub mod init;
pub mod plan;
pub mod record;
pub mod sample;
pub mod status;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use topicwise_config::EngineConfig;
use topicwise_core::history::HistoryStore;
use topicwise_core::topic::{ExtractedTopic, Relevance, Topic};
use topicwise_engine::{deduplicate_topics, extract_heading_topics, parse_extraction_response};
use topicwise_history::{FileHistory, InMemoryHistory, NoopHistory, SqliteHistory};

/// `--config` when given, the default location otherwise.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(p) => EngineConfig::load_with_env(p),
        None => EngineConfig::load(),
    };
    config.context("Failed to load config")
}

/// Open the history backend named in the config.
pub async fn open_store(config: &EngineConfig) -> anyhow::Result<Arc<dyn HistoryStore>> {
    let path = config.history.resolved_path();
    let store: Arc<dyn HistoryStore> = match config.history.backend.as_str() {
        "sqlite" => {
            ensure_parent(&path)?;
            Arc::new(SqliteHistory::new(&path.to_string_lossy()).await?)
        }
        "file" => {
            ensure_parent(&path)?;
            Arc::new(FileHistory::new(path))
        }
        "memory" => Arc::new(InMemoryHistory::new()),
        "none" => Arc::new(NoopHistory),
        other => bail!("Unknown history backend \"{other}\""),
    };
    tracing::debug!(backend = store.name(), "History store opened");
    Ok(store)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

pub fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Topic vocabulary from a file, deduplicated.
///
/// `.md` files contribute their level 1 to 3 headings. Files starting with
/// JSON or a code fence are parsed as extractor output. Anything else is
/// one topic per line.
pub fn read_topics(path: &Path) -> anyhow::Result<Vec<Topic>> {
    let content = read_file(path)?;
    let markdown = path.extension().is_some_and(|e| e == "md");
    parse_topics(&content, markdown).with_context(|| format!("No topics in {}", path.display()))
}

fn parse_topics(content: &str, markdown: bool) -> anyhow::Result<Vec<Topic>> {
    let trimmed = content.trim_start();
    let topics: Vec<ExtractedTopic> = if markdown {
        extract_heading_topics(content, 1, 3)
            .into_iter()
            .map(|name| ExtractedTopic::new(name, Relevance::Medium))
            .collect()
    } else if trimmed.starts_with(['{', '[']) || trimmed.starts_with("```") {
        parse_extraction_response(content)?
    } else {
        read_lines(content)
            .into_iter()
            .map(|name| ExtractedTopic::new(name, Relevance::Medium))
            .collect()
    };

    let topics = deduplicate_topics(topics);
    if topics.is_empty() {
        bail!("topic list is empty");
    }
    Ok(topics.into_iter().map(|t| t.name).collect())
}

/// Non-blank lines, trimmed.
pub fn read_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_deduplicated() {
        let topics = parse_topics("Hepatite B\n\n  hepatite b \nCirrose\n", false).unwrap();
        assert_eq!(topics, vec!["Hepatite B", "Cirrose"]);
    }

    #[test]
    fn extractor_json_is_parsed() {
        let json = r#"{"topics":[{"name":"Asma","relevance":"high"},{"name":"DPOC"}]}"#;
        assert_eq!(parse_topics(json, false).unwrap(), vec!["Asma", "DPOC"]);
    }

    #[test]
    fn markdown_headings_are_topics() {
        let md = "# Fígado\ntext\n## Cirrose\n#### Ignored\n";
        assert_eq!(parse_topics(md, true).unwrap(), vec!["Fígado", "Cirrose"]);
    }

    #[test]
    fn empty_vocabulary_is_an_error() {
        assert!(parse_topics("\n  \n", false).is_err());
        assert!(parse_topics(r#"{"topics":[]}"#, false).is_err());
    }

    #[test]
    fn lines_are_trimmed() {
        assert_eq!(read_lines(" a \n\nb"), vec!["a", "b"]);
    }
}
