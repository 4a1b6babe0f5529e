//! `topicwise sample`: Print the stratified excerpt of a document.

use std::path::Path;

use topicwise_engine::Sampler;

use super::{load_config, read_file};

pub fn run(config_path: Option<&Path>, file: &Path, max_chars: Option<usize>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let sampler = Sampler::new(max_chars.unwrap_or(config.sampler.max_chars));

    let content = read_file(file)?;
    let sampled = sampler.sample(&content);

    eprintln!(
        "{}: {} chars -> {} chars (budget {})",
        file.display(),
        content.chars().count(),
        sampled.chars().count(),
        sampler.max_chars()
    );
    print!("{sampled}");
    Ok(())
}
