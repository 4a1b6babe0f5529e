//! Topicwise CLI, the main entry point.
//!
//! Commands:
//! - `init`      Write the default config file
//! - `status`    Show effective configuration
//! - `sample`    Stratified excerpt of an oversized document
//! - `plan`      Quotas for the next batch of a scope
//! - `record`    Store a generated batch as a new session
//! - `coverage`  Source topics covered by generated items
//! - `history`   Inspect or clear the history of a scope

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "topicwise",
    about = "Topicwise: adaptive topic coverage for generated study material",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Config file (defaults to ~/.topicwise/config.toml)
    #[arg(short, long, global = true, env = "TOPICWISE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show effective configuration and history backend
    Status,

    /// Print the sampled excerpt of a document
    Sample {
        /// Document to sample
        file: PathBuf,

        /// Override the configured character budget
        #[arg(long)]
        max_chars: Option<usize>,
    },

    /// Plan the topic quotas of the next batch
    Plan {
        /// Project or document the batch belongs to
        #[arg(short, long)]
        scope: String,

        /// Topics: extractor JSON, Markdown headings, or one per line
        #[arg(short, long)]
        topics: PathBuf,

        /// Requested batch size
        #[arg(long)]
        total: Option<usize>,

        /// Print the full plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a generated batch as a new session
    Record {
        #[arg(short, long)]
        scope: String,

        /// Topic labels of the generated items, one per line
        #[arg(short, long)]
        items: PathBuf,

        /// Session id (random when omitted)
        #[arg(long)]
        session: Option<String>,
    },

    /// Compare source topics with the labels of generated items
    Coverage {
        /// Source topics: extractor JSON, Markdown headings, or one per line
        #[arg(long)]
        source: PathBuf,

        /// Generated item labels, one per line
        #[arg(long)]
        generated: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or clear the generation history of a scope
    History {
        #[arg(short, long)]
        scope: String,

        /// Delete every record of the scope
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output.
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Init { force } => commands::init::run(config_path, force)?,
        Commands::Status => commands::status::run(config_path).await?,
        Commands::Sample { file, max_chars } => {
            commands::sample::run(config_path, &file, max_chars)?
        }
        Commands::Plan {
            scope,
            topics,
            total,
            json,
        } => commands::plan::run(config_path, &scope, &topics, total, json).await?,
        Commands::Record {
            scope,
            items,
            session,
        } => commands::record::run(config_path, &scope, &items, session).await?,
        Commands::Coverage {
            source,
            generated,
            json,
        } => commands::coverage::run(config_path, &source, &generated, json)?,
        Commands::History { scope, clear } => {
            commands::history::run(config_path, &scope, clear).await?
        }
    }

    Ok(())
}
