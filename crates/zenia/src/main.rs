// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zenia - a conversational agent with local semantic memory.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod shell;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use zenia_config::model::{DatasetKind, StorageBackend};
use zenia_config::{ConfigError, ZeniaConfig};
use zenia_memory::MemoryContext;

/// Zenia - a conversational agent with local semantic memory.
#[derive(Parser, Debug)]
#[command(name = "zenia", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Keep memory in-process only; nothing is written to disk.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive conversation (default).
    Shell,
    /// Answer a single question from memory.
    Ask {
        /// The question.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Join this many answers on a confident semantic match.
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Remember a question/answer pair.
    Remember { question: String, answer: String },
    /// Seed memory from a dataset document.
    Import(ImportArgs),
    /// Forget everything.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Print the number of stored memories.
    Count,
    /// Backfill missing embeddings and report the result.
    Repair,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Dataset layout: squad, coqa, quac, persona_chat or reddit.
    #[arg(value_parser = parse_dataset_kind, required_unless_present = "configured")]
    kind: Option<DatasetKind>,
    /// File path or http(s) URL of the JSON document.
    #[arg(required_unless_present = "configured")]
    location: Option<String>,
    /// Import every `[[datasets.sources]]` entry from the configuration.
    #[arg(long, conflicts_with_all = ["kind", "location"])]
    configured: bool,
}

fn parse_dataset_kind(value: &str) -> Result<DatasetKind, String> {
    DatasetKind::parse(value).ok_or_else(|| {
        let known: Vec<&str> = DatasetKind::ALL.iter().map(DatasetKind::as_str).collect();
        format!("unknown dataset `{value}`, expected one of: {}", known.join(", "))
    })
}

impl Commands {
    /// Commands that only count or delete do not need the model.
    fn needs_embeddings(&self) -> bool {
        !matches!(self, Commands::Count | Commands::Clear { .. })
    }

    /// Argument combinations clap cannot reject on its own.
    fn usage_error(&self) -> Option<&'static str> {
        match self {
            Commands::Clear { yes: false } => Some("clear deletes every memory; pass --yes to confirm"),
            Commands::Import(args)
                if !args.configured && (args.kind.is_none() || args.location.is_none()) =>
            {
                Some("import needs <KIND> <LOCATION> or --configured")
            }
            _ => None,
        }
    }
}

/// Exit status for invalid invocations, matching clap's own usage errors.
const USAGE_EXIT_CODE: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            zenia_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let command = cli.command.unwrap_or(Commands::Shell);
    if let Some(message) = command.usage_error() {
        eprintln!("{}: {message}", "usage".yellow());
        std::process::exit(USAGE_EXIT_CODE);
    }
    if cli.ephemeral {
        config.storage.backend = StorageBackend::Memory;
    }
    if !command.needs_embeddings() {
        config.memory.embeddings_enabled = false;
    }

    let ctx = MemoryContext::bootstrap(&config).await;

    let result = match command {
        Commands::Shell => shell::run_shell(&ctx, &config).await,
        Commands::Ask { query, top_k } => {
            commands::ask(&ctx, &config, &query.join(" "), top_k).await;
            Ok(())
        }
        Commands::Remember { question, answer } => {
            commands::remember(&ctx, &question, &answer).await
        }
        Commands::Import(args) => match (args.kind, args.location) {
            (Some(kind), Some(location)) if !args.configured => {
                commands::import(&ctx, kind, &location).await
            }
            _ => commands::import_configured(&ctx, &config).await,
        },
        Commands::Clear { .. } => commands::clear(&ctx).await,
        Commands::Count => commands::count(&ctx).await,
        Commands::Repair => {
            commands::repair(&ctx).await;
            Ok(())
        }
    };

    ctx.shutdown().await;

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<ZeniaConfig, Vec<ConfigError>> {
    match path {
        Some(path) => zenia_config::load_and_validate_path(path),
        None => zenia_config::load_and_validate(),
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("zenia={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
