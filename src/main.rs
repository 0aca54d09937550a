//! shardstore CLI - command line interface for shard_store
//!
//! Stores files or stdin as blobs and reads them back by id.

use anyhow::Context;
use clap::{Parser, Subcommand};
use shard_store::{Error, FileStore, Id, StoreConfig, UlidGenerator};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "shardstore")]
#[command(about = "An identifier-addressed blob store with sharded directories")]
#[command(version)]
struct Cli {
    /// Store root directory (overrides the config file)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Path to a JSON config file (default: ~/.config/shardstore/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of shard directory levels
    #[arg(long)]
    levels: Option<usize>,

    /// Digest used for shard names (md5 or blake3)
    #[arg(long)]
    digest: Option<String>,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a file (or stdin) as a new blob
    Put {
        /// File to store; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Write a blob to stdout or a file
    Get {
        /// The blob ID
        id: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a blob
    Rm {
        /// The blob ID
        id: String,
    },

    /// Show where a blob is stored
    Path {
        /// The blob ID
        id: String,
    },

    /// Show a blob's size
    Stat {
        /// The blob ID
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shard_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<Error>() {
            Some(Error::NotFound(msg)) => {
                output(
                    cli.format,
                    &serde_json::json!({
                        "status": "error",
                        "message": format!("Blob not found: {}", msg)
                    }),
                )?;
                std::process::exit(1);
            }
            _ => Err(err),
        },
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let store = open_store(cli)?;

    match &cli.command {
        Commands::Put { file } => {
            let id = match file {
                Some(path) => {
                    let source = File::open(path)
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    store.write(source)?
                }
                None => store.write(io::stdin().lock())?,
            };
            let size = store.size_of(&id)?;
            output(
                cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "id": id.to_string(),
                    "bytes": size
                }),
            )?;
        }

        Commands::Get { id, output: target } => {
            let id = Id::parse(id)?;
            match target {
                Some(path) => {
                    // Resolve first so a missing blob does not leave an empty file
                    let mut reader = store.read_channel(&id)?;
                    let mut sink = File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    let bytes = reader.copy_to(&mut sink)?;
                    output(
                        cli.format,
                        &serde_json::json!({
                            "status": "ok",
                            "id": id.to_string(),
                            "path": path.display().to_string(),
                            "bytes": bytes
                        }),
                    )?;
                }
                None => {
                    let stdout = io::stdout();
                    store.transfer_to(&id, stdout.lock())?;
                }
            }
        }

        Commands::Rm { id } => {
            let id = Id::parse(id)?;
            store.remove(&id)?;
            output(
                cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "id": id.to_string()
                }),
            )?;
        }

        Commands::Path { id } => {
            let id = Id::parse(id)?;
            output(
                cli.format,
                &serde_json::json!({
                    "id": id.to_string(),
                    "path": store.path_of(&id).display().to_string(),
                    "exists": store.contains(&id)
                }),
            )?;
        }

        Commands::Stat { id } => {
            let id = Id::parse(id)?;
            let size = store.size_of(&id)?;
            output(
                cli.format,
                &serde_json::json!({
                    "id": id.to_string(),
                    "path": store.path_of(&id).display().to_string(),
                    "bytes": size
                }),
            )?;
        }
    }

    Ok(())
}

/// Build the store config from the config file and command line flags
fn load_config(cli: &Cli) -> anyhow::Result<StoreConfig> {
    let from_file = match &cli.config {
        Some(path) => Some(StoreConfig::from_file(path)?),
        None => {
            let default = StoreConfig::default_path().ok().filter(|p| p.exists());
            match default {
                Some(path) => Some(StoreConfig::from_file(path)?),
                None => None,
            }
        }
    };

    let mut config = match (from_file, &cli.root) {
        (Some(mut config), Some(root)) => {
            config.root = root.clone();
            config
        }
        (Some(config), None) => config,
        (None, Some(root)) => StoreConfig::new(root),
        (None, None) => anyhow::bail!("No store root: pass --root or set one in the config file"),
    };

    if let Some(levels) = cli.levels {
        config.shard_levels = levels;
    }
    if let Some(digest) = &cli.digest {
        config.digest = digest.clone();
    }
    Ok(config)
}

fn open_store(cli: &Cli) -> anyhow::Result<FileStore> {
    let config = load_config(cli)?;
    let store = FileStore::open(&config, Arc::new(UlidGenerator::new()))?;
    Ok(store)
}

fn output(format: OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Json => writeln!(stdout, "{}", serde_json::to_string(value)?)?,
        OutputFormat::Text => writeln!(stdout, "{}", serde_json::to_string_pretty(value)?)?,
    }
    Ok(())
}
