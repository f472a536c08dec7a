//! CLI for the listget batched downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use listget_core::config;
use listget_core::record::TextRecordStore;
use std::path::PathBuf;

use commands::{run_add, run_check, run_completions, run_downloads};

/// Top-level CLI for the listget batched downloader.
#[derive(Debug, Parser)]
#[command(name = "listget")]
#[command(about = "listget: batched downloader for flat record lists", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every record in the record file.
    Run {
        /// Record file (default: records.txt in the working directory, or
        /// the configured path).
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Directory downloads are written to (default: working directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Run up to N downloads concurrently per batch (default from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Add a record to the record file.
    Add {
        /// Human-readable label for the download.
        name: String,
        /// Output file name.
        filename: String,
        /// HTTP/HTTPS source URL.
        url: String,
        /// Optional destination URL overriding the output path.
        #[arg(long, value_name = "URL")]
        destination: Option<String>,
        /// Record file (default: records.txt, or the configured path).
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Parse the record file and list its records without downloading.
    Check {
        /// Record file (default: records.txt, or the configured path).
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        if let CliCommand::Completions { shell } = &cli.command {
            run_completions(*shell);
            return Ok(());
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run { file, dir, jobs } => {
                let store = record_store(&cfg, file)?;
                let download_dir = match dir {
                    Some(d) => d,
                    None => std::env::current_dir()?,
                };
                let batch_size = jobs.unwrap_or(cfg.concurrent_downloads);
                run_downloads(&store, &cfg, &download_dir, batch_size).await?;
            }
            CliCommand::Add {
                name,
                filename,
                url,
                destination,
                file,
            } => {
                let store = record_store(&cfg, file)?;
                run_add(&store, &name, &filename, &url, destination.as_deref())?;
            }
            CliCommand::Check { file } => {
                let store = record_store(&cfg, file)?;
                run_check(&store)?;
            }
            CliCommand::Completions { .. } => unreachable!("handled above"),
        }

        Ok(())
    }
}

/// Record store from the CLI override, the config, or the default
/// `records.txt` in the working directory, in that order.
fn record_store(
    cfg: &listget_core::config::ListgetConfig,
    file: Option<PathBuf>,
) -> Result<TextRecordStore> {
    if let Some(path) = file {
        return Ok(TextRecordStore::new(path));
    }
    if let Some(path) = &cfg.records_file {
        return Ok(TextRecordStore::new(path.clone()));
    }
    Ok(TextRecordStore::default_in(&std::env::current_dir()?))
}
