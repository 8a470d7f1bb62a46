//! CLI administration tool for links-checker.
//!
//! Reads the batch store directly, so it works while the server is stopped
//! and without HTTP access.
//!
//! # Usage
//!
//! ```bash
//! # List all batches
//! cargo run --bin admin -- batches list
//!
//! # Show one batch with per-link results
//! cargo run --bin admin -- batches show 3
//!
//! # Render a report for several batches
//! cargo run --bin admin -- report 1 2 3 --output report.txt
//!
//! # Validate the store file
//! cargo run --bin admin -- store check
//! ```
//!
//! # Environment Variables
//!
//! - `STATE_PATH` (optional): batch store file, overridden by `--state`

use links_checker::application::services::ReportService;
use links_checker::domain::entities::{BatchId, BatchStatus, LinkBatch, LinkStatus};
use links_checker::domain::repositories::BatchRepository;
use links_checker::infrastructure::persistence::FileBatchRepository;
use links_checker::infrastructure::report::TextReportGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for inspecting the links-checker batch store.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Batch store file
    #[arg(long, env = "STATE_PATH", default_value = "data/state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect stored batches
    Batches {
        #[command(subcommand)]
        action: BatchesAction,
    },

    /// Render a text report for one or more batches
    Report {
        /// Batch IDs, in report order
        #[arg(required = true)]
        ids: Vec<BatchId>,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store file operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum BatchesAction {
    /// List all batches
    List,

    /// Show one batch
    Show {
        /// Batch ID
        id: BatchId,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Load the store and summarize its contents
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let repo = Arc::new(
        FileBatchRepository::open(&cli.state)
            .await
            .with_context(|| format!("Failed to load batch store {}", cli.state.display()))?,
    );

    match cli.command {
        Commands::Batches { action } => handle_batches_action(action, &repo).await?,
        Commands::Report { ids, output } => handle_report(repo, &ids, output).await?,
        Commands::Store { action } => handle_store_action(action, &repo).await?,
    }

    Ok(())
}

async fn handle_batches_action(action: BatchesAction, repo: &FileBatchRepository) -> Result<()> {
    match action {
        BatchesAction::List => list_batches(repo).await,
        BatchesAction::Show { id } => show_batch(repo, id).await,
    }
}

/// Lists all batches in ID order.
///
/// # Output Format
///
/// ```text
/// 📋 Batches
///
///   ID    Status       Links  Pending  Updated
///   ─────────────────────────────────────────────────────
///   1     done         3      0        2025-12-10 11:59
///   2     failed       5      2        2025-12-10 12:04
/// ```
async fn list_batches(repo: &FileBatchRepository) -> Result<()> {
    println!("{}", "📋 Batches".bright_blue().bold());
    println!();

    let batches = repo.list_batches().await?;

    if batches.is_empty() {
        println!("{}", "  No batches found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<5} {:<12} {:<6} {:<8} {}",
        "ID".bright_white().bold(),
        "Status".bright_white().bold(),
        "Links".bright_white().bold(),
        "Pending".bright_white().bold(),
        "Updated".bright_white().bold()
    );
    println!("  {}", "─".repeat(55).bright_black());

    for batch in &batches {
        println!(
            "  {:<5} {:<12} {:<6} {:<8} {}",
            batch.id().to_string().bright_black(),
            colored_status(batch.status()),
            batch.links().len(),
            batch.pending_count(),
            batch
                .updated_at()
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        batches.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_batch(repo: &FileBatchRepository, id: BatchId) -> Result<()> {
    let batch = repo.get_batch(id).await?;

    println!(
        "{}",
        format!("🔎 Batch {}", batch.id()).bright_blue().bold()
    );
    println!();
    println!("  Status:  {}", colored_status(batch.status()));
    println!("  Created: {}", batch.created_at().to_rfc3339().bright_black());
    println!("  Updated: {}", batch.updated_at().to_rfc3339().bright_black());
    println!();

    for result in batch.results() {
        let status = match result.status {
            LinkStatus::Available => "available".green(),
            LinkStatus::Unavailable => "unavailable".red(),
            LinkStatus::Unknown => "unknown".yellow(),
        };
        match &result.error {
            Some(error) => println!(
                "  {:<12} {}  {}",
                status,
                result.link.url.cyan(),
                error.bright_black()
            ),
            None => println!("  {:<12} {}", status, result.link.url.cyan()),
        }
    }
    println!();

    Ok(())
}

/// Renders a report with the same generator the server uses.
async fn handle_report(
    repo: Arc<FileBatchRepository>,
    ids: &[BatchId],
    output: Option<PathBuf>,
) -> Result<()> {
    let service = ReportService::new(repo, Arc::new(TextReportGenerator::default()));
    let report = service.generate_report_for_batches(ids).await?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &report.bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} {}",
                "✅ Report written to".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", String::from_utf8_lossy(&report.bytes)),
    }

    Ok(())
}

/// Handles store diagnostic commands.
///
/// Opening the store already validates the file; a corrupt store fails
/// before this runs.
async fn handle_store_action(action: StoreAction, repo: &FileBatchRepository) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!("{}", "🔍 Checking batch store...".bright_blue());
            println!();

            let batches = repo.list_batches().await?;
            let count = |status: BatchStatus| batches.iter().filter(|b| b.status() == status).count();
            let unfinished: Vec<&LinkBatch> =
                batches.iter().filter(|b| !b.status().is_terminal()).collect();

            println!("  File:        {}", repo.path().display().to_string().bright_white());
            println!("  Batches:     {}", batches.len().to_string().bright_green().bold());
            println!("  Created:     {}", count(BatchStatus::Created));
            println!("  In progress: {}", count(BatchStatus::InProgress));
            println!("  Done:        {}", count(BatchStatus::Done));
            println!("  Failed:      {}", count(BatchStatus::Failed));
            println!();

            if !unfinished.is_empty() {
                let ids: Vec<String> = unfinished.iter().map(|b| b.id().to_string()).collect();
                println!(
                    "{} {}",
                    "⚠️  Unfinished batches:".yellow(),
                    ids.join(", ")
                );
            }

            println!("{}", "✅ Batch store OK".green().bold());
        }
    }

    Ok(())
}

fn colored_status(status: BatchStatus) -> ColoredString {
    match status {
        BatchStatus::Created => status.as_str().bright_black(),
        BatchStatus::InProgress => status.as_str().yellow(),
        BatchStatus::Done => status.as_str().green(),
        BatchStatus::Failed => status.as_str().red(),
    }
}
