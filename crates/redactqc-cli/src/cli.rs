//! Argument parsing and command dispatch.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use redactqc_batch::BatchManager;
use redactqc_core::{Settings, Store};
use redactqc_server::AppState;

/// Cheap pre-scan of argv for `-v`/`--verbose`, done before `clap::Parser`
/// runs so the tracing subscriber can be initialized with the right default
/// filter ahead of full argument parsing.
pub fn is_verbose() -> bool {
    std::env::args().any(|a| a == "-v" || a == "--verbose")
}

#[derive(Parser)]
#[command(name = "redactqc", about = "PDF PII-detection QA tool", version)]
struct Cli {
    /// Override the data directory (default: $REDACTQC_DATA_DIR, then the
    /// platform data directory).
    #[arg(long, global = true, env = "REDACTQC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Verbose logging. Read by `is_verbose` before `clap` runs; kept here
    /// too so `--help`/`-v` validate normally.
    #[allow(dead_code)]
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the local dashboard HTTP API, bound to 127.0.0.1.
    Serve {
        /// TCP port to listen on.
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Scan a folder of PDFs for PII and exit once the batch completes.
    Scan {
        /// Folder to scan recursively for PDFs.
        source_path: String,
        /// Minimum confidence for a finding to be kept (default 0.4).
        #[arg(long)]
        confidence_threshold: Option<f64>,
        /// Worker process count (default: clamped to cpus-1).
        #[arg(long)]
        worker_count: Option<usize>,
    },
    /// Re-dispatch a batch's non-completed documents (e.g. after a crash).
    Resume {
        batch_id: String,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.data_dir {
        Some(dir) => Settings::with_data_dir(dir.clone()),
        None => Settings::default(),
    };
    settings.ensure_data_dir()?;

    let store = Arc::new(Store::open(&settings.database_path()).await?);

    match cli.command {
        Command::Serve { port } => serve(store, settings, port).await,
        Command::Scan {
            source_path,
            confidence_threshold,
            worker_count,
        } => scan(store, &source_path, confidence_threshold, worker_count).await,
        Command::Resume { batch_id } => resume(store, &batch_id).await,
    }
}

/// Start the dashboard API. Any batch left `pending`/`processing` by a
/// prior crash is re-dispatched before the listener comes up, matching
/// `Resume`'s "processing only non-completed documents" semantics.
async fn serve(store: Arc<Store>, settings: Settings, port: u16) -> anyhow::Result<()> {
    let reports_dir = settings.data_dir.join("reports");
    tokio::fs::create_dir_all(&reports_dir).await?;

    let state = AppState::new(store.clone(), reports_dir);

    for batch in store.list_batches().await? {
        if !batch.status.is_terminal() {
            tracing::info!(batch_id = %batch.id, status = batch.status.as_str(), "resuming batch left over from a prior run");
            if let Err(e) = state.batches.resume(&batch.id, None, None).await {
                tracing::warn!(batch_id = %batch.id, error = %e, "failed to resume batch at startup");
            }
        }
    }

    let app = redactqc_server::create_router(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "redactqc dashboard API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Run one scan to completion without starting the HTTP server, for
/// scripting/CI use. Prints the final `Batch` as JSON to stdout.
async fn scan(
    store: Arc<Store>,
    source_path: &str,
    confidence_threshold: Option<f64>,
    worker_count: Option<usize>,
) -> anyhow::Result<()> {
    let manager = BatchManager::new(store.clone());
    let batch = manager.start_scan(source_path, confidence_threshold, worker_count).await?;

    let final_batch = wait_for_completion(&store, &batch.id).await?;
    println!("{}", serde_json::to_string_pretty(&final_batch)?);
    Ok(())
}

async fn resume(store: Arc<Store>, batch_id: &str) -> anyhow::Result<()> {
    let manager = BatchManager::new(store.clone());
    manager.resume(batch_id, None, None).await?;

    let final_batch = wait_for_completion(&store, batch_id).await?;
    println!("{}", serde_json::to_string_pretty(&final_batch)?);
    Ok(())
}

async fn wait_for_completion(
    store: &Store,
    batch_id: &str,
) -> anyhow::Result<redactqc_core::models::Batch> {
    loop {
        let batch = store
            .get_batch(batch_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("batch {batch_id} vanished while waiting"))?;
        if batch.status.is_terminal() {
            return Ok(batch);
        }
        tokio::time::sleep(std::time::Duration::from_millis(250)).await;
    }
}
