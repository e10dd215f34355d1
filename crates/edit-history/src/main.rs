mod replay;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use edit_history_config::AppConfig;
use edit_history_core::{EditHistory, ManualClock, MemoryElement, MemorySelection};
use edit_history_mod_history::config::doc_id_for_path;
use edit_history_mod_history::{HistoryConfig, HistoryFile, HistoryStack, PersistenceLayer};

/// Replays a scripted editing session through the undo/redo history.
#[derive(Parser, Debug)]
#[command(name = "edit-history", version, about)]
struct Cli {
    /// JSON script of editing steps.
    script: PathBuf,

    /// Config file (defaults to `edit-history.json` next to the executable).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document ID used as the key in the history store.
    #[arg(long = "doc-id")]
    doc_id: Option<String>,

    /// Load and save history in the on-disk store.
    #[arg(long)]
    persist: bool,

    /// Prime the history from a JSON history file.
    #[arg(long)]
    history: Option<PathBuf>,

    /// Write the final history to a JSON history file.
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let app_config = AppConfig::load_or_create(&config_path);
    let history_config = HistoryConfig::from(&app_config);
    let persist = cli.persist || app_config.persist_history;
    let doc_id = cli
        .doc_id
        .clone()
        .unwrap_or_else(|| doc_id_for_path(&cli.script));

    tracing::info!(script = %cli.script.display(), %doc_id, persist, "Starting edit-history replay");

    let script = replay::Script::read(&cli.script)?;

    let store = if persist {
        Some(PersistenceLayer::open(&history_config.data_dir)?)
    } else {
        None
    };

    let stack = load_stack(
        cli.history.as_deref(),
        store.as_deref(),
        &doc_id,
        history_config.max_history_depth,
    )?;
    tracing::info!(entries = stack.len(), "history ready");

    let initial = script
        .initial
        .clone()
        .or_else(|| stack.current().map(|s| s.content.clone()))
        .unwrap_or_default();

    let clock = ManualClock::new();
    let mut history = EditHistory::with_clock(
        MemoryElement::with_caret_at_end(&initial),
        MemorySelection,
        &history_config,
        stack,
        clock.clone(),
    );
    history.subscribe(|event| match event.snapshot() {
        Some(snapshot) => tracing::info!(
            event = event.name(),
            start = ?snapshot.start,
            end = ?snapshot.end,
            "{:?}",
            snapshot.content
        ),
        None => tracing::debug!(event = event.name()),
    });

    replay::run(&mut history, &clock, &script.steps);
    history.unbind();

    println!("{}", history.contents());
    if let Some(sel) = history.element().selection() {
        println!("selection: {}..{}", sel.start, sel.end);
    }
    println!(
        "history: {} entries, cursor {:?}",
        history.history().len(),
        history.history().cursor()
    );

    save_stack(
        history.history(),
        store.as_deref(),
        &doc_id,
        cli.export.as_deref(),
    )
}

/// Picks the starting history: an explicit history file wins over the
/// store, and with neither the history starts empty.
fn load_stack(
    history_file: Option<&Path>,
    store: Option<&PersistenceLayer>,
    doc_id: &str,
    max_depth: usize,
) -> Result<HistoryStack> {
    if let Some(path) = history_file {
        let snapshots = HistoryFile::read(path)?.into_snapshots();
        return Ok(HistoryStack::from_snapshots(snapshots, max_depth));
    }
    let stored = match store {
        Some(pl) => pl
            .load_history(doc_id, max_depth)
            .context("Failed to load stored history")?,
        None => None,
    };
    Ok(stored.unwrap_or_else(|| HistoryStack::new(max_depth)))
}

/// Writes the final history to the store and/or the export file.
fn save_stack(
    stack: &HistoryStack,
    store: Option<&PersistenceLayer>,
    doc_id: &str,
    export: Option<&Path>,
) -> Result<()> {
    if let Some(pl) = store {
        pl.save_history(doc_id, stack)
            .context("Failed to save history")?;
    }
    if let Some(path) = export {
        HistoryFile::from_snapshots(stack.snapshots()).write(path)?;
        tracing::info!(path = %path.display(), "history exported");
    }
    Ok(())
}
