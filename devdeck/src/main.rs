//! devdeck: a deck of small developer utilities in the terminal.

mod analytics;
mod app;
mod field;
mod pages;
mod ui;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use viewdeck::{Application, Store};

use crate::app::Root;

/// A deck of small developer utilities: timestamps, base64, HMAC, JSON,
/// diffs, ObjectIds, URLs, text stats, UUIDs, a calculator and JWTs.
#[derive(Debug, Parser)]
#[command(name = "devdeck", version, about)]
struct Args {
    /// Fragment to open at startup, e.g. "/jwt" or "/millis".
    #[arg(short, long, value_name = "FRAGMENT")]
    open: Option<String>,

    /// Path of the state store file (defaults to the platform data dir).
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Keep field state in memory only; nothing is written to disk.
    #[arg(long)]
    ephemeral: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let data_dir = data_dir()?;
    let _log_guard = init_tracing(&data_dir)?;

    let store = if args.ephemeral {
        Store::in_memory()
    } else {
        Store::open(args.store.unwrap_or_else(|| data_dir.join("state.json")))?
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting devdeck");
    Application::new().run(move |cx| Root::new(store, args.open, cx))
}

fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("no platform data directory")?
        .join("devdeck");
    fs::create_dir_all(&dir).with_context(|| format!("could not create {}", dir.display()))?;
    Ok(dir)
}

fn init_tracing(dir: &Path) -> anyhow::Result<WorkerGuard> {
    // Stdout belongs to the TUI; logs and page-view events go to a file.
    let appender = tracing_appender::rolling::never(dir, "devdeck.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
