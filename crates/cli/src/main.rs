// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! moonbox - drive the event dispatch engine from a script

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod output;
mod script;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use commands::run;
use moonbox_core::EngineConfig;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "moonbox",
    version,
    about = "Moonbox - scripted event dispatch with timers"
)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script and print matching events
    Run(run::RunArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let log_file = cli.log_file.as_deref().or(config.log_file.as_deref());
    let _log_guard = setup_logging(log_file)?;

    match cli.command {
        Commands::Run(args) => {
            let summary = run::handle(args, config)?;
            tracing::info!(?summary, "done");
        }
    }

    Ok(())
}

/// Install the tracing subscriber; `RUST_LOG` overrides the `warn` default
///
/// The returned guard must stay alive until exit so buffered file output
/// is flushed.
fn setup_logging(
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let name = path
        .file_name()
        .with_context(|| format!("invalid log file path {}", path.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(Some(guard))
}
