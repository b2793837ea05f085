// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run command: replay a script through the dispatcher and print matches

use crate::output::Printers;
use crate::script::{tokenize, ScriptOrigin, ScriptSource};
use anyhow::{Context as _, Result};
use moonbox_core::{
    Context, Dispatcher, EngineConfig, Filter, RunSummary, Runner, SystemClock,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Script file, or `-` for stdin
    pub script: Option<PathBuf>,

    /// Print events matching this filter (space-separated tokens)
    #[arg(long = "watch", value_name = "FILTER")]
    pub watches: Vec<String>,

    /// Print a one-shot timer event after MS milliseconds
    #[arg(long = "after", value_name = "MS")]
    pub after: Vec<u64>,

    /// Print a repeating timer event every MS milliseconds
    #[arg(long = "every", value_name = "MS")]
    pub every: Vec<u64>,

    /// Stop after this many passes
    #[arg(long)]
    pub max_passes: Option<u64>,

    /// Keep polling after the script is exhausted and the engine is idle
    #[arg(long)]
    pub keep_running: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of the file configuration
    pub fn apply(&self, mut config: EngineConfig) -> EngineConfig {
        if self.max_passes.is_some() {
            config.max_passes = self.max_passes;
        }
        if self.keep_running {
            config.exit_when_idle = false;
        }
        config
    }

    /// Parse every `--watch`; none at all means one catch-all printer
    pub fn filters(&self) -> Result<Vec<Filter>> {
        if self.watches.is_empty() && self.after.is_empty() && self.every.is_empty() {
            return Ok(vec![Filter::any()]);
        }
        self.watches
            .iter()
            .map(|w| {
                tokenize(w)
                    .map(Filter::new)
                    .map_err(|e| anyhow::anyhow!("invalid --watch '{}': {}", w, e))
            })
            .collect()
    }
}

pub fn handle(args: RunArgs, config: EngineConfig) -> Result<RunSummary> {
    let config = args.apply(config);
    let clock = SystemClock::new();
    let mut dispatcher = Dispatcher::new(Context::with_clock(clock.clone()));

    let printers = Printers::new(std::io::stdout());
    for filter in args.filters()? {
        printers.watch(dispatcher.context_mut(), filter);
    }
    for &delay in &args.after {
        printers
            .watch_timer(dispatcher.context_mut(), delay, false)
            .with_context(|| format!("invalid --after {}", delay))?;
    }
    for &delay in &args.every {
        printers
            .watch_timer(dispatcher.context_mut(), delay, true)
            .with_context(|| format!("invalid --every {}", delay))?;
    }

    let origin = ScriptOrigin::from_arg(args.script);
    dispatcher.attach(ScriptSource::new(origin, clock))?;

    let quit = Arc::new(AtomicBool::new(false));
    let flag = quit.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })?;

    let summary = Runner::new(config).run(&mut dispatcher, &quit);
    let callbacks = dispatcher.context().callbacks();
    for cb in callbacks.live_entries(callbacks.bound()) {
        tracing::debug!(callback = cb.id.0, filter = %cb.filter, "releasing callback");
    }
    let released = dispatcher.context_mut().shutdown();
    tracing::debug!(?released, "engine shut down");
    Ok(summary)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
