// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Main loop: repeatedly poll the dispatcher until something says stop

use crate::config::EngineConfig;
use crate::dispatch::{Dispatcher, PassReport, Status};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Why the loop ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A source produced a quit input
    SourceQuit,
    /// The external quit flag was raised
    Interrupted,
    MaxPasses,
    /// Nothing left that could produce an event
    Idle,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::SourceQuit => "source quit",
            StopReason::Interrupted => "interrupted",
            StopReason::MaxPasses => "max passes reached",
            StopReason::Idle => "idle",
        };
        f.write_str(s)
    }
}

/// Totals over a whole run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: StopReason,
    pub passes: u64,
    pub events: usize,
    pub invocations: usize,
    pub failures: usize,
    pub removed: usize,
}

impl RunSummary {
    fn new(reason: StopReason) -> Self {
        Self {
            reason,
            passes: 0,
            events: 0,
            invocations: 0,
            failures: 0,
            removed: 0,
        }
    }

    fn absorb(&mut self, report: PassReport) {
        self.passes += 1;
        self.events += report.events;
        self.invocations += report.invocations;
        self.failures += report.failures;
        self.removed += report.removed;
    }
}

/// Drives a [`Dispatcher`] with the loop settings from [`EngineConfig`]
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: EngineConfig,
}

impl Runner {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Poll until a stop condition holds
    ///
    /// `quit` is checked before every iteration, so a flag raised from a
    /// signal handler takes effect within one iteration.
    pub fn run(&self, dispatcher: &mut Dispatcher, quit: &AtomicBool) -> RunSummary {
        let mut summary = RunSummary::new(StopReason::Interrupted);

        summary.reason = loop {
            if quit.load(Ordering::SeqCst) {
                break StopReason::Interrupted;
            }
            if self.config.max_passes.is_some_and(|max| summary.passes >= max) {
                break StopReason::MaxPasses;
            }

            let started = Instant::now();
            if dispatcher.poll() == Status::Quit {
                break StopReason::SourceQuit;
            }
            summary.absorb(dispatcher.last_report());

            if self.config.exit_when_idle && is_idle(dispatcher) {
                break StopReason::Idle;
            }

            let elapsed = started.elapsed();
            if elapsed < self.config.min_iteration {
                std::thread::sleep(self.config.min_iteration - elapsed);
            }
        };

        tracing::info!(
            reason = %summary.reason,
            passes = summary.passes,
            events = summary.events,
            failures = summary.failures,
            "run finished"
        );
        summary
    }
}

/// Nothing can produce another event: sources are exhausted, the queue is
/// empty, no timer is pending and no other thread holds a sender
fn is_idle(dispatcher: &Dispatcher) -> bool {
    let ctx = dispatcher.context();
    dispatcher.sources_exhausted()
        && ctx.queue().is_empty()
        && ctx.timers().next_fire_tick().is_none()
        && !ctx.has_remote_producers()
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
