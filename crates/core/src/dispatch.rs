// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One poll iteration: ingest, tick timers, drain, invoke
//!
//! Both bounds of a pass are captured before the first event is processed:
//! the number of queued events and the registry's next id. Events pushed and
//! callbacks registered by handlers during the pass therefore only take
//! effect on the next pass, which keeps every pass finite.

use crate::context::Context;
use crate::error::{InvocationError, ResourceError};
use crate::registry::{CallbackId, Disposition};
use crate::source::{EventSource, Input};
use crate::value::Event;
use std::panic::{self, AssertUnwindSafe};

/// Whether the loop should keep going after a poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Continue,
    /// An event source asked the process to quit
    Quit,
}

/// What happened during one poll iteration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Events taken from attached sources and other threads
    pub ingested: usize,
    pub timers_fired: usize,
    /// Events drained from the queue
    pub events: usize,
    pub invocations: usize,
    pub failures: usize,
    /// Callbacks removed because they returned false
    pub removed: usize,
}

impl PassReport {
    fn absorb(&mut self, other: PassReport) {
        self.events += other.events;
        self.invocations += other.invocations;
        self.failures += other.failures;
        self.removed += other.removed;
    }
}

/// Drives the context: owns it together with the attached event sources
pub struct Dispatcher {
    ctx: Context,
    sources: Vec<Box<dyn EventSource>>,
    passes: u64,
    last: PassReport,
}

impl Dispatcher {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            sources: Vec::new(),
            passes: 0,
            last: PassReport::default(),
        }
    }

    /// Open a source and poll it on every iteration from now on
    ///
    /// An open failure is fatal for the caller; the source is not attached.
    pub fn attach(&mut self, mut source: impl EventSource + 'static) -> Result<(), ResourceError> {
        source.open()?;
        tracing::debug!(source = source.name(), "attached event source");
        self.sources.push(Box::new(source));
        Ok(())
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    /// True when every attached source has nothing more to give
    pub fn sources_exhausted(&self) -> bool {
        self.sources.iter().all(|s| s.is_exhausted())
    }

    /// Number of completed passes
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn last_report(&self) -> PassReport {
        self.last
    }

    /// Run one full iteration
    ///
    /// A quit input from a source ends the iteration before anything is
    /// dispatched.
    pub fn poll(&mut self) -> Status {
        let mut report = PassReport::default();

        for source in &mut self.sources {
            for input in source.poll() {
                match input {
                    Input::Event(event) => {
                        self.ctx.push(event);
                        report.ingested += 1;
                    }
                    Input::Quit => {
                        tracing::info!(source = source.name(), "quit requested");
                        return Status::Quit;
                    }
                }
            }
        }
        report.ingested += self.ctx.ingest_inbox();
        report.timers_fired = self.ctx.tick_timers();

        report.absorb(self.drain());
        self.last = report;
        Status::Continue
    }

    /// Dispatch every event queued before this call, in FIFO order
    pub fn drain(&mut self) -> PassReport {
        let queued = self.ctx.queue().len();
        let bound = self.ctx.callbacks().bound();
        let mut report = PassReport::default();

        for _ in 0..queued {
            let Some(event) = self.ctx.queue_mut().pop() else {
                break;
            };
            self.dispatch_event(&event, bound, &mut report);
            report.events += 1;
        }

        self.passes += 1;
        if report.events > 0 {
            tracing::trace!(
                pass = self.passes,
                events = report.events,
                invocations = report.invocations,
                "drained queue"
            );
        }
        report
    }

    fn dispatch_event(&mut self, event: &Event, bound: CallbackId, report: &mut PassReport) {
        let mut cursor = self.ctx.callbacks().cursor(bound);

        while let Some(id) = cursor.next(self.ctx.callbacks()) {
            let Some(skip) = self
                .ctx
                .callbacks()
                .get(id)
                .filter(|cb| cb.filter.matches(event))
                .map(|cb| cb.filter.len())
            else {
                continue;
            };
            // Already checked out means it is running further up the stack
            let Some(mut handler) = self.ctx.callbacks_mut().take_handler(id) else {
                continue;
            };

            let args = &event[skip..];
            let ctx = &mut self.ctx;
            let result = panic::catch_unwind(AssertUnwindSafe(|| handler(ctx, args)))
                .unwrap_or_else(|payload| Err(InvocationError::from_panic(payload.as_ref())));
            self.ctx.callbacks_mut().restore_handler(id, handler);
            report.invocations += 1;

            match result {
                Ok(Disposition::Keep) => {}
                Ok(Disposition::Unregister) => {
                    if self.ctx.off(id) {
                        report.removed += 1;
                    }
                }
                Err(e) => {
                    report.failures += 1;
                    tracing::warn!(callback = id.0, %event, error = %e, "callback failed");
                }
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("ctx", &self.ctx)
            .field("sources", &self.sources.len())
            .field("passes", &self.passes)
            .finish()
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
