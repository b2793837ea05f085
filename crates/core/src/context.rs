// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process-wide event context
//!
//! One [`Context`] owns every callback, timer and pending event. It is
//! built explicitly, handed to each handler invocation, and releases all
//! live registrations on [`Context::shutdown`] or drop.

use crate::clock::{Clock, SystemClock};
use crate::error::TimerError;
use crate::queue::{EventQueue, EventSender, Inbox};
use crate::registry::{handler, CallbackId, CallbackRegistry, IntoHandlerResult};
use crate::timer::{TimerId, TimerScheduler};
use crate::value::{Event, Filter, Value};
use std::sync::Arc;

/// Counts of what [`Context::shutdown`] released
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Released {
    pub callbacks: usize,
    pub timers: usize,
    pub events: usize,
}

pub struct Context {
    callbacks: CallbackRegistry,
    timers: TimerScheduler,
    queue: EventQueue,
    inbox: Inbox,
    clock: Arc<dyn Clock>,
}

impl Context {
    /// Context on the real monotonic clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            callbacks: CallbackRegistry::new(),
            timers: TimerScheduler::new(),
            queue: EventQueue::new(),
            inbox: Inbox::new(),
            clock: Arc::new(clock),
        }
    }

    /// Register a callback for events matching `filter`
    ///
    /// The returned id is usable immediately. The callback first sees events
    /// on the next dispatch pass.
    pub fn on<F, R>(&mut self, filter: Filter, f: F) -> CallbackId
    where
        F: FnMut(&mut Context, &[Value]) -> R + 'static,
        R: IntoHandlerResult,
    {
        self.callbacks.register(filter, handler(f), None)
    }

    /// Register a callback carrying auxiliary data, readable through
    /// [`CallbackRegistry::get`]
    pub fn on_with_data<F, R>(&mut self, filter: Filter, data: Value, f: F) -> CallbackId
    where
        F: FnMut(&mut Context, &[Value]) -> R + 'static,
        R: IntoHandlerResult,
    {
        self.callbacks.register(filter, handler(f), Some(data))
    }

    /// Deregister a callback; false if unknown or already removed
    pub fn off(&mut self, id: CallbackId) -> bool {
        self.callbacks.unregister(id)
    }

    /// Enqueue an event at the tail
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    /// Start a timer that emits `("timer", id, overshoot_ms)` events
    pub fn start_timer(&mut self, delay_ms: u64, repeat: bool) -> Result<TimerId, TimerError> {
        let now = self.now();
        self.timers.start(delay_ms, repeat, now)
    }

    /// Stop a timer; false if unknown, stopped, or a fired one-shot
    pub fn stop_timer(&mut self, id: TimerId) -> bool {
        self.timers.stop(id)
    }

    /// Start a timer and register `f` for its events
    ///
    /// Returns the callback id, which is what [`Context::remove_timer`]
    /// expects.
    pub fn add_timer<F, R>(&mut self, delay_ms: u64, f: F, repeat: bool) -> Result<CallbackId, TimerError>
    where
        F: FnMut(&mut Context, &[Value]) -> R + 'static,
        R: IntoHandlerResult,
    {
        let timer = self.start_timer(delay_ms, repeat)?;
        Ok(self.callbacks.register(timer.filter(), handler(f), None))
    }

    /// Stop the timer behind a callback from [`Context::add_timer`], then
    /// deregister the callback
    ///
    /// Nothing changes unless the timer could be stopped: an unknown id, a
    /// callback that is not a timer callback, or a timer that already
    /// finished all return false and leave the callback in place.
    pub fn remove_timer(&mut self, id: CallbackId) -> bool {
        let Some(timer) = self
            .callbacks
            .get(id)
            .and_then(|cb| TimerId::from_filter(cb.filter))
        else {
            return false;
        };
        if !self.timers.stop(timer) {
            return false;
        }
        self.callbacks.unregister(id)
    }

    /// A handle other threads can push events through
    pub fn sender(&self) -> EventSender {
        self.inbox.sender()
    }

    /// True while another thread still holds a sender or its events await
    /// ingestion
    pub fn has_remote_producers(&self) -> bool {
        !self.inbox.is_quiet()
    }

    /// Current tick of the context's clock, in milliseconds
    pub fn now(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    pub fn timers(&self) -> &TimerScheduler {
        &self.timers
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Release every live callback and timer and discard pending events
    pub fn shutdown(&mut self) -> Released {
        let released = Released {
            callbacks: self.callbacks.clear(),
            timers: self.timers.clear(),
            events: self.queue.clear() + self.inbox.discard(),
        };
        if released != Released::default() {
            tracing::debug!(
                callbacks = released.callbacks,
                timers = released.timers,
                events = released.events,
                "context shut down"
            );
        }
        released
    }

    pub(crate) fn callbacks_mut(&mut self) -> &mut CallbackRegistry {
        &mut self.callbacks
    }

    pub(crate) fn queue_mut(&mut self) -> &mut EventQueue {
        &mut self.queue
    }

    /// Move cross-thread sends into the queue
    pub(crate) fn ingest_inbox(&mut self) -> usize {
        self.inbox.drain_into(&mut self.queue)
    }

    /// Advance timers to the current tick, queueing their events
    pub(crate) fn tick_timers(&mut self) -> usize {
        let now = self.now();
        let fired = self.timers.tick(now);
        let count = fired.len();
        self.queue.extend(fired);
        count
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("callbacks", &self.callbacks)
            .field("timers", &self.timers.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
