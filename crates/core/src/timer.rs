// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tick-driven timer scheduling
//!
//! Timers do not run anything themselves. Each tick turns every due timer
//! into a `("timer", id, overshoot_ms)` event for the dispatcher to route to
//! whatever callbacks are listening.

use crate::error::TimerError;
use crate::value::{Event, Filter, Value};
use std::fmt;

/// Topic of synthesized timer events
pub const TIMER_TOPIC: &str = "timer";

/// Identifier of a started timer, stable for the process lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TimerId {
    /// Filter selecting this timer's events
    pub fn filter(self) -> Filter {
        Filter::new(vec![Value::from(TIMER_TOPIC), self.into()])
    }

    /// Recover the timer id from a `("timer", id)` filter
    pub fn from_filter(filter: &Filter) -> Option<Self> {
        match filter.values() {
            [Value::Str(topic), Value::Int(id)] if topic == TIMER_TOPIC => {
                u64::try_from(*id).ok().map(TimerId)
            }
            _ => None,
        }
    }
}

impl From<TimerId> for Value {
    fn from(id: TimerId) -> Self {
        Value::Int(i64::try_from(id.0).unwrap_or(i64::MAX))
    }
}

/// Snapshot of a live timer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerState {
    pub id: TimerId,
    pub delay_ms: u64,
    pub repeat: bool,
    /// Absolute tick of the next fire
    pub next_fire_tick: u64,
}

/// Arena of timers addressed by monotonic id
#[derive(Debug, Default)]
pub struct TimerScheduler {
    /// Slot `i` holds id `i + 1`; `None` is a stopped timer
    slots: Vec<Option<TimerState>>,
    live: usize,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timer to first fire `delay_ms` after `now`
    pub fn start(&mut self, delay_ms: u64, repeat: bool, now: u64) -> Result<TimerId, TimerError> {
        if delay_ms == 0 {
            return Err(TimerError::ZeroDelay);
        }
        let id = TimerId(self.slots.len() as u64 + 1);
        self.slots.push(Some(TimerState {
            id,
            delay_ms,
            repeat,
            next_fire_tick: now.saturating_add(delay_ms),
        }));
        self.live += 1;
        tracing::debug!(timer = id.0, delay_ms, repeat, "started timer");
        Ok(id)
    }

    /// Stop a timer
    ///
    /// Returns false if the id was never issued, the timer was already
    /// stopped, or it was a one-shot that has fired.
    pub fn stop(&mut self, id: TimerId) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        if slot.take().is_none() {
            return false;
        }
        self.live -= 1;
        tracing::debug!(timer = id.0, "stopped timer");
        true
    }

    pub fn get(&self, id: TimerId) -> Option<TimerState> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        *self.slots.get(index)?
    }

    /// Fire every due timer, in ascending id order
    ///
    /// A repeating timer fires at most once per tick. When the scheduler
    /// fell behind by more than one interval, the next fire is clamped to
    /// `now` instead of replaying the missed intervals.
    pub fn tick(&mut self, now: u64) -> Vec<Event> {
        let mut fired = Vec::new();
        let mut finished = 0;

        for slot in &mut self.slots {
            let Some(timer) = slot else {
                continue;
            };
            if timer.next_fire_tick > now {
                continue;
            }

            let nominal = timer.next_fire_tick.saturating_sub(timer.delay_ms);
            let overshoot = now - nominal;
            fired.push(Event::new(vec![
                Value::from(TIMER_TOPIC),
                timer.id.into(),
                Value::Int(i64::try_from(overshoot).unwrap_or(i64::MAX)),
            ]));

            if timer.repeat {
                let next = timer.next_fire_tick.saturating_add(timer.delay_ms);
                timer.next_fire_tick = if next <= now { now } else { next };
            } else {
                tracing::trace!(timer = timer.id.0, "one-shot timer fired");
                *slot = None;
                finished += 1;
            }
        }

        self.live -= finished;
        fired
    }

    /// Earliest pending fire tick among live timers
    pub fn next_fire_tick(&self) -> Option<u64> {
        self.slots.iter().flatten().map(|t| t.next_fire_tick).min()
    }

    /// Number of live timers
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Stop every live timer
    pub fn clear(&mut self) -> usize {
        let stopped = self.live;
        for slot in &mut self.slots {
            *slot = None;
        }
        self.live = 0;
        stopped
    }

    fn slot_mut(&mut self, id: TimerId) -> Option<&mut Option<TimerState>> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.slots.get_mut(index)
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
