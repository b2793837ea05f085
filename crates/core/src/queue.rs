// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending events
//!
//! The loop thread owns an [`EventQueue`] and appends to it without
//! locking. Other threads get an [`EventSender`]; what they send lands in an
//! [`Inbox`] that the dispatcher drains into the queue at the start of each
//! poll.

use crate::value::Event;
use std::collections::VecDeque;
use tokio::sync::mpsc;

/// Sender for pushing events from another thread
pub type EventSender = mpsc::UnboundedSender<Event>;

/// FIFO buffer of events waiting for dispatch
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail
    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Remove from the head
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Discard every pending event
    pub fn clear(&mut self) -> usize {
        let discarded = self.events.len();
        self.events.clear();
        discarded
    }
}

impl Extend<Event> for EventQueue {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

/// Receiving end of the cross-thread channel
#[derive(Debug)]
pub struct Inbox {
    tx: EventSender,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl Inbox {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A new handle for producers on other threads
    pub fn sender(&self) -> EventSender {
        self.tx.clone()
    }

    /// Move everything received so far into the queue, in send order
    pub fn drain_into(&mut self, queue: &mut EventQueue) -> usize {
        let mut moved = 0;
        while let Ok(event) = self.rx.try_recv() {
            queue.push(event);
            moved += 1;
        }
        moved
    }

    /// True when every outside sender is gone and nothing is waiting
    ///
    /// The sender count is read before the buffer so a send that raced with
    /// its sender's drop is still seen as pending.
    pub fn is_quiet(&self) -> bool {
        self.rx.sender_strong_count() == 1 && self.rx.is_empty()
    }

    /// Drop anything received but not yet ingested
    pub fn discard(&mut self) -> usize {
        let mut dropped = 0;
        while self.rx.try_recv().is_ok() {
            dropped += 1;
        }
        dropped
    }
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
