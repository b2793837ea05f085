// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Callback registry
//!
//! Callbacks live in an arena indexed by id. Ids come from a monotonic
//! counter and are never reused: removing a callback tombstones its slot
//! instead of freeing it, so an id captured earlier can never refer to a
//! later registration.

use crate::context::Context;
use crate::error::InvocationError;
use crate::value::{Filter, Value};
use std::fmt;

/// Identifier returned by registration, stable for the process lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallbackId(pub u64);

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the dispatcher should do with a callback after it ran
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Keep,
    /// Self-unregister signal; the callback never runs again
    Unregister,
}

pub type HandlerResult = Result<Disposition, InvocationError>;

/// Boxed callback body
///
/// Receives the context (to push events or change registrations) and the
/// event elements past the matched filter.
pub type Handler = Box<dyn FnMut(&mut Context, &[Value]) -> HandlerResult>;

/// Conversion from a handler's return value into a [`HandlerResult`]
///
/// `()` keeps the callback, `false` unregisters it, and an `Err` is reported
/// as an invocation failure.
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> HandlerResult;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> HandlerResult {
        Ok(Disposition::Keep)
    }
}

impl IntoHandlerResult for bool {
    fn into_handler_result(self) -> HandlerResult {
        Ok(if self {
            Disposition::Keep
        } else {
            Disposition::Unregister
        })
    }
}

impl IntoHandlerResult for Disposition {
    fn into_handler_result(self) -> HandlerResult {
        Ok(self)
    }
}

impl<T, E> IntoHandlerResult for Result<T, E>
where
    T: IntoHandlerResult,
    E: fmt::Display,
{
    fn into_handler_result(self) -> HandlerResult {
        match self {
            Ok(value) => value.into_handler_result(),
            Err(e) => Err(InvocationError::new(e.to_string())),
        }
    }
}

/// Box a closure as a [`Handler`]
pub fn handler<F, R>(mut f: F) -> Handler
where
    F: FnMut(&mut Context, &[Value]) -> R + 'static,
    R: IntoHandlerResult,
{
    Box::new(move |ctx, args| f(ctx, args).into_handler_result())
}

struct Entry {
    filter: Filter,
    data: Option<Value>,
    /// `None` while the handler is checked out for an invocation
    handler: Option<Handler>,
}

/// Read-only view of a live callback
#[derive(Clone, Copy, Debug)]
pub struct CallbackRef<'a> {
    pub id: CallbackId,
    pub filter: &'a Filter,
    pub data: Option<&'a Value>,
}

/// Arena of callbacks addressed by monotonic id
#[derive(Default)]
pub struct CallbackRegistry {
    /// Slot `i` holds id `i + 1`; `None` is a tombstone
    slots: Vec<Option<Entry>>,
    live: usize,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a live callback and return its id
    pub fn register(&mut self, filter: Filter, handler: Handler, data: Option<Value>) -> CallbackId {
        let id = self.bound();
        tracing::debug!(callback = id.0, %filter, "registered callback");
        self.slots.push(Some(Entry {
            filter,
            data,
            handler: Some(handler),
        }));
        self.live += 1;
        id
    }

    /// Tombstone a callback
    ///
    /// Returns false if the id was never issued or is already removed.
    pub fn unregister(&mut self, id: CallbackId) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        if slot.take().is_none() {
            return false;
        }
        self.live -= 1;
        tracing::debug!(callback = id.0, "unregistered callback");
        true
    }

    pub fn get(&self, id: CallbackId) -> Option<CallbackRef<'_>> {
        let index = Self::index(id)?;
        let entry = self.slots.get(index)?.as_ref()?;
        Some(CallbackRef {
            id,
            filter: &entry.filter,
            data: entry.data.as_ref(),
        })
    }

    pub fn is_live(&self, id: CallbackId) -> bool {
        self.get(id).is_some()
    }

    /// The id the next registration will receive
    ///
    /// Used as the snapshot bound of a dispatch pass: everything registered
    /// after it was taken has an id at or above it.
    pub fn bound(&self) -> CallbackId {
        CallbackId(self.slots.len() as u64 + 1)
    }

    /// Live callbacks with id strictly below `bound`, in ascending id order
    pub fn live_entries(&self, bound: CallbackId) -> impl Iterator<Item = CallbackRef<'_>> + '_ {
        let end = Self::index(bound).unwrap_or(0).min(self.slots.len());
        self.slots[..end]
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.as_ref().map(|entry| CallbackRef {
                    id: CallbackId(index as u64 + 1),
                    filter: &entry.filter,
                    data: entry.data.as_ref(),
                })
            })
    }

    /// Restartable cursor over live ids below `bound`
    pub fn cursor(&self, bound: CallbackId) -> LiveCursor {
        LiveCursor::new(bound)
    }

    /// Number of live callbacks
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Tombstone every live callback, releasing their handlers
    pub fn clear(&mut self) -> usize {
        let released = self.live;
        for slot in &mut self.slots {
            *slot = None;
        }
        self.live = 0;
        released
    }

    /// Check out a handler for the duration of an invocation
    ///
    /// Returns `None` for tombstoned ids or a handler that is already
    /// checked out.
    pub fn take_handler(&mut self, id: CallbackId) -> Option<Handler> {
        self.slot_mut(id)?.as_mut()?.handler.take()
    }

    /// Return a checked-out handler
    ///
    /// If the callback was removed while its handler was out (for example by
    /// the handler itself), the handler is dropped here.
    pub fn restore_handler(&mut self, id: CallbackId, handler: Handler) {
        if let Some(entry) = self.slot_mut(id).and_then(|slot| slot.as_mut()) {
            entry.handler = Some(handler);
        }
    }

    fn index(id: CallbackId) -> Option<usize> {
        usize::try_from(id.0).ok()?.checked_sub(1)
    }

    fn slot_mut(&mut self, id: CallbackId) -> Option<&mut Option<Entry>> {
        let index = Self::index(id)?;
        self.slots.get_mut(index)
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("allocated", &self.slots.len())
            .field("live", &self.live)
            .finish()
    }
}

/// Cursor over live callback ids below a fixed bound
///
/// Liveness is checked against the registry at every step, so callbacks
/// removed after the cursor was created are skipped and callbacks added
/// after it are never reached.
#[derive(Clone, Copy, Debug)]
pub struct LiveCursor {
    position: u64,
    bound: u64,
}

impl LiveCursor {
    pub fn new(bound: CallbackId) -> Self {
        Self {
            position: 1,
            bound: bound.0,
        }
    }

    /// Next live id, or `None` once the bound is reached
    pub fn next(&mut self, registry: &CallbackRegistry) -> Option<CallbackId> {
        while self.position < self.bound {
            let id = CallbackId(self.position);
            self.position += 1;
            if registry.is_live(id) {
                return Some(id);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
