// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Printers: callbacks that write every event they receive
//!
//! Each line is `<callback-id> <json array of the full event>`.

use moonbox_core::{CallbackId, Context, Filter, TimerError, Value};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Filled in once the printer knows its own id and filter
type Registration = Rc<RefCell<Option<(CallbackId, Filter)>>>;

/// Format one output line from the matched prefix and the handler arguments
pub fn format_line(id: CallbackId, prefix: &[Value], args: &[Value]) -> serde_json::Result<String> {
    let full: Vec<&Value> = prefix.iter().chain(args).collect();
    Ok(format!("{} {}", id, serde_json::to_string(&full)?))
}

/// Registers printers that share one writer
pub struct Printers<W> {
    out: Rc<RefCell<W>>,
}

impl<W: Write + 'static> Printers<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Rc::new(RefCell::new(out)),
        }
    }

    /// Print every event matching `filter`
    pub fn watch(&self, ctx: &mut Context, filter: Filter) -> CallbackId {
        let slot = Registration::default();
        let id = ctx.on(filter.clone(), self.printer(slot.clone()));
        *slot.borrow_mut() = Some((id, filter));
        id
    }

    /// Start a timer and print its events
    pub fn watch_timer(
        &self,
        ctx: &mut Context,
        delay_ms: u64,
        repeat: bool,
    ) -> Result<CallbackId, TimerError> {
        let slot = Registration::default();
        let id = ctx.add_timer(delay_ms, self.printer(slot.clone()), repeat)?;
        let filter = ctx
            .callbacks()
            .get(id)
            .map(|cb| cb.filter.clone())
            .unwrap_or_default();
        *slot.borrow_mut() = Some((id, filter));
        Ok(id)
    }

    #[cfg(test)]
    pub fn writer(&self) -> Rc<RefCell<W>> {
        self.out.clone()
    }

    fn printer(
        &self,
        slot: Registration,
    ) -> impl FnMut(&mut Context, &[Value]) -> std::io::Result<()> + 'static {
        let out = self.out.clone();
        move |_: &mut Context, args: &[Value]| {
            let registration = slot.borrow();
            let Some((id, filter)) = registration.as_ref() else {
                return Ok(());
            };
            let line = format_line(*id, filter, args)?;
            writeln!(out.borrow_mut(), "{}", line)
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
