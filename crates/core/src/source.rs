// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event sources polled at the start of every iteration
//!
//! A source translates whatever it watches (a window system, a script, a
//! socket) into canonical topic-prefixed events. The shapes of the
//! platform input events are fixed by the constructors in [`input`].

use crate::error::ResourceError;
use crate::value::Event;
use std::collections::VecDeque;

/// One item produced by a source
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Event(Event),
    /// Stop the loop; nothing further is dispatched
    Quit,
}

impl From<Event> for Input {
    fn from(event: Event) -> Self {
        Input::Event(event)
    }
}

/// Producer of raw events for the dispatcher
pub trait EventSource {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Acquire whatever the source needs; called once when attached
    fn open(&mut self) -> Result<(), ResourceError> {
        Ok(())
    }

    /// Everything that arrived since the previous poll
    fn poll(&mut self) -> Vec<Input>;

    /// True once the source will never produce anything again
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// In-memory source, handing out one scripted batch per poll
#[derive(Debug, Default)]
pub struct VecSource {
    name: String,
    batches: VecDeque<Vec<Input>>,
}

impl VecSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            batches: VecDeque::new(),
        }
    }

    /// Queue a batch for a future poll
    pub fn batch(mut self, inputs: impl IntoIterator<Item = Input>) -> Self {
        self.batches.push_back(inputs.into_iter().collect());
        self
    }
}

impl EventSource for VecSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll(&mut self) -> Vec<Input> {
        self.batches.pop_front().unwrap_or_default()
    }

    fn is_exhausted(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Canonical platform input events
pub mod input {
    use crate::value::{Event, Value};

    fn event(topic: &str, kind: &str, rest: Vec<Value>) -> Event {
        let mut values = Vec::with_capacity(rest.len() + 2);
        values.push(Value::from(topic));
        values.push(Value::from(kind));
        values.extend(rest);
        Event::new(values)
    }

    /// `("kb", "down", key)`; key names are lowercased
    pub fn key_down(key: &str) -> Event {
        event("kb", "down", vec![Value::from(key.to_lowercase())])
    }

    /// `("kb", "up", key)`; key names are lowercased
    pub fn key_up(key: &str) -> Event {
        event("kb", "up", vec![Value::from(key.to_lowercase())])
    }

    /// `("kb", "input", text)`
    pub fn text_input(text: &str) -> Event {
        event("kb", "input", vec![Value::from(text)])
    }

    /// `("mouse", "move", x, y, dx, dy)`
    pub fn mouse_move(x: i32, y: i32, dx: i32, dy: i32) -> Event {
        event("mouse", "move", vec![x.into(), y.into(), dx.into(), dy.into()])
    }

    /// `("mouse", "down", button, x, y, double_click)`
    pub fn mouse_down(button: u8, x: i32, y: i32, double_click: bool) -> Event {
        event(
            "mouse",
            "down",
            vec![button.into(), x.into(), y.into(), double_click.into()],
        )
    }

    /// `("mouse", "up", button, x, y, double_click)`
    pub fn mouse_up(button: u8, x: i32, y: i32, double_click: bool) -> Event {
        event(
            "mouse",
            "up",
            vec![button.into(), x.into(), y.into(), double_click.into()],
        )
    }

    /// `("mouse", "scroll", dx, dy, flipped)`
    pub fn mouse_scroll(dx: i32, dy: i32, flipped: bool) -> Event {
        event("mouse", "scroll", vec![dx.into(), dy.into(), flipped.into()])
    }

    /// `("screen", "resize", width, height)`
    pub fn screen_resize(width: i32, height: i32) -> Event {
        event("screen", "resize", vec![width.into(), height.into()])
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
