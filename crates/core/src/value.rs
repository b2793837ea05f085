// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Primitive values and the tuples built from them
//!
//! Events and filters are both ordered tuples of [`Value`]s. Equality is
//! structural: the tag must agree before payloads are compared, so
//! `Int(1)` and `Float(1.0)` are different values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// A closed tagged primitive
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

macro_rules! int_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

int_from!(i8, i16, i32, i64, u8, u16, u32);

/// An ordered tuple of values describing one occurrence, e.g. `kb down a`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Vec<Value>);

impl Event {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Leading element, conventionally the topic ("kb", "mouse", "timer")
    pub fn topic(&self) -> Option<&str> {
        self.0.first().and_then(Value::as_str)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl Deref for Event {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Event {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Event {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, &self.0)
    }
}

/// A prefix tuple selecting the events a callback is interested in
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Vec<Value>);

impl Filter {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// The filter that matches every event
    pub fn any() -> Self {
        Self(Vec::new())
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Check whether this filter selects the event
    pub fn matches(&self, event: &Event) -> bool {
        crate::filter::matches(&self.0, event)
    }
}

impl Deref for Filter {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Filter {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl From<&[Value]> for Filter {
    fn from(values: &[Value]) -> Self {
        Self(values.to_vec())
    }
}

impl FromIterator<Value> for Filter {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, &self.0)
    }
}

fn write_tuple(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    f.write_str("(")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match value {
            Value::Str(s) => write!(f, "{:?}", s)?,
            other => write!(f, "{}", other)?,
        }
    }
    f.write_str(")")
}

/// Build an [`Event`] from anything convertible into [`Value`]
///
/// ```
/// let e = moonbox_core::event!["mouse", "move", 10, 20, -1, 0];
/// assert_eq!(e.len(), 6);
/// ```
#[macro_export]
macro_rules! event {
    ($($v:expr),* $(,)?) => {
        $crate::Event::new(vec![$($crate::Value::from($v)),*])
    };
}

/// Build a [`Filter`] from anything convertible into [`Value`]
#[macro_export]
macro_rules! filter {
    ($($v:expr),* $(,)?) => {
        $crate::Filter::new(vec![$($crate::Value::from($v)),*])
    };
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
