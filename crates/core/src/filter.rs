// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prefix matching of filters against events

use crate::value::Value;

/// Check if a filter selects an event
///
/// The filter matches when it is no longer than the event and each of its
/// elements equals the corresponding leading element of the event. The
/// empty filter matches everything.
pub fn matches(filter: &[Value], event: &[Value]) -> bool {
    filter.len() <= event.len() && filter.iter().zip(event).all(|(f, e)| f == e)
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
