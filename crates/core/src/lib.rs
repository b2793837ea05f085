// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! moonbox-core: event dispatch engine with a timer subsystem
//!
//! This crate provides:
//! - Tuple-shaped events and prefix filters ([`Value`], [`Event`], [`Filter`])
//! - A callback registry with stable, never-reused ids
//! - One-shot and repeating timers that produce ordinary events
//! - A single-threaded dispatcher draining a FIFO queue per poll
//! - A runner loop configured from TOML

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod value;

// Engine state (order matters for dependencies)
pub mod queue;
pub mod registry;
pub mod timer;
pub mod context;
pub mod source;
pub mod dispatch;
pub mod runner;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::EngineConfig;
pub use context::{Context, Released};
pub use dispatch::{Dispatcher, PassReport, Status};
pub use error::{ConfigError, InvocationError, ResourceError, TimerError};
pub use queue::{EventQueue, EventSender, Inbox};
pub use registry::{
    handler, CallbackId, CallbackRef, CallbackRegistry, Disposition, Handler, HandlerResult,
    IntoHandlerResult,
};
pub use runner::{RunSummary, Runner, StopReason};
pub use source::{input, EventSource, Input, VecSource};
pub use timer::{TimerId, TimerScheduler, TimerState, TIMER_TOPIC};
pub use value::{Event, Filter, Value};
