use super::*;
use crate::clock::FakeClock;
use crate::context::Context;
use crate::source::{input, EventSource, Input, VecSource};
use crate::value::Value;
use crate::{event, filter};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn runner(max_passes: Option<u64>, exit_when_idle: bool) -> Runner {
    Runner::new(EngineConfig {
        min_iteration: Duration::ZERO,
        max_passes,
        exit_when_idle,
        log_file: None,
    })
}

/// Source that moves a fake clock forward on every poll
struct Ticker {
    clock: FakeClock,
    step_ms: u64,
}

impl EventSource for Ticker {
    fn name(&self) -> &str {
        "ticker"
    }

    fn poll(&mut self) -> Vec<Input> {
        self.clock.advance_ms(self.step_ms);
        Vec::new()
    }

    fn is_exhausted(&self) -> bool {
        true
    }
}

#[test]
fn raised_quit_flag_stops_before_first_pass() {
    let mut d = Dispatcher::new(Context::with_clock(FakeClock::new()));
    let summary = runner(None, false).run(&mut d, &AtomicBool::new(true));
    assert_eq!(summary.reason, StopReason::Interrupted);
    assert_eq!(summary.passes, 0);
}

#[test]
fn max_passes_bounds_the_loop() {
    let mut d = Dispatcher::new(Context::with_clock(FakeClock::new()));
    let summary = runner(Some(5), false).run(&mut d, &AtomicBool::new(false));
    assert_eq!(summary.reason, StopReason::MaxPasses);
    assert_eq!(summary.passes, 5);
    assert_eq!(d.passes(), 5);
}

#[test]
fn source_quit_ends_run_without_dispatching_its_batch() {
    let mut d = Dispatcher::new(Context::with_clock(FakeClock::new()));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    d.context_mut().on(filter!["kb"], move |_: &mut Context, args: &[Value]| {
        sink.borrow_mut().push(args.to_vec());
    });
    d.attach(
        VecSource::new("script")
            .batch([Input::from(input::key_down("a"))])
            .batch([Input::from(input::key_down("b")), Input::Quit]),
    )
    .unwrap();

    let summary = runner(None, true).run(&mut d, &AtomicBool::new(false));
    assert_eq!(summary.reason, StopReason::SourceQuit);
    assert_eq!(summary.passes, 1);
    assert_eq!(*seen.borrow(), vec![vec![Value::from("down"), Value::from("a")]]);
}

#[test]
fn exhausted_script_exits_when_idle() {
    let mut d = Dispatcher::new(Context::with_clock(FakeClock::new()));
    d.context_mut().on(filter![], |_, _| ());
    d.attach(VecSource::new("script").batch([Input::from(event!["a"])]))
        .unwrap();

    let summary = runner(None, true).run(&mut d, &AtomicBool::new(false));
    assert_eq!(summary.reason, StopReason::Idle);
    assert_eq!(summary.passes, 1);
    assert_eq!(summary.events, 1);
    assert_eq!(summary.invocations, 1);
}

#[test]
fn pending_timer_keeps_loop_alive_until_it_fires() {
    let clock = FakeClock::new();
    let mut d = Dispatcher::new(Context::with_clock(clock.clone()));
    d.context_mut().add_timer(30, |_, _| (), false).unwrap();
    d.attach(Ticker { clock, step_ms: 10 }).unwrap();

    let summary = runner(Some(100), true).run(&mut d, &AtomicBool::new(false));
    assert_eq!(summary.reason, StopReason::Idle);
    assert_eq!(summary.passes, 3);
    assert_eq!(summary.events, 1);
}

#[test]
fn failures_are_totalled() {
    let mut d = Dispatcher::new(Context::with_clock(FakeClock::new()));
    d.context_mut()
        .on(filter![], |_, _| -> Result<(), String> { Err("nope".into()) });
    d.attach(
        VecSource::new("script")
            .batch([Input::from(event!["a"])])
            .batch([Input::from(event!["b"])]),
    )
    .unwrap();

    let summary = runner(None, true).run(&mut d, &AtomicBool::new(false));
    assert_eq!(summary.failures, 2);
    assert_eq!(summary.passes, 2);
}

#[test]
fn min_iteration_paces_the_loop() {
    let mut d = Dispatcher::new(Context::with_clock(FakeClock::new()));
    let config = EngineConfig {
        min_iteration: Duration::from_millis(5),
        max_passes: Some(3),
        exit_when_idle: false,
        log_file: None,
    };

    let started = std::time::Instant::now();
    Runner::new(config).run(&mut d, &AtomicBool::new(false));
    assert!(started.elapsed() >= Duration::from_millis(15));
}

#[test]
fn idle_exit_waits_for_worker_still_holding_a_sender() {
    let mut d = Dispatcher::new(Context::with_clock(FakeClock::new()));
    let seen = Rc::new(RefCell::new(0));
    let count = seen.clone();
    d.context_mut()
        .on(filter!["worker", "done"], move |_: &mut Context, _: &[Value]| {
            *count.borrow_mut() += 1;
        });

    let tx = d.context().sender();
    let worker = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        tx.send(event!["worker", "done"]).unwrap();
    });

    let config = EngineConfig {
        min_iteration: Duration::from_millis(1),
        max_passes: Some(10_000),
        ..EngineConfig::default()
    };
    let summary = Runner::new(config).run(&mut d, &AtomicBool::new(false));
    worker.join().unwrap();

    assert_eq!(summary.reason, StopReason::Idle);
    assert_eq!(*seen.borrow(), 1);
    assert!(summary.passes > 1);
}
