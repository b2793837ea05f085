use super::*;
use moonbox_core::{event, filter, Dispatcher, FakeClock};

fn lines(printers: &Printers<Vec<u8>>) -> Vec<String> {
    let out = printers.writer();
    let text = String::from_utf8(out.borrow().clone()).unwrap();
    text.lines().map(str::to_string).collect()
}

#[test]
fn format_line_prints_full_event_as_json() {
    let line = format_line(
        CallbackId(3),
        &[Value::from("kb"), Value::from("down")],
        &[Value::from("a"), Value::Int(2), Value::Float(0.5), Value::Bool(true)],
    )
    .unwrap();
    assert_eq!(line, r#"3 ["kb","down","a",2,0.5,true]"#);
}

#[test]
fn watch_prints_matching_events() {
    let mut d = Dispatcher::new(Context::with_clock(FakeClock::new()));
    let printers = Printers::new(Vec::new());
    printers.watch(d.context_mut(), filter!["kb", "down"]);
    printers.watch(d.context_mut(), Filter::any());

    d.context_mut().push(event!["kb", "down", "x"]);
    d.context_mut().push(event!["mouse", "move", 1, 2, 0, 0]);
    d.drain();

    assert_eq!(
        lines(&printers),
        vec![
            r#"1 ["kb","down","x"]"#,
            r#"2 ["kb","down","x"]"#,
            r#"2 ["mouse","move",1,2,0,0]"#,
        ]
    );
}

#[test]
fn watch_timer_prints_timer_events_with_overshoot() {
    let clock = FakeClock::new();
    let mut d = Dispatcher::new(Context::with_clock(clock.clone()));
    let printers = Printers::new(Vec::new());
    printers.watch_timer(d.context_mut(), 20, true).unwrap();

    clock.set(25);
    d.poll();
    clock.set(40);
    d.poll();

    assert_eq!(
        lines(&printers),
        vec![r#"1 ["timer",1,25]"#, r#"1 ["timer",1,20]"#]
    );
}

#[test]
fn watch_timer_rejects_zero_delay() {
    let mut ctx = Context::with_clock(FakeClock::new());
    let printers = Printers::new(Vec::new());
    assert_eq!(
        printers.watch_timer(&mut ctx, 0, false),
        Err(TimerError::ZeroDelay)
    );
}
