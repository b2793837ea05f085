//! Timer printers

use crate::prelude::*;

#[test]
fn after_fires_once_then_loop_goes_idle() {
    let run = Project::empty()
        .moonbox()
        .args(&["run", "-", "--after", "20"])
        .stdin("")
        .passes();

    let lines = run.stdout_lines();
    assert_eq!(lines.len(), 1, "{:?}", lines);
    assert!(lines[0].starts_with("1 [\"timer\",1,"), "{}", lines[0]);
}

#[test]
fn every_keeps_firing_until_max_passes() {
    let run = Project::empty()
        .moonbox()
        .args(&["run", "-", "--every", "5", "--max-passes", "200"])
        .stdin("")
        .passes();

    let lines = run.stdout_lines();
    assert!(lines.len() >= 2, "{:?}", lines);
    assert!(lines.iter().all(|l| l.starts_with("1 [\"timer\",1,")));
}

#[test]
fn timer_printers_register_after_watches() {
    let run = Project::empty()
        .moonbox()
        .args(&["run", "-", "--watch", "kb", "--after", "10"])
        .stdin("kb down a\n")
        .passes();

    let lines = run.stdout_lines();
    assert_eq!(lines[0], "1 [\"kb\",\"down\",\"a\"]");
    assert!(lines[1].starts_with("2 [\"timer\",1,"), "{}", lines[1]);
}
