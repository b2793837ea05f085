//! Startup failures exit non-zero before the loop runs

use crate::prelude::*;

#[test]
fn missing_script_fails() {
    Project::empty()
        .moonbox()
        .args(&["run", "absent.txt"])
        .fails()
        .stderr_has("failed to open event source absent.txt");
}

#[test]
fn malformed_script_reports_line() {
    let project = Project::empty();
    project.file("events.txt", "kb down a\n@later kb up a\n");

    project
        .moonbox()
        .args(&["run", "events.txt"])
        .fails()
        .stderr_has("line 2: invalid delay '@later'");
}

#[test]
fn zero_timer_delay_is_rejected() {
    Project::empty()
        .moonbox()
        .args(&["run", "-", "--after", "0"])
        .stdin("")
        .fails()
        .stderr_has("invalid --after 0");
}

#[test]
fn unknown_subcommand_fails() {
    Project::empty()
        .moonbox()
        .args(&["serve"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn bad_watch_filter_fails() {
    Project::empty()
        .moonbox()
        .args(&["run", "-", "--watch", "\"kb"])
        .stdin("")
        .fails()
        .stderr_has("invalid --watch");
}
