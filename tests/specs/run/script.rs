//! Replaying scripts through the dispatcher

use crate::prelude::*;

#[test]
fn catch_all_prints_every_event_in_order() {
    Project::empty()
        .moonbox()
        .args(&["run", "-"])
        .stdin("kb down a\nmouse move 1 2 0 -1\nscreen resize 640 480\n")
        .passes()
        .stdout_eq(concat!(
            "1 [\"kb\",\"down\",\"a\"]\n",
            "1 [\"mouse\",\"move\",1,2,0,-1]\n",
            "1 [\"screen\",\"resize\",640,480]\n",
        ));
}

#[test]
fn watch_prints_only_matching_events() {
    let project = Project::empty();
    project.file(
        "events.txt",
        "# keyboard only\nkb down a\nmouse move 1 2 0 0\nkb up a\n",
    );

    project
        .moonbox()
        .args(&["run", "events.txt", "--watch", "kb down", "--watch", "kb"])
        .passes()
        .stdout_eq(concat!(
            "1 [\"kb\",\"down\",\"a\"]\n",
            "2 [\"kb\",\"down\",\"a\"]\n",
            "2 [\"kb\",\"up\",\"a\"]\n",
        ));
}

#[test]
fn tokens_keep_their_types() {
    Project::empty()
        .moonbox()
        .args(&["run", "-"])
        .stdin("data 7 1.5 true \"7\" word\n")
        .passes()
        .stdout_eq("1 [\"data\",7,1.5,true,\"7\",\"word\"]\n");
}

#[test]
fn delayed_lines_keep_script_order() {
    Project::empty()
        .moonbox()
        .args(&["run", "-"])
        .stdin("first\n@30 second\nthird\n")
        .passes()
        .stdout_eq("1 [\"first\"]\n1 [\"second\"]\n1 [\"third\"]\n");
}

#[test]
fn quit_stops_before_later_lines() {
    Project::empty()
        .moonbox()
        .args(&["run", "-"])
        .stdin("before\n@20 quit\nafter\n")
        .passes()
        .stdout_eq("1 [\"before\"]\n");
}

#[test]
fn max_passes_stops_a_keep_running_loop() {
    Project::empty()
        .moonbox()
        .args(&["run", "-", "--keep-running", "--max-passes", "5"])
        .stdin("ping\n")
        .passes()
        .stdout_eq("1 [\"ping\"]\n");
}
