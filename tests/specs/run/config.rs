//! Engine configuration file and logging

use crate::prelude::*;

#[test]
fn config_max_passes_bounds_the_run() {
    let project = Project::empty();
    project.file(
        "moonbox.toml",
        "min_iteration = \"2ms\"\nmax_passes = 3\nexit_when_idle = false\n",
    );

    project
        .moonbox()
        .args(&["--config", "moonbox.toml", "run", "-", "--every", "1000"])
        .stdin("")
        .passes()
        .stdout_eq("");
}

#[test]
fn unknown_config_key_is_rejected() {
    let project = Project::empty();
    project.file("moonbox.toml", "max_pases = 3\n");

    project
        .moonbox()
        .args(&["--config", "moonbox.toml", "run", "-"])
        .stdin("")
        .fails()
        .stderr_has("invalid config");
}

#[test]
fn missing_config_file_is_reported() {
    Project::empty()
        .moonbox()
        .args(&["--config", "nope.toml", "run", "-"])
        .stdin("")
        .fails()
        .stderr_has("nope.toml");
}

#[test]
fn log_file_receives_debug_output() {
    let project = Project::empty();

    project
        .moonbox()
        .env("RUST_LOG", "debug")
        .args(&["--log-file", "logs/moonbox.log", "run", "-"])
        .stdin("kb down a\n")
        .passes()
        .stdout_eq("1 [\"kb\",\"down\",\"a\"]\n");

    let log = std::fs::read_to_string(project.path("logs/moonbox.log")).unwrap();
    assert!(log.contains("attached event source"), "{}", log);
}
