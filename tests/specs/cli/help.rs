//! Help and version output

use crate::prelude::*;

#[test]
fn help_lists_run_command() {
    Project::empty()
        .moonbox()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("--config");
}

#[test]
fn run_help_lists_printer_flags() {
    Project::empty()
        .moonbox()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--watch")
        .stdout_has("--after")
        .stdout_has("--every")
        .stdout_has("--keep-running");
}

#[test]
fn version_is_reported() {
    Project::empty()
        .moonbox()
        .args(&["--version"])
        .passes()
        .stdout_has("moonbox");
}
