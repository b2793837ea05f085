//! Shared helpers for CLI specs

use assert_cmd::Command;
use std::path::PathBuf;
use std::process::Output;
use tempfile::TempDir;

/// Scratch directory the CLI runs in
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Write a file relative to the project root
    pub fn file(&self, name: &str, content: &str) -> &Self {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
        self
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn moonbox(&self) -> Cli {
        let mut cmd = Command::cargo_bin("moonbox").unwrap();
        cmd.current_dir(self.dir.path()).env_remove("RUST_LOG");
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    pub fn passes(mut self) -> Run {
        let output = self.cmd.timeout(std::time::Duration::from_secs(10)).output().unwrap();
        let run = Run { output };
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\nstderr:\n{}",
            run.output.status,
            run.stderr()
        );
        run
    }

    pub fn fails(mut self) -> Run {
        let output = self.cmd.timeout(std::time::Duration::from_secs(10)).output().unwrap();
        let run = Run { output };
        assert!(
            !run.output.status.success(),
            "expected failure\nstdout:\n{}",
            run.stdout()
        );
        run
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout missing {:?}:\n{}", needle, stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr missing {:?}:\n{}", needle, stderr);
        self
    }

    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout().lines().map(str::to_string).collect()
    }
}
