// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted event source
//!
//! One event per line, `[@MS] token...`, or the single word `quit`.
//! `#` starts a comment outside quotes. A line with `@MS` is held back until
//! the clock reaches MS, and every later line waits behind it.

use moonbox_core::{Clock, EventSource, Event, Input, ResourceError, Value};
use std::collections::VecDeque;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;

/// Where the script text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOrigin {
    Stdin,
    File(PathBuf),
}

impl ScriptOrigin {
    /// `-` means stdin
    pub fn from_arg(arg: Option<PathBuf>) -> Self {
        match arg {
            Some(path) if path.as_os_str() != "-" => ScriptOrigin::File(path),
            _ => ScriptOrigin::Stdin,
        }
    }

    fn name(&self) -> String {
        match self {
            ScriptOrigin::Stdin => "stdin".to_string(),
            ScriptOrigin::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> std::io::Result<String> {
        match self {
            ScriptOrigin::Stdin => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
            ScriptOrigin::File(path) => std::fs::read_to_string(path),
        }
    }
}

/// One parsed script line
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    /// Earliest tick at which the line is delivered
    pub at: Option<u64>,
    pub input: Input,
}

/// A script line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Split a line into values
///
/// Tokens are `true`/`false`, integers, floats, double-quoted strings
/// (with `\"`, `\\`, `\n` and `\t` escapes), and anything else as a bare
/// string.
pub fn tokenize(line: &str) -> Result<Vec<Value>, String> {
    let mut values = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.peek() {
            None | Some('#') => break,
            Some('"') => {
                chars.next();
                values.push(Value::Str(quoted(&mut chars)?));
            }
            Some(_) => {
                let mut word = String::new();
                while let Some(c) = chars.next_if(|c| !c.is_whitespace() && *c != '#') {
                    word.push(c);
                }
                values.push(bare(&word));
            }
        }
    }
    Ok(values)
}

fn quoted(chars: &mut impl Iterator<Item = char>) -> Result<String, String> {
    let mut text = String::new();
    loop {
        match chars.next() {
            None => return Err("unterminated string".to_string()),
            Some('"') => return Ok(text),
            Some('\\') => match chars.next() {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some(c) => text.push(c),
                None => return Err("unterminated string".to_string()),
            },
            Some(c) => text.push(c),
        }
    }
}

fn bare(word: &str) -> Value {
    match word {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = word.parse::<i64>() {
        return Value::Int(n);
    }
    // f64 parsing also accepts words like "inf" and "nan"
    let numeric = word.chars().any(|c| c.is_ascii_digit())
        && word.chars().all(|c| c.is_ascii_digit() || "+-.eE".contains(c));
    if numeric {
        if let Ok(x) = word.parse::<f64>() {
            return Value::Float(x);
        }
    }
    Value::Str(word.to_string())
}

/// Parse one line; blank and comment-only lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<ScriptLine>, String> {
    let trimmed = line.trim_start();
    let (at, rest) = match trimmed.strip_prefix('@') {
        Some(timed) => {
            let end = timed.find(char::is_whitespace).unwrap_or(timed.len());
            let (delay, rest) = timed.split_at(end);
            let at = delay
                .parse::<u64>()
                .map_err(|_| format!("invalid delay '@{}'", delay))?;
            (Some(at), rest)
        }
        None => (None, trimmed),
    };

    let values = tokenize(rest)?;
    if values.is_empty() {
        return match at {
            Some(_) => Err("missing event after delay".to_string()),
            None => Ok(None),
        };
    }

    let input = if values == [Value::from("quit")] {
        Input::Quit
    } else {
        Input::Event(Event::new(values))
    };
    Ok(Some(ScriptLine { at, input }))
}

/// Parse a whole script, reporting the first bad line
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>, ParseError> {
    let mut lines = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let parsed = parse_line(line).map_err(|message| ParseError {
            line: index + 1,
            message,
        })?;
        lines.extend(parsed);
    }
    Ok(lines)
}

/// Event source replaying a script against a clock
pub struct ScriptSource<C> {
    origin: ScriptOrigin,
    clock: C,
    pending: VecDeque<ScriptLine>,
}

impl<C: Clock> ScriptSource<C> {
    pub fn new(origin: ScriptOrigin, clock: C) -> Self {
        Self {
            origin,
            clock,
            pending: VecDeque::new(),
        }
    }

    /// Lines not yet delivered
    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl<C: Clock> EventSource for ScriptSource<C> {
    fn name(&self) -> &str {
        match &self.origin {
            ScriptOrigin::Stdin => "stdin",
            ScriptOrigin::File(_) => "script",
        }
    }

    fn open(&mut self) -> Result<(), ResourceError> {
        let name = self.origin.name();
        let text = self.origin.read().map_err(|source| ResourceError::Open {
            name: name.clone(),
            source,
        })?;
        let lines = parse_script(&text).map_err(|e| ResourceError::Unavailable {
            name,
            reason: e.to_string(),
        })?;
        tracing::debug!(lines = lines.len(), "loaded script");
        self.pending = lines.into();
        Ok(())
    }

    fn poll(&mut self) -> Vec<Input> {
        let now = self.clock.ticks();
        let mut due = Vec::new();
        while let Some(line) = self.pending.front() {
            if line.at.is_some_and(|at| at > now) {
                break;
            }
            if let Some(line) = self.pending.pop_front() {
                due.push(line.input);
            }
        }
        due
    }

    fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
