//! Text front end for a [`Calculator`]: token streams in, snapshots out.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use fincalc_core::{Calculator, DisplayState, KEY_REFERENCE, Key};
use tracing::{debug, warn};

use crate::logging;

/// One line of REPL input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    Help,
    /// `:log LEVEL`
    Log(&'a str),
    /// Whitespace-separated key tokens.
    Keys(&'a str),
}

impl<'a> Command<'a> {
    /// Classifies a REPL line. Anything not starting with `:` is key tokens.
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let Some(meta) = line.strip_prefix(':') else {
            return Self::Keys(line);
        };

        let (name, argument) = meta.split_once(char::is_whitespace).unwrap_or((meta, ""));
        match name {
            "q" | "quit" | "exit" => Self::Quit,
            "log" => Self::Log(argument.trim()),
            _ => Self::Help,
        }
    }
}

/// Yields the key tokens of a script, skipping `#` comment lines.
pub fn script_tokens(script: &str) -> impl Iterator<Item = &str> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(str::split_whitespace)
}

/// Plain-text snapshot: display line with mode indicator, then the registers.
pub fn format_snapshot(state: &DisplayState) -> String {
    format!(
        "{:>14} {:<2}\nN={}  I/YR={}  PV={}  PMT={}  FV={}",
        state.display, state.indicator, state.n, state.iyr, state.pv, state.pmt, state.fv
    )
}

/// A calculator plus the output options chosen on the command line.
#[derive(Debug, Default)]
pub struct Session {
    calculator: Calculator,
    json: bool,
}

impl Session {
    pub fn new(
        calculator: Calculator,
        json: bool,
    ) -> Self {
        Self { calculator, json }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Presses each token in order, skipping unknown ones.
    ///
    /// Returns the tokens that were skipped.
    pub fn press_tokens<'t>(
        &mut self,
        tokens: impl IntoIterator<Item = &'t str>,
    ) -> Vec<&'t str> {
        let mut skipped = Vec::new();
        for token in tokens {
            match Key::parse(token) {
                Ok(key) => self.calculator.press(key),
                Err(error) => {
                    warn!(%error, "skipping token");
                    skipped.push(token);
                }
            }
        }
        skipped
    }

    /// The current face, as text or JSON depending on the session mode.
    pub fn snapshot(&self) -> Result<String> {
        let state = self.calculator.render();
        if self.json {
            serde_json::to_string(&state).context("cannot serialize snapshot")
        } else {
            Ok(format_snapshot(&state))
        }
    }

    /// Writes the snapshot, followed by the key reference if `help` was pressed.
    pub fn write_snapshot(
        &self,
        mut out: impl Write,
    ) -> Result<()> {
        writeln!(out, "{}", self.snapshot()?)?;
        if self.calculator.render().help_requested {
            write!(out, "{KEY_REFERENCE}")?;
        }
        Ok(())
    }

    /// Runs the line-oriented loop until `:quit` or end of input.
    pub fn run_repl(
        &mut self,
        input: impl BufRead,
        mut out: impl Write,
    ) -> Result<()> {
        for line in input.lines() {
            let line = line.context("cannot read input")?;
            match Command::parse(&line) {
                Command::Quit => break,
                Command::Help => write!(out, "{KEY_REFERENCE}")?,
                Command::Log(level) => match logging::set_log_level(level) {
                    Ok(()) => writeln!(out, "log level set to '{level}'")?,
                    Err(error) => writeln!(out, "{error}")?,
                },
                Command::Keys("") => {}
                Command::Keys(tokens) => {
                    for token in self.press_tokens(tokens.split_whitespace()) {
                        writeln!(out, "unknown key '{token}' skipped")?;
                    }
                    self.write_snapshot(&mut out)?;
                }
            }
            out.flush()?;
        }
        debug!("repl finished");
        Ok(())
    }
}
