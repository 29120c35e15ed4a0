use std::io::{self, Write};

use rulelint_core::FindingSink;
use rulelint_core::models::{Diagnostic, RunStatus, ValidationFinding};

pub(crate) const FATAL_EXIT_STATUS: u8 = 2;

pub(crate) const fn exit_status(status: RunStatus) -> u8 {
    match status {
        RunStatus::Clean => 0,
        RunStatus::MissingMetrics => 1,
        RunStatus::Incomplete => 3,
    }
}

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Writes one line per finding or diagnostic to the given stream.
#[derive(Debug)]
pub(super) struct LineSink<W> {
    out: W,
}

impl<W: Write> LineSink<W> {
    pub(super) const fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub(super) fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            log::warn!("failed to write output line: {err}");
        }
    }
}

impl<W: Write> FindingSink for LineSink<W> {
    fn finding(&mut self, finding: &ValidationFinding) {
        self.line(&finding.to_string());
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.line(&diagnostic.to_string());
    }
}
