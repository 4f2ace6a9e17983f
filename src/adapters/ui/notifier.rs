//! Implements NotifierPort. Notices are queued and printed as coloured alert lines
//! by the menu loop, between prompts.
//!
//! Background exports notify while a prompt is on screen; writing straight to stdout
//! then would tear the prompt.

use crate::domain::Notice;
use crate::ports::NotifierPort;
use crossterm::QueueableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Terminal alerts. Errors in red, confirmations in green.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    queued: Mutex<Vec<Notice>>,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices not yet printed, oldest first.
    pub fn take_pending(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.queued.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Print and clear every queued notice.
    pub fn flush_to(&self, out: &mut impl Write) -> io::Result<()> {
        for notice in self.take_pending() {
            write_notice(out, &notice)?;
        }
        out.flush()
    }
}

fn write_notice(out: &mut impl Write, notice: &Notice) -> io::Result<()> {
    let (color, marker) = if notice.is_error() {
        (Color::Red, "✖")
    } else {
        (Color::Green, "✔")
    };
    out.queue(SetForegroundColor(color))?
        .queue(Print(format!("{} {}\r\n", marker, notice.message())))?
        .queue(ResetColor)?;
    Ok(())
}

impl NotifierPort for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        self.queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_notices_wait_for_flush() {
        let notifier = TerminalNotifier::new();
        notifier.notify(Notice::ReportFailed);
        notifier.notify(Notice::ReportSaved(PathBuf::from("out/report.pdf")));

        let mut out = Vec::new();
        notifier.flush_to(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);

        let failed = text.find("Could not download the report").unwrap();
        let saved = text.find("Report saved to out/report.pdf").unwrap();
        assert!(failed < saved);
        assert!(text.contains('✖'));
        assert!(text.contains('✔'));
    }

    #[test]
    fn test_flush_clears_queue() {
        let notifier = TerminalNotifier::new();
        notifier.notify(Notice::MissingInput);
        notifier.flush_to(&mut Vec::new()).unwrap();

        assert!(notifier.take_pending().is_empty());
        let mut out = Vec::new();
        notifier.flush_to(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
