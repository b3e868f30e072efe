use crate::domain::notification::Notification;
use crate::domain::ports::Notifier;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Prints each notification as one line on a writer.
pub struct TerminalNotifier<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Notifier for TerminalNotifier<W> {
    fn notify(&self, notification: Notification) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{notification}") {
            tracing::warn!(error = %e, "failed to write notification");
        }
    }
}
