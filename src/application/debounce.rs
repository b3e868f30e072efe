use std::time::Duration;
use tokio::time::Instant;

/// A lagged copy of a rapidly changing value.
///
/// Every `set` restarts the quiet window; the settled value only catches up
/// once `delay` has passed without another `set`.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    delay: Duration,
    settled: T,
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
        }
    }

    pub fn set(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    /// Returns the settled value, promoting the pending one if its window elapsed.
    pub fn value(&mut self) -> &T {
        self.promote(Instant::now());
        &self.settled
    }

    /// When the pending value will settle, if one is waiting.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    fn promote(&mut self, now: Instant) {
        if self
            .pending
            .as_ref()
            .is_some_and(|(_, deadline)| *deadline <= now)
            && let Some((value, _)) = self.pending.take()
        {
            self.settled = value;
        }
    }
}
