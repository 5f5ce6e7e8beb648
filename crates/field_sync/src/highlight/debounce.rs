use core::time::Duration;
use tokio::time::Instant;

/// Single-slot debouncer: only the most recent value scheduled inside the
/// quiet window survives to fire.
#[derive(Debug)]
pub struct Debouncer<T> {
    /// Quiet period between the last request and its firing.
    window: Duration,
    /// The surviving request and when it becomes due.
    pending: Option<(T, Instant)>,
    /// Number of requests replaced before they fired.
    superseded_count: u64,
}

impl<T> Debouncer<T> {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            superseded_count: 0,
        }
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Replace any pending value with `value`, due one window after `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        if self.pending.replace((value, now + self.window)).is_some() {
            self.superseded_count = self.superseded_count.saturating_add(1);
        }
    }

    /// Take the pending value if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    /// Drop the pending value. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub const fn superseded(&self) -> u64 {
        self.superseded_count
    }
}
