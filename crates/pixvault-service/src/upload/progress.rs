//! Upload progress reporting.

use tokio::sync::watch;

/// Highest percentage reported while bytes are still in flight.
const IN_FLIGHT_CEILING: u8 = 99;

/// Publishes upload progress as a percentage.
///
/// Values never decrease, and 100 is only published by [`complete`] once
/// the record has been committed. Receivers that fall behind only see the
/// latest value.
///
/// [`complete`]: ProgressTracker::complete
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    tx: watch::Sender<u8>,
}

impl ProgressTracker {
    /// Create a tracker and a receiver observing it.
    pub fn new() -> (Self, watch::Receiver<u8>) {
        let (tx, rx) = watch::channel(0);
        (Self { tx }, rx)
    }

    /// A tracker nobody listens to.
    pub fn detached() -> Self {
        Self::new().0
    }

    /// Record `transferred` of `total` bytes.
    pub fn advance(&self, transferred: u64, total: u64) {
        let percent = if total == 0 {
            0
        } else {
            (transferred.saturating_mul(100) / total).min(u64::from(IN_FLIGHT_CEILING)) as u8
        };
        self.raise_to(percent);
    }

    /// Mark the upload as fully committed.
    pub fn complete(&self) {
        self.raise_to(100);
    }

    /// The last published value.
    pub fn current(&self) -> u8 {
        *self.tx.borrow()
    }

    fn raise_to(&self, percent: u8) {
        self.tx.send_if_modified(|current| {
            if percent > *current {
                *current = percent;
                true
            } else {
                false
            }
        });
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::detached()
    }
}
