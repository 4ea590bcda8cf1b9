//! Trailing-edge debounce owned by its caller's instance state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Trailing-edge debouncer
///
/// Every call takes a ticket from a monotonic counter; the ticket holding the
/// latest number is the single pending slot. A call survives only if no newer
/// ticket was issued during its quiet window, so a burst of calls spaced closer
/// than the window lets exactly one (the last) through.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    latest: AtomicU64,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, latest: AtomicU64::new(0) }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Issue a new ticket, superseding whatever is pending
    pub fn supersede(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True while no newer ticket has been issued
    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    /// Wait out the quiet window for `ticket`
    ///
    /// Returns false when a newer call arrived in the meantime.
    pub async fn settle(&self, ticket: u64) -> bool {
        if !self.window.is_zero() {
            tokio::time::sleep(self.window).await;
        }
        self.is_current(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_lone_call_settles() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let ticket = debouncer.supersede();
        assert!(debouncer.settle(ticket).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_call_supersedes_pending() {
        let debouncer = Debouncer::new(Duration::from_millis(500));

        let first = async {
            let ticket = debouncer.supersede();
            debouncer.settle(ticket).await
        };
        let second = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let ticket = debouncer.supersede();
            debouncer.settle(ticket).await
        };

        let (first, second) = tokio::join!(first, second);
        assert!(!first);
        assert!(second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_outside_window_both_settle() {
        let debouncer = Debouncer::new(Duration::from_millis(500));

        let first = debouncer.supersede();
        assert!(debouncer.settle(first).await);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = debouncer.supersede();
        assert!(debouncer.settle(second).await);
        assert!(!debouncer.is_current(first));
    }
}
