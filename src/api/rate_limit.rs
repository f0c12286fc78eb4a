//! Request pacing.
//!
//! Every outbound request reserves the next free slot on a shared timeline
//! spaced `min_interval` apart, then sleeps until its slot. Reserving under
//! the lock and sleeping outside it keeps concurrent callers serialized
//! without holding the lock across an await.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum interval between consecutive requests.
#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    next_allowed: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: Mutex::new(None),
        }
    }

    /// Waits until this caller may send.
    pub async fn wait_turn(&self) {
        let now = Instant::now();
        let slot = {
            let mut next_allowed = self.next_allowed.lock();
            let slot = match *next_allowed {
                Some(next) if next > now => next,
                _ => now,
            };
            *next_allowed = Some(slot + self.min_interval);
            slot
        };

        if slot > now {
            log::trace!("Pacing: waiting {:?}", slot - now);
            tokio::time::sleep_until(slot).await;
        }
    }
}
