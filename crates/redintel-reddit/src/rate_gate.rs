//! Shared fixed-interval admission gate for outbound source calls.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Serializes outbound-call admission so that all holders together never
/// exceed one call per `interval`.
///
/// One instance is shared across every concurrent category worker; it is the
/// only cross-worker shared mutable state in the pipeline. A zero interval
/// disables pacing.
#[derive(Debug)]
pub struct RateGate {
    interval: Duration,
    next_admission: Mutex<Instant>,
}

impl RateGate {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_admission: Mutex::new(Instant::now()),
        }
    }

    /// Waits until the next admission slot, then claims it.
    ///
    /// Callers waiting concurrently are admitted one interval apart in lock
    /// acquisition order.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }
        let mut next = self.next_admission.lock().await;
        let now = Instant::now();
        if *next > now {
            let wait = *next - now;
            *next += self.interval;
            drop(next);
            tokio::time::sleep(wait).await;
        } else {
            *next = now + self.interval;
        }
    }
}
