use crate::api::ItemIdentity;
use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use std::time::Duration;

pub const DEFAULT_REMOVAL_GRACE_MS: u64 = 1000;

#[cfg(not(target_arch = "wasm32"))]
pub(crate) async fn delay_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[cfg(target_arch = "wasm32")]
pub(crate) async fn delay_ms(ms: u64) {
    gloo_timers::future::TimeoutFuture::new(ms.min(u64::from(u32::MAX)) as u32).await;
}

/// A confirmed deletion waiting out its grace period before the item
/// leaves the list.
#[derive(Debug)]
pub struct PendingRemoval {
    identity: ItemIdentity,
    grace: Duration,
    handle: AbortHandle,
    registration: AbortRegistration,
}

/// Cancels a [`PendingRemoval`] from wherever the view is torn down.
#[derive(Debug, Clone)]
pub struct RemovalCanceller(AbortHandle);

impl RemovalCanceller {
    pub fn cancel(&self) {
        self.0.abort();
    }
}

impl PendingRemoval {
    pub fn arm(identity: ItemIdentity, grace: Duration) -> Self {
        let (handle, registration) = AbortHandle::new_pair();
        Self {
            identity,
            grace,
            handle,
            registration,
        }
    }

    pub fn identity(&self) -> &ItemIdentity {
        &self.identity
    }

    pub fn canceller(&self) -> RemovalCanceller {
        RemovalCanceller(self.handle.clone())
    }

    /// Resolves to the identity to remove once the grace period is over,
    /// or `None` if it was cancelled first.
    pub async fn elapsed(self) -> Option<ItemIdentity> {
        let ms = u64::try_from(self.grace.as_millis()).unwrap_or(u64::MAX);
        match Abortable::new(delay_ms(ms), self.registration).await {
            Ok(()) => Some(self.identity),
            Err(_) => {
                tracing::debug!(identity = ?self.identity, "pending removal cancelled");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn resolves_after_grace_period() {
        let removal = PendingRemoval::arm(ItemIdentity::Pin(4), Duration::from_millis(30));
        let started = Instant::now();

        assert_eq!(removal.elapsed().await, Some(ItemIdentity::Pin(4)));
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn cancelled_before_waiting_never_fires() {
        let removal = PendingRemoval::arm(ItemIdentity::Pin(4), Duration::from_secs(60));
        removal.canceller().cancel();
        assert_eq!(removal.elapsed().await, None);
    }

    #[tokio::test]
    async fn cancelled_while_waiting_stops_early() {
        let removal = PendingRemoval::arm(ItemIdentity::Pin(4), Duration::from_secs(60));
        let canceller = removal.canceller();
        let started = Instant::now();

        let (result, ()) = tokio::join!(removal.elapsed(), async {
            delay_ms(10).await;
            canceller.cancel();
        });

        assert_eq!(result, None);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
