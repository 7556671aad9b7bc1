//! Epoch-guarded per-domain view state.
//!
//! Each domain shows exactly one of: nothing yet, loading, data, "not
//! available yet", or an error banner - independently of every other domain.
//! [`ViewSlot`] holds that state together with a monotonic epoch used to
//! discard superseded responses: when the user switches from semester A to
//! semester B while A's fetch is still in flight, A's late result must not
//! overwrite B's view. Starting a new load bumps the epoch; a publish only
//! lands while its token is still current.
//!
//! Cancellation is soft: the superseded fetch still completes and its result
//! still lands in the memo cache, it just never reaches the display state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// What a view should currently display for one domain.
#[derive(Debug)]
pub enum DomainView<T> {
    /// Nothing requested yet
    Idle,
    /// A fetch is in flight for the current selection
    Loading,
    /// Data for the current selection
    Ready(Arc<T>),
    /// The domain has no data at all ("check back later"), not an error
    Unavailable,
    /// The fetch failed; the message is already user-readable
    Failed(String),
}

impl<T> Clone for DomainView<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Ready(value) => Self::Ready(value.clone()),
            Self::Unavailable => Self::Unavailable,
            Self::Failed(message) => Self::Failed(message.clone()),
        }
    }
}

impl<T> DomainView<T> {
    /// The payload, when one is displayed.
    pub fn ready(&self) -> Option<Arc<T>> {
        match self {
            Self::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Whether a fetch for the current selection is still in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Display state for one domain plus its request epoch.
pub struct ViewSlot<T> {
    epoch: AtomicU64,
    view: RwLock<DomainView<T>>,
}

impl<T> Default for ViewSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewSlot<T> {
    pub fn new() -> Self {
        Self {
            epoch: AtomicU64::new(0),
            view: RwLock::new(DomainView::Idle),
        }
    }

    /// Start a new load: bumps the epoch, invalidating every token handed
    /// out before, and returns the token for this load.
    pub fn begin(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `token` is still the current epoch.
    pub fn is_current(&self, token: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == token
    }

    /// Publish a view if `token` is still the current epoch. Returns whether
    /// the publish landed. The token check happens under the write lock so a
    /// newer load cannot be interleaved between check and write.
    pub async fn publish(&self, token: u64, view: DomainView<T>) -> bool {
        let mut guard = self.view.write().await;
        if self.epoch.load(Ordering::SeqCst) != token {
            return false;
        }
        *guard = view;
        true
    }

    /// Snapshot of the current view.
    pub async fn get(&self) -> DomainView<T> {
        self.view.read().await.clone()
    }

    /// Back to `Idle`, invalidating in-flight tokens. Used on logout and
    /// when an exam semester change discards the event-level state.
    pub async fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        *self.view.write().await = DomainView::Idle;
    }
}
