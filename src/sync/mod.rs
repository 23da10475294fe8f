//! List acquisition and synchronization.
//!
//! A load fetches the index, fans out one detail fetch per entry, and joins
//! them all before anything is committed. Per-item failures stay inside the
//! item; only a failed index fetch fails the whole load.
//!
//! [`ListSynchronizer`] owns the collection state of one record kind and
//! enforces single-in-flight supersession: starting a load cancels the
//! previous one, and a load whose token was cancelled never commits.

pub mod detail;
pub mod index;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{FolioError, Result};
use crate::record::Detail;
use crate::remote::{ContentApi, Routes, cancellable};

pub use detail::fetch_detail;
pub use index::{IndexEntry, extract_entries};

/// An index entry with the outcome of its detail fetch.
///
/// `detail` set: loaded. `error` set: the fetch or validation failed.
/// Neither set: the fetch was cancelled and the item is still pending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub entry: IndexEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Detail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Which of the three per-item states an [`EnrichedItem`] is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Ready,
    Failed,
    Pending,
}

impl EnrichedItem {
    /// Merge one detail outcome into its entry.
    pub fn settle(entry: IndexEntry, outcome: Result<Detail>) -> Self {
        match outcome {
            Ok(detail) => Self {
                entry,
                detail: Some(detail),
                error: None,
            },
            Err(FolioError::Cancelled) => Self {
                entry,
                detail: None,
                error: None,
            },
            Err(e) => Self {
                entry,
                detail: None,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn status(&self) -> ItemStatus {
        match (&self.detail, &self.error) {
            (Some(_), _) => ItemStatus::Ready,
            (None, Some(_)) => ItemStatus::Failed,
            (None, None) => ItemStatus::Pending,
        }
    }

    pub fn pathname(&self) -> &str {
        &self.entry.pathname
    }
}

/// Client-side state of one record kind's collection
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CollectionState {
    #[default]
    Unloaded,
    Loading,
    Loaded(Vec<EnrichedItem>),
    Failed(String),
}

impl CollectionState {
    pub fn items(&self) -> &[EnrichedItem] {
        match self {
            CollectionState::Loaded(items) => items,
            _ => &[],
        }
    }
}

/// Fetch the index and enrich every entry with its detail.
///
/// Detail fetches run concurrently and are all awaited; none of them can fail
/// the load. Item order follows the index. If the token fires while details
/// are in flight, the affected items come back pending.
pub async fn load<A: ContentApi>(
    api: &A,
    routes: &Routes,
    token: &CancellationToken,
) -> Result<Vec<EnrichedItem>> {
    let body = match cancellable(token, api.get_json(&routes.list_url())).await {
        Ok(body) => body,
        Err(FolioError::SchemaInvalid(reason)) => {
            tracing::warn!(kind = %routes.kind(), "index response unreadable, treating as empty: {reason}");
            serde_json::Value::Null
        }
        Err(e) => return Err(e),
    };
    let entries = extract_entries(&body);

    let outcomes = join_all(
        entries
            .iter()
            .map(|entry| fetch_detail(api, routes, &entry.url, token)),
    )
    .await;

    let items: Vec<EnrichedItem> = entries
        .into_iter()
        .zip(outcomes)
        .map(|(entry, outcome)| {
            if let Err(e) = &outcome
                && !e.is_cancelled()
            {
                tracing::warn!(pathname = %entry.pathname, "detail fetch failed: {e}");
            }
            EnrichedItem::settle(entry, outcome)
        })
        .collect();

    Ok(items)
}

struct InFlight {
    generation: u64,
    token: CancellationToken,
    /// State to restore if this load is aborted rather than superseded
    restore: CollectionState,
}

/// Owns the collection state for one record kind.
pub struct ListSynchronizer<A> {
    api: Arc<A>,
    routes: Routes,
    lifetime: CancellationToken,
    state: RwLock<CollectionState>,
    in_flight: Mutex<Option<InFlight>>,
    next_generation: AtomicU64,
}

impl<A: ContentApi> ListSynchronizer<A> {
    /// `lifetime` is the owning view's token; cancelling it aborts every load.
    pub fn new(api: Arc<A>, routes: Routes, lifetime: CancellationToken) -> Self {
        Self {
            api,
            routes,
            lifetime,
            state: RwLock::new(CollectionState::Unloaded),
            in_flight: Mutex::new(None),
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn state(&self) -> CollectionState {
        self.state.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Find a loaded item by pathname.
    pub fn find(&self, pathname: &str) -> Option<EnrichedItem> {
        self.state
            .read()
            .items()
            .iter()
            .find(|item| item.pathname() == pathname)
            .cloned()
    }

    /// Start a load, superseding any load already in flight.
    ///
    /// Resolves to `Ok` once the loaded collection is committed, to the load
    /// error once `Failed` is committed, and to `FolioError::Cancelled` when
    /// the load was superseded or aborted and committed nothing.
    pub async fn reload(&self) -> Result<()> {
        let (generation, token) = self.begin();
        let mut guard = LoadGuard {
            sync: self,
            generation,
            armed: true,
        };

        let result = load(self.api.as_ref(), &self.routes, &token).await;
        guard.disarm();

        let mut in_flight = self.in_flight.lock();
        let Some(finished) = in_flight.take_if(|f| f.generation == generation) else {
            tracing::debug!(kind = %self.routes.kind(), generation, "superseded load discarded");
            return Err(FolioError::Cancelled);
        };

        let mut state = self.state.write();
        match result {
            _ if token.is_cancelled() => {
                *state = finished.restore;
                tracing::debug!(kind = %self.routes.kind(), generation, "aborted load discarded");
                Err(FolioError::Cancelled)
            }
            Err(FolioError::Cancelled) => {
                *state = finished.restore;
                Err(FolioError::Cancelled)
            }
            Ok(items) => {
                tracing::info!(kind = %self.routes.kind(), count = items.len(), "collection loaded");
                *state = CollectionState::Loaded(items);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(kind = %self.routes.kind(), "collection load failed: {e}");
                *state = CollectionState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let mut in_flight = self.in_flight.lock();
        let mut state = self.state.write();

        let restore = match in_flight.take() {
            Some(previous) => {
                previous.token.cancel();
                previous.restore
            }
            None => state.clone(),
        };

        if !matches!(*state, CollectionState::Loaded(_)) {
            *state = CollectionState::Loading;
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let token = self.lifetime.child_token();
        *in_flight = Some(InFlight {
            generation,
            token: token.clone(),
            restore,
        });
        (generation, token)
    }

    /// Cancel the load in flight, if any. Its state change is rolled back.
    pub fn abort(&self) {
        if let Some(current) = self.in_flight.lock().as_ref() {
            current.token.cancel();
        }
    }
}

/// Rolls back a load whose `reload` future is dropped before it commits.
struct LoadGuard<'a, A> {
    sync: &'a ListSynchronizer<A>,
    generation: u64,
    armed: bool,
}

impl<A> LoadGuard<'_, A> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<A> Drop for LoadGuard<'_, A> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut in_flight = self.sync.in_flight.lock();
        if let Some(abandoned) = in_flight.take_if(|f| f.generation == self.generation) {
            abandoned.token.cancel();
            *self.sync.state.write() = abandoned.restore;
            tracing::debug!(
                kind = %self.sync.routes.kind(),
                generation = self.generation,
                "dropped load rolled back"
            );
        }
    }
}
