//! Query resolution: cache first, then one shared fetch per key
//!
//! [`QueryOrchestrator`] owns the cache and the fetcher. Views hold a
//! [`QuerySubscription`] each, which turns resolutions into a stream of
//! [`QueryState`] updates.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{LogicalQuery, QueryKey, QueryState};
use crate::cache::CacheStore;
use crate::data::{ErrorInfo, RecipeFetcher, RecipePayload};

/// A fetch that any number of callers can await
type SharedFetch = Shared<BoxFuture<'static, Result<RecipePayload, ErrorInfo>>>;

/// Whether a load may be answered from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Serve a cached entry if one exists
    CacheFirst,
    /// Skip the cache for this attempt; a success overwrites the entry
    Refresh,
}

struct Inner {
    cache: Arc<dyn CacheStore>,
    fetcher: Arc<dyn RecipeFetcher>,
    /// Outstanding fetches, at most one per key
    in_flight: Mutex<HashMap<QueryKey, SharedFetch>>,
}

/// Resolves logical queries through the cache and the fetcher
///
/// Cloning is cheap; clones share the cache, fetcher and in-flight table.
#[derive(Clone)]
pub struct QueryOrchestrator {
    inner: Arc<Inner>,
}

impl QueryOrchestrator {
    pub fn new(cache: Arc<dyn CacheStore>, fetcher: Arc<dyn RecipeFetcher>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cache,
                fetcher,
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Resolved state for `query` if its tier holds an entry
    pub fn cached(&self, query: &LogicalQuery) -> Option<QueryState> {
        let key = query.key();
        match self.inner.cache.get(&key, query.tier()) {
            Some(entry) => {
                debug!(%key, tier = %entry.tier, "cache hit");
                Some(QueryState::from_payload(entry.payload))
            }
            None => {
                debug!(%key, "cache miss");
                None
            }
        }
    }

    /// Resolves `query` to a settled state
    ///
    /// Never returns `Idle` or `Loading`.
    pub async fn load(&self, query: &LogicalQuery, mode: LoadMode) -> QueryState {
        if mode == LoadMode::CacheFirst {
            if let Some(state) = self.cached(query) {
                return state;
            }
        }
        QueryState::from_outcome(self.fetch_shared(query).await)
    }

    /// Number of fetches currently outstanding
    pub fn in_flight_count(&self) -> usize {
        self.lock_in_flight().len()
    }

    /// Creates a new subscription in the `Idle` state
    pub fn subscribe(&self) -> QuerySubscription {
        QuerySubscription::new(self.clone())
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, SharedFetch>> {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the outstanding fetch for `query`'s key, starting one if needed
    ///
    /// The fetch writes non-empty successes to the cache and removes itself
    /// from the in-flight table when it completes. Failures and empty
    /// results are never cached.
    fn fetch_shared(&self, query: &LogicalQuery) -> SharedFetch {
        let key = query.key();
        let mut in_flight = self.lock_in_flight();

        if let Some(existing) = in_flight.get(&key) {
            debug!(%key, "joining in-flight fetch");
            return existing.clone();
        }

        let inner = Arc::clone(&self.inner);
        let query = query.clone();
        let fetch_key = key.clone();
        let fetch = async move {
            let outcome = inner.fetcher.fetch(&query).await;
            match &outcome {
                Ok(payload) if payload.is_empty() => {
                    debug!(key = %fetch_key, "empty result, not cached");
                }
                Ok(payload) => {
                    debug!(key = %fetch_key, items = payload.len(), "caching result");
                    inner.cache.set(&fetch_key, payload, query.tier());
                }
                Err(e) => {
                    warn!(key = %fetch_key, error = %e, "fetch failed");
                }
            }
            inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&fetch_key);
            outcome
        }
        .boxed()
        .shared();

        debug!(%key, "starting fetch");
        in_flight.insert(key, fetch.clone());
        fetch
    }
}

/// State shared between a subscription and its background resolutions
struct SubscriptionShared {
    state: watch::Sender<QueryState>,
    /// Bumped on every resolve/retry; only the latest attempt may publish
    generation: AtomicU64,
    /// Set once the owning view is gone
    closed: AtomicBool,
}

impl SubscriptionShared {
    /// Starts a new attempt and publishes its first state
    fn begin(&self, state: QueryState) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|current| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *current = state;
        });
        generation
    }

    /// Publishes a settled state unless the attempt was superseded
    fn settle(&self, generation: u64, state: QueryState) -> bool {
        self.state.send_if_modified(|current| {
            if self.closed.load(Ordering::SeqCst)
                || self.generation.load(Ordering::SeqCst) != generation
            {
                return false;
            }
            *current = state;
            true
        })
    }
}

/// One view's live view of a query
///
/// Starts `Idle`. [`resolve`](Self::resolve) answers from the cache
/// immediately when possible; otherwise it moves to `Loading` and settles
/// in the background. Must be used from within a Tokio runtime.
///
/// Dropping the subscription lets an outstanding fetch finish, so its result
/// still reaches the cache, but nothing more is published.
pub struct QuerySubscription {
    orchestrator: QueryOrchestrator,
    shared: Arc<SubscriptionShared>,
    query: Option<LogicalQuery>,
}

impl QuerySubscription {
    fn new(orchestrator: QueryOrchestrator) -> Self {
        let (state, _) = watch::channel(QueryState::idle());
        Self {
            orchestrator,
            shared: Arc::new(SubscriptionShared {
                state,
                generation: AtomicU64::new(0),
                closed: AtomicBool::new(false),
            }),
            query: None,
        }
    }

    /// Resolves `query`, superseding whatever this subscription showed before
    pub fn resolve(&mut self, query: LogicalQuery) {
        self.query = Some(query.clone());
        match self.orchestrator.cached(&query) {
            Some(state) => {
                self.shared.begin(state);
            }
            None => self.fetch(query),
        }
    }

    /// Re-resolves the last query, bypassing the cache
    ///
    /// Returns `false` if nothing has been resolved yet.
    pub fn retry(&mut self) -> bool {
        match self.query.clone() {
            Some(query) => {
                debug!(key = %query.key(), "retrying");
                self.fetch(query);
                true
            }
            None => false,
        }
    }

    fn fetch(&self, query: LogicalQuery) {
        let generation = self.shared.begin(QueryState::loading());
        let fetch = self.orchestrator.fetch_shared(&query);
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let state = QueryState::from_outcome(fetch.await);
            if !shared.settle(generation, state) {
                debug!(key = %query.key(), "dropping superseded result");
            }
        });
    }

    /// The last resolved query, used by retry
    pub fn query(&self) -> Option<&LogicalQuery> {
        self.query.as_ref()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> QueryState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that observes every published state
    pub fn watch(&self) -> watch::Receiver<QueryState> {
        self.shared.state.subscribe()
    }

    /// Waits until the current attempt is no longer loading
    pub async fn settled(&self) -> QueryState {
        let mut receiver = self.watch();
        let settled = receiver.wait_for(|state| !state.is_loading()).await;
        match settled {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        // Taken under the channel lock so a racing settle sees it.
        self.shared.state.send_if_modified(|_| {
            self.shared.closed.store(true, Ordering::SeqCst);
            false
        });
    }
}
