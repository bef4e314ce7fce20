use crate::core::{PairAddress, Reserves};
use crate::services::ReserveSource;
use dashmap::DashMap;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

/// Result of a reserve lookup. Never an error: fetch failures become `Unavailable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveLookup {
    Available(Reserves),
    /// No pair address to look up (assets not both selected, or no pool).
    NoPair,
    /// The pair exists but its reserves could not be read.
    Unavailable,
}

impl ReserveLookup {
    pub fn reserves(&self) -> Option<&Reserves> {
        match self {
            ReserveLookup::Available(reserves) => Some(reserves),
            _ => None,
        }
    }
}

#[derive(Clone)]
struct CacheEntry {
    reserves: Reserves,
    stored_at: Instant,
}

struct Poller {
    pair: PairAddress,
    handle: JoinHandle<()>,
}

/// Reserve cache keyed by pair address.
///
/// Fetches are serialized per address: concurrent callers for the same pair
/// share one network read. The per-address lock lives only while someone
/// holds or waits on it. Every stored fetch gets a new version number,
/// published on [`ReserveRepository::subscribe`].
pub struct ReserveRepository {
    source: Arc<dyn ReserveSource>,
    cache: DashMap<PairAddress, CacheEntry>,
    inflight: DashMap<PairAddress, Arc<AsyncMutex<()>>>,
    next_version: AtomicU64,
    version_tx: watch::Sender<u64>,
    poller: Mutex<Option<Poller>>,
}

impl ReserveRepository {
    pub fn new(source: Arc<dyn ReserveSource>) -> Self {
        let (version_tx, _) = watch::channel(0);
        Self {
            source,
            cache: DashMap::new(),
            inflight: DashMap::new(),
            next_version: AtomicU64::new(0),
            version_tx,
            poller: Mutex::new(None),
        }
    }

    /// Reserves for `pair`, served from cache when younger than `max_age`.
    pub async fn get_reserves(&self, pair: Option<&PairAddress>, max_age: Duration) -> ReserveLookup {
        let Some(pair) = pair else {
            return ReserveLookup::NoPair;
        };

        if let Some(entry) = self.cache.get(pair) {
            if entry.stored_at.elapsed() < max_age {
                return ReserveLookup::Available(entry.reserves.clone());
            }
        }

        self.load(pair, max_age).await
    }

    /// Bypass the cache. A fetch already in flight for `pair` is joined, not repeated.
    pub async fn refresh(&self, pair: &PairAddress) -> ReserveLookup {
        self.load(pair, Duration::ZERO).await
    }

    /// Last stored reserves regardless of age.
    pub fn cached(&self, pair: &PairAddress) -> Option<Reserves> {
        self.cache.get(pair).map(|entry| entry.reserves.clone())
    }

    pub fn invalidate(&self, pair: &PairAddress) {
        self.cache.remove(pair);
        self.prune_lock(pair);
    }

    pub fn latest_version(&self) -> u64 {
        *self.version_tx.borrow()
    }

    /// Receives the version of every newly stored fetch.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version_tx.subscribe()
    }

    fn lock_for(&self, pair: &PairAddress) -> Arc<AsyncMutex<()>> {
        self.inflight
            .entry(pair.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    fn release(&self, pair: &PairAddress, lock: Arc<AsyncMutex<()>>) {
        drop(lock);
        self.prune_lock(pair);
    }

    // Only the map itself still references an idle lock
    fn prune_lock(&self, pair: &PairAddress) {
        self.inflight.remove_if(pair, |_, lock| Arc::strong_count(lock) == 1);
    }

    async fn load(&self, pair: &PairAddress, max_age: Duration) -> ReserveLookup {
        let requested_at = Instant::now();
        let lock = self.lock_for(pair);
        let lookup = {
            let _guard = lock.lock().await;
            self.load_locked(pair, requested_at, max_age).await
        };
        self.release(pair, lock);
        lookup
    }

    async fn load_locked(
        &self,
        pair: &PairAddress,
        requested_at: Instant,
        max_age: Duration,
    ) -> ReserveLookup {
        // Another caller may have completed a fetch while we waited
        if let Some(entry) = self.cache.get(pair) {
            if entry.stored_at >= requested_at || entry.stored_at.elapsed() < max_age {
                return ReserveLookup::Available(entry.reserves.clone());
            }
        }

        self.fetch_and_store(pair).await
    }

    async fn fetch_and_store(&self, pair: &PairAddress) -> ReserveLookup {
        match self.source.fetch_reserves(pair).await {
            Ok((reserve_0, reserve_1)) => {
                let version = self.next_version.fetch_add(1, Ordering::SeqCst) + 1;
                let reserves = Reserves::new(reserve_0, reserve_1, version);
                debug!(
                    "Reserves for {}: ({}, {}) v{}",
                    pair, reserve_0, reserve_1, version
                );

                self.cache.insert(
                    pair.clone(),
                    CacheEntry {
                        reserves: reserves.clone(),
                        stored_at: Instant::now(),
                    },
                );
                self.version_tx.send_replace(version);

                ReserveLookup::Available(reserves)
            }
            Err(e) => {
                warn!("Failed to fetch reserves for {}: {}", pair, e);
                ReserveLookup::Unavailable
            }
        }
    }

    /// One polling tick. Returns `None` when a fetch for `pair` is already running.
    pub async fn poll_once(&self, pair: &PairAddress) -> Option<ReserveLookup> {
        let lock = self.lock_for(pair);
        let lookup = match lock.try_lock() {
            Ok(_guard) => Some(self.fetch_and_store(pair).await),
            Err(_) => {
                debug!("Reserve fetch for {} already in flight, skipping tick", pair);
                None
            }
        };
        self.release(pair, lock);
        lookup
    }

    /// Poll `pair` every `interval` until [`stop`](Self::stop) or another `start`.
    pub fn start(self: &Arc<Self>, pair: PairAddress, interval: Duration) {
        self.stop();

        let repository = Arc::downgrade(self);
        let polled = pair.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let Some(repository) = repository.upgrade() else {
                    break;
                };
                repository.poll_once(&polled).await;
            }
        });

        info!("Polling reserves for {} every {:?}", pair, interval);
        if let Ok(mut poller) = self.poller.lock() {
            *poller = Some(Poller { pair, handle });
        }
    }

    pub fn stop(&self) {
        let previous = match self.poller.lock() {
            Ok(mut poller) => poller.take(),
            Err(_) => None,
        };

        if let Some(previous) = previous {
            previous.handle.abort();
            info!("Stopped polling reserves for {}", previous.pair);
        }
    }

    pub fn polled_pair(&self) -> Option<PairAddress> {
        self.poller
            .lock()
            .ok()
            .and_then(|poller| poller.as_ref().map(|p| p.pair.clone()))
    }
}

impl Drop for ReserveRepository {
    fn drop(&mut self) {
        self.stop();
    }
}
