// src/sync.rs

//! Sync engine and refresh lifecycle.
//!
//! The engine owns the authoritative in-memory snapshot of problem
//! records and site metadata. A sync cycle fetches both feeds, retries
//! transient failures with linear backoff, and swaps the held state as
//! a unit. Consumers only ever see a complete snapshot, never a
//! half-updated one.
//!
//! `sync()` serializes through an async mutex: the periodic timer, an
//! external trigger, and a manual call may all fire at once, and the
//! guard keeps a slow earlier cycle from clobbering a newer one.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, Notify, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::SyncConfig;
use crate::error::Result;
use crate::feed::{FeedFetcher, FeedPayload, parse_metadata, parse_problems};
use crate::models::{ProblemRecord, SiteMetadata};

/// Read-only view of the held archive state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchiveSnapshot {
    pub records: Vec<ProblemRecord>,
    pub metadata: SiteMetadata,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

/// Internal held state. Mutated solely by the engine.
#[derive(Default)]
struct ArchiveState {
    records: Vec<ProblemRecord>,
    metadata: SiteMetadata,
    is_loading: bool,
    last_error: Option<String>,
    /// True only after at least one non-empty parse succeeded.
    /// Fallback content does not count as data.
    has_data: bool,
}

/// Maintains the authoritative archive snapshot.
pub struct SyncEngine {
    config: SyncConfig,
    fetcher: Arc<dyn FeedFetcher>,
    state: RwLock<ArchiveState>,
    /// Single-flight guard for overlapping sync calls.
    gate: Mutex<()>,
}

impl SyncEngine {
    pub fn new(config: SyncConfig, fetcher: Arc<dyn FeedFetcher>) -> Arc<Self> {
        Arc::new(Self {
            config,
            fetcher,
            state: RwLock::new(ArchiveState {
                is_loading: true,
                ..ArchiveState::default()
            }),
            gate: Mutex::new(()),
        })
    }

    /// Clone out the current snapshot.
    pub async fn snapshot(&self) -> ArchiveSnapshot {
        let state = self.state.read().await;
        ArchiveSnapshot {
            records: state.records.clone(),
            metadata: state.metadata.clone(),
            is_loading: state.is_loading,
            last_error: state.last_error.clone(),
        }
    }

    /// Run one full sync cycle: fetch both feeds with retries, parse,
    /// and swap the held state. Errors are held in the snapshot rather
    /// than returned; the loading flag is always cleared on the way out.
    pub async fn sync(&self) {
        let _flight = self.gate.lock().await;

        self.state.write().await.is_loading = true;

        match self.fetch_with_retry().await {
            Ok(payload) => self.apply_payload(payload).await,
            Err(error) => self.apply_terminal_failure(&error.to_string()).await,
        }
    }

    /// Fetch both feeds, retrying transient failures.
    ///
    /// Backoff is linear: attempt N waits N x backoff_base_ms before
    /// the next try (1s then 2s with defaults), not a doubling series.
    async fn fetch_with_retry(&self) -> Result<FeedPayload> {
        let mut attempt: u32 = 1;
        loop {
            match self.fetcher.fetch_feeds().await {
                Ok(payload) => return Ok(payload),
                Err(error) => {
                    log::warn!("Fetch attempt {attempt} failed: {error}");
                    if attempt >= self.config.max_attempts {
                        return Err(error);
                    }
                    let delay =
                        Duration::from_millis(u64::from(attempt) * self.config.backoff_base_ms);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Parse a fetched payload and swap the held state.
    ///
    /// An empty parsed record set is a no-op on held data: a blank or
    /// truncated feed must not blank a previously good view.
    async fn apply_payload(&self, payload: FeedPayload) {
        let parsed = parse_problems(&payload.problems_csv)
            .and_then(|records| Ok((records, parse_metadata(&payload.metadata_csv)?)));

        let mut state = self.state.write().await;
        match parsed {
            Ok((records, metadata)) if !records.is_empty() => {
                log::info!("Sync complete: {} records", records.len());
                state.records = records;
                state.metadata = metadata;
                state.has_data = true;
                state.last_error = None;
            }
            Ok(_) => {
                log::warn!("Feed parsed to zero valid records; keeping held data");
            }
            Err(error) => {
                log::error!("Feed parse failed: {error}");
                if !state.has_data {
                    state.last_error = Some(format!("Error parsing archive data: {error}"));
                }
            }
        }
        state.is_loading = false;
    }

    /// All attempts failed. Keep good data if any exists; otherwise
    /// install the hardcoded fallback so consumers never face an empty
    /// state.
    async fn apply_terminal_failure(&self, reason: &str) {
        let mut state = self.state.write().await;
        if state.has_data {
            state.last_error = Some(format!(
                "Archive connection failed ({reason}). Showing cached data; sync again to retry."
            ));
        } else {
            state.last_error = Some(format!(
                "Archive connection failed ({reason}). Using local fallback."
            ));
            state.records = vec![ProblemRecord::fallback()];
            state.metadata = SiteMetadata::fallback();
        }
        state.is_loading = false;
    }
}

/// Owns the background refresh task around a `SyncEngine`.
///
/// Resources are acquired at `start` and released at `shutdown`: the
/// task performs an initial sync, re-syncs every refresh interval
/// unconditionally, and re-syncs on every `trigger()` call (the
/// equivalent of the consuming application regaining focus).
pub struct SyncService {
    engine: Arc<SyncEngine>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl SyncService {
    /// Spawn the refresh loop.
    pub fn start(engine: Arc<SyncEngine>, refresh_interval: Duration) -> Self {
        let refresh = Arc::new(Notify::new());
        let task = tokio::spawn(run_refresh_loop(
            Arc::clone(&engine),
            Arc::clone(&refresh),
            refresh_interval,
        ));
        Self {
            engine,
            refresh,
            task,
        }
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    /// Request an out-of-band sync (focus regained, manual retry).
    pub fn trigger(&self) {
        self.refresh.notify_one();
    }

    /// Stop the refresh loop. In-flight work is cancelled at the next
    /// await point; the held snapshot stays readable.
    pub async fn shutdown(self) {
        self.task.abort();
        let _ = self.task.await;
    }
}

async fn run_refresh_loop(engine: Arc<SyncEngine>, refresh: Arc<Notify>, period: Duration) {
    engine.sync().await;

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick resolves immediately; the initial sync already ran.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => engine.sync().await,
            _ = refresh.notified() => engine.sync().await,
        }
    }
}
