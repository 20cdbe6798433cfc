//! Per-sport TTL cache over the raw provider payload.
//!
//! Fetch-through: a fresh entry is served as-is; a missing or expired entry
//! triggers one provider fetch. Entries are replaced wholesale on refresh,
//! never mutated in place, so concurrent readers always see a consistent
//! payload.
//!
//! Concurrency note: the provider fetch happens outside the lock, so two
//! concurrent misses for the same sport each issue their own fetch and the
//! last writer wins. That duplicates a request at worst; it never corrupts
//! the cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::QuoteSource;
use crate::types::{AnalysisError, RawGame, Sport};

/// How long a fetched payload stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct CacheEntry {
    payload: Arc<Vec<RawGame>>,
    fetched_at: Instant,
}

/// A cache read: the raw games plus how old the underlying fetch is.
#[derive(Debug)]
pub struct CachedQuotes {
    pub games: Arc<Vec<RawGame>>,
    pub age_secs: u64,
}

pub struct QuoteCache {
    source: Arc<dyn QuoteSource>,
    ttl: Duration,
    entries: RwLock<HashMap<Sport, CacheEntry>>,
}

impl QuoteCache {
    pub fn new(source: Arc<dyn QuoteSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the raw payload for `sport`, fetching from the provider if the
    /// cached entry is missing or stale.
    ///
    /// A failed fetch surfaces as `ProviderUnavailable` and leaves whatever
    /// entry was already cached untouched.
    pub async fn get(&self, sport: Sport) -> Result<CachedQuotes, AnalysisError> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&sport) {
                let age = entry.fetched_at.elapsed();
                if age < self.ttl {
                    debug!(sport = %sport, age_secs = age.as_secs(), "Serving cached odds");
                    return Ok(CachedQuotes {
                        games: Arc::clone(&entry.payload),
                        age_secs: age.as_secs(),
                    });
                }
            }
        }

        info!(sport = %sport, "Refreshing odds from provider");
        let games = self.source.fetch(sport).await.map_err(|e| {
            warn!(sport = %sport, error = %e, "Provider fetch failed");
            AnalysisError::ProviderUnavailable(e.to_string())
        })?;

        let payload = Arc::new(games);
        let mut entries = self.entries.write().await;
        entries.insert(
            sport,
            CacheEntry {
                payload: Arc::clone(&payload),
                fetched_at: Instant::now(),
            },
        );

        Ok(CachedQuotes {
            games: payload,
            age_secs: 0,
        })
    }

    /// Drop the cached entry for `sport`; the next `get` will fetch.
    pub async fn invalidate(&self, sport: Sport) {
        self.entries.write().await.remove(&sport);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
