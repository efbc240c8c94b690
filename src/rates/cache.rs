//! Time-to-live cache in front of a rate provider
//!
//! Key is the requested window, value is the fetched series plus the time it
//! was fetched. Every lookup first evicts all entries past the TTL, so windows
//! that are never requested again do not linger.
//! Failed fetches are never cached.

use super::clock::{Clock, SystemClock};
use super::provider::RateProvider;
use super::{DateWindow, RateSeries};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Mutex;

pub const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct CacheEntry {
    series: RateSeries,
    fetched_at: DateTime<Utc>,
}

/// Caching wrapper around any `RateProvider`
pub struct CachedRateProvider<P, C = SystemClock> {
    inner: P,
    clock: C,
    ttl: Duration,
    entries: Mutex<HashMap<DateWindow, CacheEntry>>,
}

impl<P: RateProvider> CachedRateProvider<P, SystemClock> {
    pub fn new(inner: P) -> Self {
        Self::with_clock(inner, SystemClock, Duration::seconds(DEFAULT_CACHE_TTL_SECS))
    }
}

impl<P: RateProvider, C: Clock> CachedRateProvider<P, C> {
    pub fn with_clock(inner: P, clock: C, ttl: Duration) -> Self {
        Self {
            inner,
            clock,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of entries currently held (expired ones included until the next fetch)
    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(_) => {
                warn!("Rate cache lock poisoned; reporting it as empty");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) {
        match self.entries.lock() {
            Ok(mut entries) => entries.clear(),
            Err(_) => warn!("Rate cache lock poisoned; clear skipped"),
        }
    }

    fn lookup(&self, window: &DateWindow) -> Option<RateSeries> {
        let now = self.clock.now();
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(_) => {
                warn!("Rate cache lock poisoned; fetching {} uncached", window);
                return None;
            }
        };

        let before = entries.len();
        entries.retain(|_, entry| now - entry.fetched_at < self.ttl);
        if entries.len() < before {
            debug!("Evicted {} expired rate cache entries", before - entries.len());
        }

        match entries.get(window) {
            Some(entry) => {
                debug!("Rate cache hit for {}", window);
                Some(entry.series.clone())
            }
            None => {
                debug!("Rate cache miss for {}", window);
                None
            }
        }
    }

    fn store(&self, window: DateWindow, series: RateSeries) {
        let entry = CacheEntry {
            series,
            fetched_at: self.clock.now(),
        };
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(window, entry);
            }
            Err(_) => warn!("Rate cache lock poisoned; series for {} not stored", window),
        }
    }
}

#[async_trait]
impl<P: RateProvider, C: Clock> RateProvider for CachedRateProvider<P, C> {
    fn id(&self) -> &'static str {
        self.inner.id()
    }

    async fn fetch_rates(&self, window: &DateWindow) -> Result<RateSeries> {
        if let Some(series) = self.lookup(window) {
            return Ok(series);
        }

        let series = self.inner.fetch_rates(window).await?;
        self.store(*window, series.clone());
        Ok(series)
    }
}
