//! Result cache for the check algorithm.
//!
//! Live checks are expensive (DNS, TLS handshakes, policy fetches) and the
//! same domain may be checked by several validators within one window.
//! `CachedChecker` reuses a result until its TTL expires. It is safe to
//! share between concurrent checks; two concurrent misses for the same key
//! both reach the inner checker and the later insert wins.
//!
//! Expired entries are swept on insert, at most once per TTL, so keys that
//! are never looked up again do not accumulate.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::config::DEFAULT_CACHE_TTL_SECS;
use crate::domain::{CheckResult, CheckTarget};
use crate::ports::DomainChecker;

type CacheKey = (String, CheckTarget);

struct CachedEntry {
    stored_at: Instant,
    result: CheckResult,
}

struct CacheState {
    entries: HashMap<CacheKey, CachedEntry>,
    last_sweep: Instant,
}

impl CacheState {
    fn sweep(&mut self, ttl: Duration, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.stored_at) < ttl);
        self.last_sweep = now;
        before - self.entries.len()
    }
}

/// Cache statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that reached the inner checker.
    pub misses: u64,
    /// Entries currently held (fresh or not yet purged).
    pub entries: usize,
}

/// TTL cache in front of a [`DomainChecker`].
pub struct CachedChecker {
    inner: Arc<dyn DomainChecker>,
    ttl: Duration,
    state: Mutex<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedChecker {
    /// Cache results of `inner` for `ttl`. A zero TTL disables reuse.
    pub fn new(inner: Arc<dyn DomainChecker>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache with the default one-hour TTL.
    pub fn with_default_ttl(inner: Arc<dyn DomainChecker>) -> Self {
        Self::new(inner, Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.state.lock().sweep(self.ttl, Instant::now())
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.state.lock().entries.len(),
        }
    }

    fn lookup(&self, key: &CacheKey) -> Option<CheckResult> {
        let mut state = self.state.lock();
        match state.entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.result.clone()),
            Some(_) => {
                state.entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn store(&self, key: CacheKey, result: CheckResult) {
        let now = Instant::now();
        let mut state = self.state.lock();
        if now.duration_since(state.last_sweep) >= self.ttl {
            let evicted = state.sweep(self.ttl, now);
            if evicted > 0 {
                debug!(evicted, "Expired check results evicted");
            }
        }
        state.entries.insert(
            key,
            CachedEntry {
                stored_at: now,
                result,
            },
        );
    }
}

#[async_trait]
impl DomainChecker for CachedChecker {
    async fn check_domain(&self, domain: &str, target: &CheckTarget) -> CheckResult {
        let key = (domain.to_string(), target.clone());

        if let Some(result) = self.lookup(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(domain = %domain, "Check result served from cache");
            return result;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = self.inner.check_domain(domain, target).await;
        if !self.ttl.is_zero() {
            self.store(key, result.clone());
        }
        result
    }
}
