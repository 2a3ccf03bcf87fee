use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::{Duration, Instant};

use log::debug;

use crate::models::response::Response;

// Process-wide cache handed to every session that asks for the shared one
static SHARED: OnceLock<Arc<ResponseCache>> = OnceLock::new();

struct CacheEntry {
    stored_at: Instant,
    response: Arc<Response>,
}

/// URL-keyed response cache.
///
/// The cache is deliberately not tied to any one session: sessions that
/// share a handle share entries, and a session refresh leaves it intact.
/// Keys are the exact request URL, with no cookie or session component, so
/// an entry fetched under one cookie generation can be served after a
/// refresh.
///
/// Stale entries are never evicted: `get_fresh` only skips them and a
/// later fetch overwrites them, so the map grows with every distinct URL.
/// Call [`ResponseCache::flush`] after bulk downloads such as
/// `BhavcopyDownloader::download_range`, which would otherwise keep every
/// archive body alive for the life of the process.
#[derive(Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide instance, created on first use.
    pub fn shared() -> Arc<ResponseCache> {
        SHARED.get_or_init(|| Arc::new(ResponseCache::new())).clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // a poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the entry for `url` if it was stored less than `max_age` ago.
    pub fn get_fresh(&self, url: &str, max_age: Duration) -> Option<Arc<Response>> {
        let entries = self.lock();
        let entry = entries.get(url)?;
        let age = entry.stored_at.elapsed();
        if age < max_age {
            debug!("Serving {} from cache (age {:?})", url, age);
            Some(entry.response.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, url: &str, response: Arc<Response>) {
        self.lock().insert(
            url.to_string(),
            CacheEntry {
                stored_at: Instant::now(),
                response,
            },
        );
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every entry, for all sessions using this cache.
    pub fn flush(&self) {
        let mut entries = self.lock();
        debug!("Flushing {} cached responses", entries.len());
        entries.clear();
    }
}
