//! Browser-like HTTP session with periodic re-bootstrap and response caching.
//!
//! NSE only answers API calls that carry cookies minted by a prior visit to
//! its home page, and those cookies go stale quickly. [`Session`] keeps one
//! warmed-up client context alive, replaces it once `refresh_interval` has
//! elapsed, and sits a URL-keyed [`ResponseCache`] in front of it.

pub mod base;
pub mod browser;
pub mod cache;

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng;

use crate::config::SessionConfig;
use crate::errors::Result;
use crate::models::response::Response;

pub use base::{Connector, Transport};
pub use browser::{BrowserConnector, HeaderSet};
pub use cache::ResponseCache;

struct SessionHandle {
    transport: Box<dyn Transport>,
    created_at: Instant,
    generation: u64,
}

pub struct Session {
    config: SessionConfig,
    cache: Arc<ResponseCache>,
    connector: Box<dyn Connector>,
    handle: SessionHandle,
}

impl Session {
    /// Creates a session backed by a real browser-emulating client.
    pub fn new(config: SessionConfig, cache: Arc<ResponseCache>) -> Result<Self> {
        Self::with_connector(config, cache, Box::new(BrowserConnector::new()))
    }

    /// Creates a session over a custom connector. The first client context
    /// is established immediately.
    pub fn with_connector(
        config: SessionConfig,
        cache: Arc<ResponseCache>,
        connector: Box<dyn Connector>,
    ) -> Result<Self> {
        let transport = connector.connect(&config)?;
        debug!("Session created (refresh every {:?})", config.refresh_interval);

        Ok(Self {
            config,
            cache,
            connector,
            handle: SessionHandle {
                transport,
                created_at: Instant::now(),
                generation: 1,
            },
        })
    }

    /// Replaces the client context with a freshly warmed-up one.
    /// The response cache is left untouched.
    pub fn create(&mut self) -> Result<()> {
        let transport = self.connector.connect(&self.config)?;
        self.handle = SessionHandle {
            transport,
            created_at: Instant::now(),
            generation: self.handle.generation + 1,
        };
        Ok(())
    }

    /// Fetches `url`, serving from the cache when an entry younger than
    /// `cache_timeout` exists.
    ///
    /// On a miss the session is refreshed if it has expired, a short random
    /// delay is inserted, and the network response is cached before being
    /// returned. Errors from the transport are passed through as-is.
    pub fn fetch(&mut self, url: &str) -> Result<Arc<Response>> {
        if let Some(resp) = self.cache.get_fresh(url, self.config.cache_timeout) {
            return Ok(resp);
        }

        if self.handle.created_at.elapsed() >= self.config.refresh_interval {
            info!("Session expired after {:?}, re-initialising", self.handle.created_at.elapsed());
            self.create()?;
        }

        self.wait_for_jitter();

        let resp = Arc::new(self.handle.transport.get(url)?);
        self.cache.insert(url, resp.clone());
        Ok(resp)
    }

    /// Clears the whole cache, including entries stored by other sessions
    /// sharing it.
    pub fn flush(&self) {
        self.cache.flush();
    }

    // Random courtesy delay in [0, max_jitter) before hitting the network
    fn wait_for_jitter(&self) {
        let max_micros = self.config.max_jitter.as_micros() as u64;
        if max_micros == 0 {
            return;
        }
        let delay = Duration::from_micros(rand::thread_rng().gen_range(0..max_micros));
        debug!("Adding random delay of {:?}", delay);
        std::thread::sleep(delay);
    }

    /// Identity of the current client context; bumps on every `create`.
    pub fn generation(&self) -> u64 {
        self.handle.generation
    }

    pub fn created_at(&self) -> Instant {
        self.handle.created_at
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }
}
