#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nsetools::config::SessionConfig;
use nsetools::errors::{NseError, Result};
use nsetools::models::response::Response;
use nsetools::session::{Connector, ResponseCache, Session, Transport};

/// Counters shared between a fake connector, its transports and the test.
#[derive(Default)]
pub struct Calls {
    pub connects: AtomicUsize,
    pub gets: AtomicUsize,
    pub urls: Mutex<Vec<String>>,
}

impl Calls {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

/// Serves canned bodies by exact URL; unknown URLs fail like a 404 would.
#[derive(Clone, Default)]
pub struct FakeConnector {
    routes: Arc<HashMap<String, Vec<u8>>>,
    pub calls: Arc<Calls>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_routes(routes: Vec<(&str, Vec<u8>)>) -> Self {
        let routes = routes.into_iter().map(|(u, b)| (u.to_string(), b)).collect();
        Self {
            routes: Arc::new(routes),
            calls: Arc::new(Calls::default()),
        }
    }
}

impl Connector for FakeConnector {
    fn connect(&self, _config: &SessionConfig) -> Result<Box<dyn Transport>> {
        let generation = self.calls.connects.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Box::new(FakeTransport {
            routes: self.routes.clone(),
            calls: self.calls.clone(),
            generation,
        }))
    }
}

struct FakeTransport {
    routes: Arc<HashMap<String, Vec<u8>>>,
    calls: Arc<Calls>,
    generation: usize,
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<Response> {
        let n = self.calls.gets.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls.urls.lock().unwrap().push(url.to_string());

        if url.ends_with("/fail") {
            return Err(NseError::Unknown(format!("404 for {}", url)));
        }
        let body = match self.routes.get(url) {
            Some(body) => body.clone(),
            None if self.routes.is_empty() => {
                format!("{} gen={} call={}", url, self.generation, n).into_bytes()
            }
            None => return Err(NseError::Unknown(format!("404 for {}", url))),
        };
        Ok(Response::new(url, 200, None, body))
    }
}

pub fn test_config() -> SessionConfig {
    SessionConfig::new()
        .with_refresh_interval(Duration::from_secs(60))
        .with_cache_timeout(Duration::from_secs(20))
        .with_max_jitter(Duration::from_millis(2))
}

pub fn session_with(connector: &FakeConnector, config: SessionConfig) -> Session {
    Session::with_connector(config, Arc::new(ResponseCache::new()), Box::new(connector.clone()))
        .expect("fake connector never fails")
}
