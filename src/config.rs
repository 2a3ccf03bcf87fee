use std::time::Duration;

use crate::nse::urls;

/// Session tuning knobs. All values are plain constructor parameters.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub refresh_interval: Duration,
    pub cache_timeout: Duration,
    pub max_jitter: Duration,
    pub request_timeout: Duration,
    pub home_url: String,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
            cache_timeout: Duration::from_secs(20),
            max_jitter: Duration::from_millis(300),
            request_timeout: Duration::from_secs(30),
            home_url: urls::NSE_HOME.to_string(),
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    /// Upper bound (exclusive) of the random delay before each network fetch.
    /// Zero disables the delay.
    pub fn with_max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter = jitter;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_home_url(mut self, url: &str) -> Self {
        self.home_url = url.to_string();
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
