use crate::config::SessionConfig;
use crate::errors::Result;
use crate::models::response::Response;

/// A live HTTP client context (headers, cookie jar, connection pool).
pub trait Transport: Send {
    /// Issue a GET for `url`. Transport failures and non-success statuses
    /// are returned as errors, never retried.
    fn get(&self, url: &str) -> Result<Response>;
}

/// Factory for transports. Every call yields a fresh client context that has
/// already completed whatever warm-up the upstream site requires.
pub trait Connector: Send + Sync {
    fn connect(&self, config: &SessionConfig) -> Result<Box<dyn Transport>>;
}
