use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT,
};

use crate::config::SessionConfig;
use crate::errors::Result;
use crate::models::response::Response;
use crate::session::base::{Connector, Transport};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";

/// Fixed request headers that make the client look like a desktop browser
/// issuing XHR calls. NSE rejects most requests without them.
#[derive(Debug, Clone)]
pub struct HeaderSet(HeaderMap);

impl HeaderSet {
    pub fn browser() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        Self(headers)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn header_map(&self) -> &HeaderMap {
        &self.0
    }
}

impl Default for HeaderSet {
    fn default() -> Self {
        Self::browser()
    }
}

/// Builds cookie-carrying reqwest clients primed against the NSE home page.
#[derive(Debug, Clone, Default)]
pub struct BrowserConnector {
    headers: HeaderSet,
}

impl BrowserConnector {
    pub fn new() -> Self {
        Self {
            headers: HeaderSet::browser(),
        }
    }

    pub fn with_headers(headers: HeaderSet) -> Self {
        Self { headers }
    }
}

impl Connector for BrowserConnector {
    fn connect(&self, config: &SessionConfig) -> Result<Box<dyn Transport>> {
        let client = Client::builder()
            .default_headers(self.headers.header_map().clone())
            .cookie_store(true)
            .gzip(true)
            .timeout(config.request_timeout)
            .build()?;

        // warm-up: the home page sets the cookies the API endpoints check
        let resp = client.get(&config.home_url).send()?;
        debug!("Warm-up request to {} returned {}", config.home_url, resp.status());

        Ok(Box::new(BrowserTransport { client }))
    }
}

pub struct BrowserTransport {
    client: Client,
}

impl Transport for BrowserTransport {
    fn get(&self, url: &str) -> Result<Response> {
        let resp = self.client.get(url).send()?.error_for_status()?;

        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes()?.to_vec();

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(Response::new(&final_url, status, content_type, body))
    }
}
