use serde::de::DeserializeOwned;

use crate::errors::Result;

/// Fully buffered HTTP response.
///
/// The body is read eagerly so that one response can be handed out from the
/// cache any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(url: &str, status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.to_string(),
            status,
            content_type,
            body,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
