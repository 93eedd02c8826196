// src/util/http.rs
//! HTTP client seam used to poll sensor endpoints.

use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::error::Result;
use crate::log_warn;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(1000);

/// A completed HTTP exchange, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorResponse {
    pub status: u16,
    pub body: String,
}

impl SensorResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single blocking GET. `Err` means no response was obtained
/// (refused, timed out, DNS failure, bad URL).
pub trait SensorClient {
    fn get(&self, url: &str) -> Result<SensorResponse>;
}

impl<T: SensorClient + ?Sized> SensorClient for &T {
    fn get(&self, url: &str) -> Result<SensorResponse> {
        (**self).get(url)
    }
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    /// Whole-request timeout; `None` leaves the transfer unbounded
    pub receive_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            receive_timeout: None,
        }
    }
}

/// Blocking reqwest client. Must not be built or dropped inside an async context.
#[derive(Debug, Clone)]
pub struct ReqwestSensorClient {
    client: reqwest::blocking::Client,
}

impl ReqwestSensorClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.receive_timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl SensorClient for ReqwestSensorClient {
    fn get(&self, url: &str) -> Result<SensorResponse> {
        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()?;

        let status = response.status().as_u16();
        let body = match response.text() {
            Ok(body) => body,
            Err(e) => {
                log_warn!("Failed to read response body from {}: {}", url, e);
                String::new()
            }
        };

        Ok(SensorResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(SensorResponse::new(200, "").is_success());
        assert!(SensorResponse::new(299, "").is_success());
        assert!(!SensorResponse::new(300, "").is_success());
        assert!(!SensorResponse::new(199, "").is_success());
        assert!(!SensorResponse::new(500, "").is_success());
    }

    #[test]
    fn test_default_options() {
        let options = ClientOptions::default();
        assert_eq!(options.connect_timeout, Duration::from_secs(1));
        assert!(options.receive_timeout.is_none());
    }
}
