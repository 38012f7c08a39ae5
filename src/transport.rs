//! HTTP transport.
//!
//! Providers never touch the network directly; they build URLs and hand
//! them to an `HttpTransport`. Tests swap in a stub to count and script
//! upstream calls.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::types::SportsError;

/// A single GET-JSON capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url` with extra headers and decode the body as JSON.
    ///
    /// Non-2xx responses are errors.
    async fn get_json(&self, url: &str, headers: Vec<(String, String)>) -> Result<Value, SportsError>;
}

/// `reqwest`-backed transport used outside tests.
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build sports HTTP client")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, url: &str, headers: Vec<(String, String)>) -> Result<Value, SportsError> {
        debug!(url = %url, "GET");

        let mut req = self.http.get(url);
        for (name, value) in &headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req.send().await.map_err(|source| SportsError::Http {
            url: url.to_string(),
            source,
        })?;

        if !resp.status().is_success() {
            return Err(SportsError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.json::<Value>().await.map_err(|source| SportsError::Http {
            url: url.to_string(),
            source,
        })
    }
}
