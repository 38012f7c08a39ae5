//! Scripted HTTP transport for integration testing.
//!
//! Answers GETs from a table of `(url fragment, JSON body)` routes and
//! records every URL it was asked for, all in-memory with no network.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use sportsdesk::transport::HttpTransport;
use sportsdesk::types::SportsError;

/// A deterministic transport. Clones share routes and the call log, so a
/// test can keep one handle after giving the other to a client.
#[derive(Clone, Default)]
pub struct StubTransport {
    routes: Arc<Mutex<Vec<(String, Value)>>>,
    calls: Arc<Mutex<Vec<String>>>,
    /// If set, every request fails with this HTTP status.
    force_status: Arc<Mutex<Option<u16>>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for any URL containing `fragment`. First match wins.
    pub fn route(self, fragment: &str, body: Value) -> Self {
        self.routes.lock().unwrap().push((fragment.to_string(), body));
        self
    }

    pub fn set_status(&self, status: u16) {
        *self.force_status.lock().unwrap() = Some(status);
    }

    pub fn clear_status(&self) {
        *self.force_status.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn get_json(&self, url: &str, _headers: Vec<(String, String)>) -> Result<Value, SportsError> {
        self.calls.lock().unwrap().push(url.to_string());

        if let Some(status) = *self.force_status.lock().unwrap() {
            return Err(SportsError::Status { url: url.to_string(), status });
        }

        self.routes
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| SportsError::Status { url: url.to_string(), status: 404 })
    }
}
