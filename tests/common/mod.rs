//! Common test utilities for fanout-http

use async_trait::async_trait;
use fanout_http::{FanoutError, HttpRequest, HttpResponse, Logger, Result, Sleeper, Transport};
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::error::Error;
use std::sync::Mutex;
use std::time::Duration;

/// One canned answer of a [`ScriptedTransport`]
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, &'static str),
    Json(serde_json::Value),
    ConnectionError,
}

impl Reply {
    fn into_response(self) -> Result<HttpResponse> {
        match self {
            Reply::Status(code, body) => Ok(HttpResponse::from_bytes(
                StatusCode::from_u16(code).expect("valid status"),
                body,
            )),
            Reply::Json(value) => Ok(HttpResponse::from_bytes(
                StatusCode::OK,
                serde_json::to_vec(&value).expect("serializable"),
            )),
            Reply::ConnectionError => Err(FanoutError::transport("connection refused")),
        }
    }
}

/// Plays back a queue of replies per URL; the last reply repeats forever
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, url: &str, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), replies.into());
        self
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url.to_string();
        *self.calls.lock().unwrap().entry(url.clone()).or_insert(0) += 1;

        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts
                .get_mut(&url)
                .unwrap_or_else(|| panic!("no script for {}", url));
            if queue.len() > 1 {
                queue.pop_front().expect("non-empty")
            } else {
                queue.front().cloned().expect("script must not be empty")
            }
        };

        reply.into_response()
    }
}

/// Records sleeps without waiting
#[derive(Default)]
pub struct CountingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl CountingSleeper {
    pub fn count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }
}

#[async_trait]
impl Sleeper for CountingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

#[derive(Default)]
pub struct CapturingLogger {
    pub warnings: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl Logger for CapturingLogger {
    fn log_warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn log_error(&self, error: &dyn Error, message: &str) {
        self.errors
            .lock()
            .unwrap()
            .push(format!("{}: {}", message, error));
    }
}

pub fn url(id: usize) -> String {
    format!("http://catalog.local/releases/{}", id)
}
