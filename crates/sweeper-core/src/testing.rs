//! Test doubles shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{FetchError, SinkError};
use crate::ports::{BulkDelete, ContentFetcher};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - chrono::TimeDelta::days(days)
}

/// Fetcher with canned responses. Unknown keys are `NotFound`.
#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, Result<Bytes, FetchError>>,
    panic_on: HashSet<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, key: &str, bytes: impl Into<Bytes>) -> Self {
        self.responses.insert(key.to_string(), Ok(bytes.into()));
        self
    }

    pub fn with_error(mut self, key: &str, message: &str) -> Self {
        self.responses.insert(
            key.to_string(),
            Err(FetchError::Transport {
                key: key.to_string(),
                message: message.to_string(),
            }),
        );
        self
    }

    pub fn panicking_on(mut self, key: &str) -> Self {
        self.panic_on.insert(key.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentFetcher for StubFetcher {
    async fn fetch(&self, key: &str) -> Result<Bytes, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_on.contains(key) {
            panic!("fetcher exploded on {key}");
        }
        self.responses.get(key).cloned().unwrap_or_else(|| {
            Err(FetchError::NotFound {
                key: key.to_string(),
            })
        })
    }
}

/// Records every bulk-delete call; the calls listed in `fail_calls` (0-based) fail.
#[derive(Default)]
pub struct RecordingDelete {
    calls: Mutex<Vec<Vec<String>>>,
    fail_calls: HashSet<usize>,
}

impl RecordingDelete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_call(mut self, index: usize) -> Self {
        self.fail_calls.insert(index);
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BulkDelete for RecordingDelete {
    async fn delete_many(&self, keys: &[String]) -> Result<usize, SinkError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(keys.to_vec());
            calls.len() - 1
        };
        if self.fail_calls.contains(&index) {
            return Err(SinkError::Transport(format!("call {index} refused")));
        }
        Ok(keys.len())
    }
}
