//! Scripted in-memory [`HttpFetch`] for unit tests.

use crate::fetch::{Fetched, HeadInfo, HttpFetch};
use crate::types::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone)]
enum Reply {
    Fail,
    Head { status: u16, len: Option<u64> },
    Get { status: u16, body: Vec<u8> },
}

/// Answers requests from a fixed script. Unscripted requests fail.
#[derive(Default)]
pub struct ScriptedFetcher {
    heads: HashMap<String, Reply>,
    gets: HashMap<String, Reply>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    log: Mutex<Vec<(&'static str, String)>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.get(url, 200, html.as_bytes().to_vec())
    }

    pub fn head(mut self, url: &str, status: u16, len: Option<u64>) -> Self {
        self.heads
            .insert(url.to_string(), Reply::Head { status, len });
        self
    }

    pub fn head_fails(mut self, url: &str) -> Self {
        self.heads.insert(url.to_string(), Reply::Fail);
        self
    }

    pub fn get(mut self, url: &str, status: u16, body: Vec<u8>) -> Self {
        self.gets.insert(url.to_string(), Reply::Get { status, body });
        self
    }

    /// Highest number of requests observed in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of requests issued with `method` to `url`.
    pub fn count(&self, method: &str, url: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, u)| *m == method && u == url)
            .count()
    }

    /// Every request issued, in issue order.
    pub fn requests(&self) -> Vec<(&'static str, String)> {
        self.log.lock().unwrap().clone()
    }

    async fn enter(&self, method: &'static str, url: &str) {
        self.log.lock().unwrap().push((method, url.to_string()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpFetch for ScriptedFetcher {
    async fn head(&self, url: &str) -> Result<HeadInfo, FetchError> {
        self.enter("HEAD", url).await;
        match self.heads.get(url) {
            Some(Reply::Head { status, len }) => Ok(HeadInfo {
                status: *status,
                content_length: *len,
            }),
            _ => Err(FetchError::Request(format!("connection refused: {url}"))),
        }
    }

    async fn get(&self, url: &str) -> Result<Fetched, FetchError> {
        self.enter("GET", url).await;
        match self.gets.get(url) {
            Some(Reply::Get { status, body }) => Ok(Fetched {
                status: *status,
                final_url: url.to_string(),
                body: body.clone(),
            }),
            _ => Err(FetchError::Request(format!("connection refused: {url}"))),
        }
    }
}
