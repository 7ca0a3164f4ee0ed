//! HTTP capability used by the audit pipeline.
//!
//! [`HttpFetch`] is the seam between the pipeline and the network.
//! [`ReqwestFetcher`] is the production implementation: plain HTTP with
//! redirects and timeouts, no JavaScript and no retries.

use crate::types::{AuditConfig, FetchError};
use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;

/// Response metadata from a HEAD request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadInfo {
    /// HTTP status code.
    pub status: u16,
    /// Parsed `Content-Length` header, if present and numeric.
    pub content_length: Option<u64>,
}

impl HeadInfo {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Response from a GET request with the full body.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// HTTP status code.
    pub status: u16,
    /// Final URL after redirects.
    pub final_url: String,
    /// Raw body bytes as transferred.
    pub body: Vec<u8>,
}

impl Fetched {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Status and transferred body length of a GET whose body was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLength {
    pub status: u16,
    /// Bytes received; zero when the status was not a success.
    pub bytes: u64,
}

impl BodyLength {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issue HEAD/GET requests, following redirects.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn head(&self, url: &str) -> Result<HeadInfo, FetchError>;
    async fn get(&self, url: &str) -> Result<Fetched, FetchError>;

    /// GET `url` and count the body bytes without keeping them.
    async fn get_len(&self, url: &str) -> Result<BodyLength, FetchError> {
        let resp = self.get(url).await?;
        Ok(BodyLength {
            status: resp.status,
            bytes: resp.body.len() as u64,
        })
    }
}

/// Parse a `Content-Length` value. Anything but a plain decimal is ignored.
pub fn parse_content_length(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

/// [`HttpFetch`] over a shared `reqwest` client.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Build a client honoring the timeout, redirect limit and user agent in `config`.
    pub fn new(config: &AuditConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn head(&self, url: &str) -> Result<HeadInfo, FetchError> {
        let resp = self.client.head(url).send().await?;
        let content_length = resp
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_length);

        Ok(HeadInfo {
            status: resp.status().as_u16(),
            content_length,
        })
    }

    async fn get(&self, url: &str) -> Result<Fetched, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let body = resp.bytes().await?.to_vec();

        Ok(Fetched {
            status,
            final_url,
            body,
        })
    }

    async fn get_len(&self, url: &str) -> Result<BodyLength, FetchError> {
        let mut resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let mut bytes = 0u64;
        if resp.status().is_success() {
            while let Some(chunk) = resp.chunk().await? {
                bytes += chunk.len() as u64;
            }
        }
        Ok(BodyLength { status, bytes })
    }
}
