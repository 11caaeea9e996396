//! The request/response exchange underneath the client.
//!
//! A [`Transport`] moves one encoded payload to an endpoint and hands back the
//! status code and raw body. It does not look at the payload. Every status
//! code, including non-2xx ones, is an `Ok` outcome; only failures to complete
//! the exchange are errors, and a timeout must be reported as
//! [`TransportError::Timeout`] so oversized batches can be split.

use crate::config::HttpConfig;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("failed to execute http request:\n{0}")]
    Http(reqwest::Error),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Per-call options forwarded untouched to the transport.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    pub timeout: Option<Duration>,
    pub headers: BTreeMap<String, String>,
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        endpoint: &url::Url,
        body: Bytes,
        options: &TransportOptions,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(cfg: &HttpConfig) -> Result<HttpTransport> {
        let request_timeout = Duration::from_secs(cfg.request_timeout_secs.get());
        let connect_timeout = Duration::from_millis(cfg.connect_timeout_ms.get());

        let http_client = reqwest::ClientBuilder::new()
            .gzip(true)
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(Error::BuildHttpClient)?;

        Ok(HttpTransport { http_client })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        endpoint: &url::Url,
        body: Bytes,
        options: &TransportOptions,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut req = self
            .http_client
            .post(endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(timeout) = options.timeout {
            req = req.timeout(timeout);
        }
        for (name, value) in options.headers.iter() {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req.send().await.map_err(http_error)?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(http_error)?;

        Ok(TransportResponse { status, body })
    }
}

// reqwest flags connect timeouts as timeouts too, but an endpoint we can't
// reach is not a sign that the payload is too big.
fn http_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() && !e.is_connect() {
        TransportError::Timeout
    } else {
        TransportError::Http(e)
    }
}
