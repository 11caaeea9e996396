use crate::codec;
use crate::config::HttpConfig;
use crate::error::{Error, ProtocolFault, Result};
use crate::request::Request;
use crate::splitter::Splitter;
use crate::standardize::StandardResponse;
use crate::transport::{HttpTransport, Transport, TransportError, TransportOptions};
use crate::types::MaybeBatch;
use serde_json::Value as JsonValue;
use std::sync::Arc;

#[derive(Clone)]
pub struct ClientConfig {
    pub endpoint: url::Url,
    pub options: TransportOptions,
    pub transport: Arc<dyn Transport>,
}

/// JSON-RPC 2.0 client for one endpoint.
///
/// Calls don't share any state, so one client can serve concurrent callers.
pub struct Client {
    cfg: ClientConfig,
}

impl Client {
    pub fn new(cfg: ClientConfig) -> Result<Client> {
        let endpoint = &cfg.endpoint;
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.host_str().is_none() {
            return Err(Error::InvalidEndpoint(endpoint.clone()));
        }

        Ok(Client { cfg })
    }

    pub fn from_http_config(endpoint: url::Url, http: &HttpConfig) -> Result<Client> {
        let transport = HttpTransport::new(http)?;

        Client::new(ClientConfig {
            endpoint,
            options: TransportOptions::default(),
            transport: Arc::new(transport),
        })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.cfg.endpoint
    }

    /// Sends one request as a standalone object.
    ///
    /// The decoded `result` is handed back as is. An `error` member in the
    /// response becomes [`Error::Rpc`] carrying the raw error value.
    pub async fn send(&self, req: &Request) -> Result<JsonValue> {
        let req_body = codec::encode_request(req)?;

        let resp = self
            .cfg
            .transport
            .send(&self.cfg.endpoint, req_body.clone(), &self.cfg.options)
            .await
            .map_err(|e| match e {
                TransportError::Timeout => Error::Timeout,
                e => Error::Transport(e),
            })?;

        let resp = codec::decode(&resp.body, resp.status, &self.cfg.endpoint, &req_body)?;
        let resp = match resp {
            MaybeBatch::Single(resp) => resp,
            MaybeBatch::Batch(resp) => {
                return Err(Error::Protocol(ProtocolFault::UnexpectedBatch(resp.len())))
            }
        };

        match (resp.error, resp.result) {
            (Some(error), _) => Err(Error::Rpc(error)),
            (None, Some(result)) => Ok(result),
            (None, None) => Err(Error::Protocol(ProtocolFault::MissingOutcome)),
        }
    }

    /// Sends a batch, splitting it as needed. Responses come back in request
    /// order and standardized.
    pub async fn send_batch(&self, batch: &[Request]) -> Result<Vec<StandardResponse>> {
        Splitter::new(
            self.cfg.transport.as_ref(),
            &self.cfg.endpoint,
            &self.cfg.options,
        )
        .send(batch)
        .await
    }
}
