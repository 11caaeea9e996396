use std::result::Result as StdResult;

use crate::transport::TransportError;
use serde_json::Value as JsonValue;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("failed to execute rpc request:\n{0}")]
    Transport(TransportError),
    #[error("rpc request timed out")]
    Timeout,
    #[error("bad gateway response from {0}")]
    BadGateway(url::Url),
    #[error(
        "failed to decode rpc response from {url}. status: {status}\nrequest:\n{request_body}\nresponse:\n{response_body}\n{source}"
    )]
    UnrecoverableDecode {
        url: url::Url,
        request_body: String,
        status: u16,
        response_body: String,
        source: serde_json::Error,
    },
    #[error("invalid rpc response:\n{0}")]
    Protocol(ProtocolFault),
    #[error("failed to send a single request even after splitting the batch:\n{0}")]
    SplitExhausted(Exhausted),
    #[error("rpc returned an error:\n{0}")]
    Rpc(JsonValue),
    #[error("failed to encode rpc request:\n{0}")]
    EncodeRequest(serde_json::Error),
    #[error("failed to parse rpc result:\n{0}")]
    RpcResultParse(serde_json::Error),
    #[error("failed to build http client:\n{0}")]
    BuildHttpClient(reqwest::Error),
    #[error("invalid rpc endpoint {0}")]
    InvalidEndpoint(url::Url),
}

/// A decoded response that breaks the JSON-RPC 2.0 response rules.
#[derive(Debug, ThisError)]
pub enum ProtocolFault {
    #[error("response carries both result and error")]
    ResultAndError,
    #[error("response carries neither result nor error")]
    MissingOutcome,
    #[error("response id {0} is not an integer")]
    InvalidId(JsonValue),
    #[error("error object has no integer code: {0}")]
    InvalidErrorCode(JsonValue),
    #[error("error object has no string message: {0}")]
    InvalidErrorMessage(JsonValue),
    #[error("error member is not an object: {0}")]
    InvalidErrorObject(JsonValue),
    #[error("sent {sent} requests but got {received} responses")]
    ResponseCountMismatch { sent: usize, received: usize },
    #[error("expected a single response object, got a batch of {0}")]
    UnexpectedBatch(usize),
}

/// Last thing observed for a single-request chunk the endpoint kept rejecting.
#[derive(Debug, ThisError)]
pub enum Exhausted {
    #[error("rpc response status is {status}. payload:\n{body}")]
    Response { status: u16, body: String },
    #[error("request timed out")]
    Timeout,
}

pub type Result<T> = StdResult<T, Error>;
