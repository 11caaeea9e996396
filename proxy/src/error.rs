use hyper::StatusCode;
use std::fmt;
use std::result::Result as StdResult;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("the request has been rate limited.")]
    RateLimited,
    #[error("invalid request body:\n{0:?}")]
    InvalidRequestBody(Option<serde_json::Error>),
    #[error("failed to create rpc client:\n{0}")]
    CreateClient(jsonrpc_batch_core::Error),
    #[error("failed to forward request to target rpc:\n{0}")]
    Forward(jsonrpc_batch_core::Error),
    #[error("failed to encode response:\n{0}")]
    EncodeResponse(serde_json::Error),
    #[error("failed to encode metrics:\n{0}")]
    EncodeMetrics(fmt::Error),
    #[error("failed to bind http server:\n{0}")]
    BindHttpServer(hyper::Error),
    #[error("failed to run http server:\n{0}")]
    RunHttpServer(hyper::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::Forward(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = StdResult<T, Error>;
