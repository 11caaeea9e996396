use crate::transport::{Transport, TransportError, TransportOptions, TransportResponse};
use bytes::Bytes;
use serde_json::{json, Value as JsonValue};
use std::sync::Mutex;

pub enum Reply {
    /// 200 with `result` set to each request's method name.
    Echo,
    Status(u16, &'static str),
    Body(JsonValue),
    Timeout,
    Refused,
}

type Handler = Box<dyn Fn(&[JsonValue]) -> Reply + Send + Sync>;

/// In-memory endpoint. The handler sees the ids of each payload it receives.
pub struct MockTransport {
    handler: Handler,
    calls: Mutex<Vec<Vec<JsonValue>>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&[JsonValue]) -> Reply + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<JsonValue>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        _endpoint: &url::Url,
        body: Bytes,
        _options: &TransportOptions,
    ) -> Result<TransportResponse, TransportError> {
        let payload: JsonValue = serde_json::from_slice(&body).unwrap();
        let is_batch = payload.is_array();
        let requests = match payload {
            JsonValue::Array(requests) => requests,
            req => vec![req],
        };
        let ids = requests.iter().map(|r| r["id"].clone()).collect::<Vec<_>>();
        self.calls.lock().unwrap().push(ids.clone());

        let body = match (self.handler)(&ids) {
            Reply::Echo => {
                let responses = requests
                    .iter()
                    .map(|r| json!({"jsonrpc": "2.0", "id": r["id"], "result": r["method"]}))
                    .collect::<Vec<_>>();
                if is_batch {
                    JsonValue::Array(responses)
                } else {
                    responses.into_iter().next().unwrap()
                }
            }
            Reply::Body(body) => body,
            Reply::Status(status, body) => {
                return Ok(TransportResponse {
                    status,
                    body: Bytes::from_static(body.as_bytes()),
                })
            }
            Reply::Timeout => return Err(TransportError::Timeout),
            Reply::Refused => return Err(TransportError::Other("connection refused".to_owned())),
        };

        Ok(TransportResponse {
            status: 200,
            body: Bytes::from(serde_json::to_vec(&body).unwrap()),
        })
    }
}
