use jsonrpc_batch_core::StandardResponse;
use serde::Serialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RpcResponse {
    Batch(Vec<StandardResponse>),
    Single(JsonValue),
}
