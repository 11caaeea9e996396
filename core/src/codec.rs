use crate::error::{Error, Result};
use crate::request::Request;
use crate::types::MaybeBatch;
use bytes::Bytes;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

const BAD_GATEWAY: u16 = 502;

/// A response object exactly as the server sent it. Nothing is validated yet,
/// but members that were present on the wire stay `Some` even when their value
/// is `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResponse {
    pub jsonrpc: Option<JsonValue>,
    pub id: Option<JsonValue>,
    pub result: Option<JsonValue>,
    pub error: Option<JsonValue>,
}

impl RawResponse {
    pub fn from_map(mut obj: Map<String, JsonValue>) -> Self {
        Self {
            jsonrpc: obj.remove("jsonrpc"),
            id: obj.remove("id"),
            result: obj.remove("result"),
            error: obj.remove("error"),
        }
    }
}

// Only a JSON object is a response. A derived impl would also take an array
// and fill the members by position.
impl<'de> Deserialize<'de> for RawResponse {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ObjectVisitor)
    }
}

struct ObjectVisitor;

impl<'de> Visitor<'de> for ObjectVisitor {
    type Value = RawResponse;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON-RPC response object")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<RawResponse, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut obj = Map::new();
        while let Some((key, value)) = access.next_entry::<String, JsonValue>()? {
            obj.insert(key, value);
        }
        Ok(RawResponse::from_map(obj))
    }
}

pub fn encode_request(req: &Request) -> Result<Bytes> {
    serde_json::to_vec(&req.to_body())
        .map(Bytes::from)
        .map_err(Error::EncodeRequest)
}

pub fn encode_batch(requests: &[Request]) -> Result<Bytes> {
    let req_body = requests.iter().map(Request::to_body).collect::<Vec<_>>();
    let req_body = JsonValue::Array(req_body);

    serde_json::to_vec(&req_body)
        .map(Bytes::from)
        .map_err(Error::EncodeRequest)
}

/// Parses a response body. A body that isn't JSON-RPC shaped is a bad gateway
/// if the status says so, and unrecoverable otherwise.
pub fn decode(
    body: &[u8],
    status: u16,
    url: &url::Url,
    request_body: &[u8],
) -> Result<MaybeBatch<RawResponse>> {
    match serde_json::from_slice(body) {
        Ok(resp) => Ok(resp),
        Err(_) if status == BAD_GATEWAY => Err(Error::BadGateway(url.clone())),
        Err(e) => {
            let response_body = String::from_utf8_lossy(body).into_owned();
            log::error!(
                "failed to parse rpc response from {}, status {}, body was:\n{}",
                url,
                status,
                response_body
            );

            Err(Error::UnrecoverableDecode {
                url: url.clone(),
                request_body: String::from_utf8_lossy(request_body).into_owned(),
                status,
                response_body,
                source: e,
            })
        }
    }
}
