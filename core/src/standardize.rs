use crate::codec::RawResponse;
use crate::error::{Error, ProtocolFault, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl ErrorObject {
    pub fn to_value(&self) -> JsonValue {
        let mut obj = Map::new();
        obj.insert("code".to_owned(), self.code.into());
        obj.insert("message".to_owned(), self.message.clone().into());
        if let Some(data) = &self.data {
            obj.insert("data".to_owned(), data.clone());
        }
        JsonValue::Object(obj)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(JsonValue),
    Error(ErrorObject),
}

/// A JSON-RPC 2.0 response with an integer id and exactly one of
/// `result`/`error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardResponse {
    pub jsonrpc: &'static str,
    pub id: i64,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl StandardResponse {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// Deserializes the result, or returns the rpc error as [`Error::Rpc`].
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        match self.outcome {
            Outcome::Result(result) => serde_json::from_value(result).map_err(Error::RpcResultParse),
            Outcome::Error(error) => Err(Error::Rpc(error.to_value())),
        }
    }
}

pub fn standardize(raw: RawResponse) -> Result<StandardResponse> {
    standardize_inner(raw).map_err(Error::Protocol)
}

fn standardize_inner(raw: RawResponse) -> std::result::Result<StandardResponse, ProtocolFault> {
    let id = coerce_id(raw.id)?;

    let outcome = match (raw.result, raw.error) {
        (Some(_), Some(_)) => return Err(ProtocolFault::ResultAndError),
        (Some(result), None) => Outcome::Result(result),
        (None, Some(error)) => Outcome::Error(standardize_error(error)?),
        (None, None) => return Err(ProtocolFault::MissingOutcome),
    };

    Ok(StandardResponse {
        jsonrpc: JSONRPC_VERSION,
        id,
        outcome,
    })
}

fn coerce_id(id: Option<JsonValue>) -> std::result::Result<i64, ProtocolFault> {
    let id = id.unwrap_or(JsonValue::Null);

    let coerced = match &id {
        JsonValue::Number(num) => num.as_i64(),
        JsonValue::String(s) => s.parse::<i64>().ok(),
        _ => None,
    };

    coerced.ok_or(ProtocolFault::InvalidId(id))
}

fn standardize_error(error: JsonValue) -> std::result::Result<ErrorObject, ProtocolFault> {
    let obj = match &error {
        JsonValue::Object(obj) => obj,
        _ => return Err(ProtocolFault::InvalidErrorObject(error)),
    };

    let code = match obj.get("code").and_then(JsonValue::as_i64) {
        Some(code) => code,
        None => return Err(ProtocolFault::InvalidErrorCode(error)),
    };
    let message = match obj.get("message").and_then(JsonValue::as_str) {
        Some(message) => message.to_owned(),
        None => return Err(ProtocolFault::InvalidErrorMessage(error)),
    };
    let data = obj.get("data").cloned();

    Ok(ErrorObject {
        code,
        message,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: JsonValue) -> RawResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn textual_and_numeric_ids_coerce() {
        let a = standardize(raw(json!({"jsonrpc": "2.0", "id": "7", "result": 1}))).unwrap();
        let b = standardize(raw(json!({"jsonrpc": "2.0", "id": 7, "result": 1}))).unwrap();
        assert_eq!(a.id, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn bad_ids_are_faults() {
        for id in [json!("seven"), json!(1.5), json!(null), json!([1])] {
            let err = standardize(raw(json!({"id": id, "result": 1}))).unwrap_err();
            assert!(matches!(err, Error::Protocol(ProtocolFault::InvalidId(_))));
        }
        let err = standardize(raw(json!({"result": 1}))).unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolFault::InvalidId(JsonValue::Null))));
    }

    #[test]
    fn result_and_error_is_fault() {
        let err = standardize(raw(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": "0x1",
            "error": {"code": -1, "message": "no"},
        })))
        .unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolFault::ResultAndError)));
    }

    #[test]
    fn null_result_is_a_result() {
        let resp = standardize(raw(json!({"jsonrpc": "2.0", "id": 3, "result": null}))).unwrap();
        assert_eq!(resp.outcome, Outcome::Result(JsonValue::Null));
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"jsonrpc": "2.0", "id": 3, "result": null})
        );
    }

    #[test]
    fn error_object_keeps_data() {
        let resp = standardize(raw(json!({
            "jsonrpc": "2.0",
            "id": "4",
            "error": {"code": -32005, "message": "limit exceeded", "data": {"limit": 100}, "extra": 1},
        })))
        .unwrap();
        assert!(resp.is_error());
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "id": 4,
                "error": {"code": -32005, "message": "limit exceeded", "data": {"limit": 100}},
            })
        );
    }

    #[test]
    fn error_without_data_omits_it() {
        let resp = standardize(raw(json!({"id": 1, "error": {"code": -1, "message": "x"}}))).unwrap();
        assert_eq!(
            resp.outcome,
            Outcome::Error(ErrorObject {
                code: -1,
                message: "x".to_owned(),
                data: None,
            })
        );
    }

    #[test]
    fn malformed_error_objects() {
        let err = standardize(raw(json!({"id": 1, "error": {"code": "x", "message": "m"}}))).unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolFault::InvalidErrorCode(_))));

        let err = standardize(raw(json!({"id": 1, "error": {"code": 1}}))).unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolFault::InvalidErrorMessage(_))));

        let err = standardize(raw(json!({"id": 1, "error": "boom"}))).unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolFault::InvalidErrorObject(_))));
    }

    #[test]
    fn missing_outcome_is_fault() {
        let err = standardize(raw(json!({"jsonrpc": "2.0", "id": 1}))).unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolFault::MissingOutcome)));
    }

    #[test]
    fn typed_result() {
        let resp = standardize(raw(json!({"id": 1, "result": ["a", "b"]}))).unwrap();
        let res: Vec<String> = resp.into_result().unwrap();
        assert_eq!(res, vec!["a", "b"]);

        let resp = standardize(raw(json!({"id": 1, "error": {"code": -1, "message": "x"}}))).unwrap();
        let err = resp.into_result::<JsonValue>().unwrap_err();
        assert!(matches!(err, Error::Rpc(e) if e == json!({"code": -1, "message": "x"})));
    }
}
