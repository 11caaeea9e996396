use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Request identifier as it goes on the wire. Some callers number their
/// requests, others use opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Num(i64),
    Str(String),
}

impl From<i64> for Id {
    fn from(id: i64) -> Self {
        Self::Num(id)
    }
}

impl From<i32> for Id {
    fn from(id: i32) -> Self {
        Self::Num(id.into())
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self::Str(id.to_owned())
    }
}

impl From<String> for Id {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(id) => write!(f, "{}", id),
            Self::Str(id) => write!(f, "{:?}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub id: Id,
    pub method: String,
    pub params: Vec<JsonValue>,
}

#[derive(Deserialize)]
struct RequestObject {
    id: Id,
    method: String,
    #[serde(default)]
    params: Vec<JsonValue>,
}

// Requests only come as JSON objects. Deserializing the fields from an
// object-shaped value keeps positional arrays like `[1, "m", []]` out.
impl<'de> Deserialize<'de> for Request {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RequestVisitor)
    }
}

struct RequestVisitor;

impl<'de> Visitor<'de> for RequestVisitor {
    type Value = Request;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON-RPC request object")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Request, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut obj = Map::new();
        while let Some((key, value)) = access.next_entry::<String, JsonValue>()? {
            obj.insert(key, value);
        }

        let req: RequestObject =
            serde_json::from_value(JsonValue::Object(obj)).map_err(de::Error::custom)?;

        Ok(Request {
            id: req.id,
            method: req.method,
            params: req.params,
        })
    }
}

impl Request {
    pub fn new<I: Into<Id>, M: Into<String>>(id: I, method: M, params: Vec<JsonValue>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    pub fn to_body(&self) -> JsonValue {
        serde_json::json!({
            "jsonrpc": "2.0",
            "method": self.method,
            "params": self.params,
            "id": self.id,
        })
    }
}
