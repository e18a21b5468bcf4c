//! Captured HTTP responses

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{HarnessError, HarnessResult};
use crate::json_path;

/// Key of the array the collection assertions look at
pub const DATA_KEY: &str = "data";

/// Immutable snapshot of a received response
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSnapshot {
    status: u16,
    headers: BTreeMap<String, String>,
    body: String,
    json: Option<Value>,
}

impl ResponseSnapshot {
    /// Capture a response; the body is parsed as JSON when possible
    pub fn new(status: u16, headers: BTreeMap<String, String>, body: impl Into<String>) -> Self {
        let body = body.into();
        let json = serde_json::from_str(&body).ok();
        Self {
            status,
            headers,
            body,
            json,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Header lookup, case-insensitive on the name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parsed body, `None` when the body is not JSON
    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    /// Pretty-printed JSON body, or the raw body when it is not JSON
    pub fn pretty_body(&self) -> String {
        self.json
            .as_ref()
            .and_then(|json| serde_json::to_string_pretty(json).ok())
            .unwrap_or_else(|| self.body.clone())
    }

    /// String value at a dotted JSON path, `None` for missing or null
    pub fn field(&self, path: &str) -> Option<String> {
        self.json
            .as_ref()
            .and_then(|json| json_path::select_string(json, path))
    }

    /// Elements of the top-level `data` array, empty when the key is absent.
    ///
    /// A `data` value that is not an array is an invalid argument for the
    /// collection steps.
    pub fn data_items(&self) -> HarnessResult<&[Value]> {
        match self.json.as_ref().and_then(|json| json.get(DATA_KEY)) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(HarnessError::InvalidArgument(format!(
                "Field '{}' is {}, expected an array",
                DATA_KEY,
                json_type(other)
            ))),
        }
    }

    /// Number of elements in `data`, zero when absent
    pub fn data_len(&self) -> HarnessResult<usize> {
        self.data_items().map(<[Value]>::len)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
