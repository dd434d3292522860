//! Response normalization.
//!
//! HEAD and PUT report only resource headers, GET and DELETE only the body,
//! POST both. Nothing here looks at status codes: by the time a response
//! gets here the transport has already split success from failure.

use reqwest::{header::HeaderMap, Method, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};

/// Success response as read off the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: ResourceHeaders,
    pub body: Value,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ResourceHeaders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl ResourceHeaders {
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        let read = |name: reqwest::header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        Self {
            location: read(reqwest::header::LOCATION),
            etag: read(reqwest::header::ETAG),
        }
    }
}

/// Uniform result of a successful operation.
#[derive(Clone, Debug, PartialEq)]
pub enum OperationResult {
    Headers(ResourceHeaders),
    Body(Value),
    Merged {
        headers: ResourceHeaders,
        body: Value,
    },
}

impl OperationResult {
    pub fn normalize(method: &Method, raw: RawResponse) -> Self {
        match *method {
            Method::HEAD | Method::PUT => Self::Headers(raw.headers),
            Method::POST => Self::Merged {
                headers: raw.headers,
                body: raw.body,
            },
            _ => Self::Body(raw.body),
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Headers(h) | Self::Merged { headers: h, .. } => h.location.as_deref(),
            Self::Body(_) => None,
        }
    }

    pub fn etag(&self) -> Option<&str> {
        match self {
            Self::Headers(h) | Self::Merged { headers: h, .. } => h.etag.as_deref(),
            Self::Body(_) => None,
        }
    }

    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::Body(body) | Self::Merged { body, .. } => Some(body),
            Self::Headers(_) => None,
        }
    }

    /// Top-level field of the flattened result.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self.to_value() {
            Value::Object(mut object) => object.remove(key),
            _ => None,
        }
    }

    /// Empty body and no resource headers.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Headers(h) => h.location.is_none() && h.etag.is_none(),
            Self::Body(body) => is_empty_value(body),
            Self::Merged { headers, body } => {
                headers.location.is_none() && headers.etag.is_none() && is_empty_value(body)
            }
        }
    }

    /// JSON view: headers and body merged at the top level, body keys
    /// winning on collision. A body that is not an object is kept whole
    /// under `body`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Headers(headers) => Value::Object(headers_object(headers)),
            Self::Body(body) => body.clone(),
            Self::Merged { headers, body } => {
                let mut merged = headers_object(headers);
                match body {
                    Value::Null => {}
                    Value::Object(fields) => merged.extend(fields.clone()),
                    other => {
                        merged.insert("body".into(), other.clone());
                    }
                }
                Value::Object(merged)
            }
        }
    }
}

fn headers_object(headers: &ResourceHeaders) -> Map<String, Value> {
    let mut object = Map::new();
    if let Some(location) = &headers.location {
        object.insert("location".into(), Value::String(location.clone()));
    }
    if let Some(etag) = &headers.etag {
        object.insert("etag".into(), Value::String(etag.clone()));
    }
    object
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(object) => object.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Decodes a body: empty → `null`, JSON → value, anything else → string.
pub fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
