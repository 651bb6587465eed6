use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::errors::AppError;

/// Serverless function request envelope.
///
/// Mirrors the event shape handed to a function by the hosting platform.
/// Every field is optional on the wire: a missing method means `GET`, a
/// missing path means `/` and a missing body decodes as `{}`. Request
/// headers are not forwarded to functions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    #[serde(default = "default_method")]
    pub http_method: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub body: Option<EventBody>,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

/// Request body: either the raw JSON text or an already decoded value.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EventBody {
    Encoded(String),
    Decoded(Value),
}

impl FunctionEvent {
    pub fn new(http_method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            path: path.into(),
            query_string_parameters: None,
            body: None,
        }
    }

    /// Attach a body that still needs JSON decoding.
    pub fn with_raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(EventBody::Encoded(body.into()));
        self
    }

    /// Attach a body that is already a JSON structure.
    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = Some(EventBody::Decoded(body));
        self
    }

    pub fn with_query(mut self, params: BTreeMap<String, String>) -> Self {
        self.query_string_parameters = Some(params);
        self
    }

    pub fn method(&self) -> &str {
        &self.http_method
    }

    /// Decode the body into `T`, treating an absent body as `{}`.
    pub fn decode_body<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        let decoded = match &self.body {
            None => serde_json::from_str("{}"),
            Some(EventBody::Encoded(raw)) => serde_json::from_str(raw),
            Some(EventBody::Decoded(value)) => T::deserialize(value),
        };
        decoded.map_err(AppError::InvalidBody)
    }
}

/// CORS header set a function attaches to every response it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorsProfile {
    pub allow_headers: &'static str,
    pub allow_methods: &'static str,
    /// Whether 500 bodies carry a `timestamp` field.
    pub timestamp_on_error: bool,
}

impl CorsProfile {
    pub const MAIN: CorsProfile = CorsProfile {
        allow_headers: "Content-Type",
        allow_methods: "GET, POST, OPTIONS",
        timestamp_on_error: false,
    };

    pub const APP: CorsProfile = CorsProfile {
        allow_headers: "Content-Type, Authorization",
        allow_methods: "GET, POST, PUT, DELETE, OPTIONS",
        timestamp_on_error: true,
    };

    pub const DASHBOARD: CorsProfile = CorsProfile {
        allow_headers: "Content-Type, Authorization",
        allow_methods: "GET, POST, PUT, DELETE, OPTIONS",
        timestamp_on_error: true,
    };

    pub const CLEANER: CorsProfile = CorsProfile {
        allow_headers: "Content-Type, Authorization",
        allow_methods: "GET, POST, OPTIONS",
        timestamp_on_error: true,
    };

    pub fn headers(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
            (
                "Access-Control-Allow-Headers".to_string(),
                self.allow_headers.to_string(),
            ),
            (
                "Access-Control-Allow-Methods".to_string(),
                self.allow_methods.to_string(),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
        ])
    }
}

/// Serverless function response envelope.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON-encoded payload, empty for preflight responses.
    pub body: String,
}

impl FunctionResponse {
    pub fn json(status: StatusCode, profile: &CorsProfile, payload: &Value) -> Self {
        Self {
            status_code: status.as_u16(),
            headers: profile.headers(),
            body: payload.to_string(),
        }
    }

    /// CORS preflight answer: 200 with an empty body.
    pub fn preflight(profile: &CorsProfile) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            headers: profile.headers(),
            body: String::new(),
        }
    }

    /// Parsed body, `None` when empty or not JSON.
    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

impl IntoResponse for FunctionResponse {
    /// Converts the envelope into a real HTTP response, carrying over the
    /// function's headers verbatim.
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!("Skipping invalid response header: {}", name),
            }
        }

        response
    }
}
