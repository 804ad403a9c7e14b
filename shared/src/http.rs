//! HTTP helpers for Lambda functions.

use lambda_http::{Body, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// JSON body returned to the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TourResponse {
    pub ok: bool,
    /// Id of the created record, when the downstream returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Names of required fields that were absent or blank
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
}

impl TourResponse {
    pub fn success(id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn missing(fields: Vec<String>) -> Self {
        Self {
            ok: false,
            error: Some("Missing required fields".to_string()),
            missing: Some(fields),
            ..Self::default()
        }
    }
}

/// CORS headers attached to every response.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    pub allowed_origin: String,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
        }
    }
}

impl CorsPolicy {
    pub const ALLOWED_METHODS: &'static str = "POST, OPTIONS";
    pub const ALLOWED_HEADERS: &'static str = "Content-Type";
    pub const MAX_AGE: &'static str = "86400";

    pub fn new(allowed_origin: impl Into<String>) -> Self {
        Self {
            allowed_origin: allowed_origin.into(),
        }
    }

    fn apply(&self, builder: lambda_http::http::response::Builder) -> lambda_http::http::response::Builder {
        builder
            .header("Access-Control-Allow-Origin", self.allowed_origin.as_str())
            .header("Access-Control-Allow-Methods", Self::ALLOWED_METHODS)
            .header("Access-Control-Allow-Headers", Self::ALLOWED_HEADERS)
            .header("Access-Control-Max-Age", Self::MAX_AGE)
    }
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(
    status: u16,
    data: &T,
    cors: &CorsPolicy,
) -> Result<Response<Body>, lambda_http::Error> {
    Ok(cors
        .apply(Response::builder().status(status))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(data)?))?)
}

/// Create an error response with the given status code and message.
pub fn error_response(
    status: u16,
    message: impl Into<String>,
    cors: &CorsPolicy,
) -> Result<Response<Body>, lambda_http::Error> {
    json_response(status, &TourResponse::error(message), cors)
}

/// Answer a CORS preflight request.
pub fn preflight_response(cors: &CorsPolicy) -> Result<Response<Body>, lambda_http::Error> {
    Ok(cors.apply(Response::builder().status(204)).body(Body::Empty)?)
}

/// 405 for anything other than POST or OPTIONS.
pub fn method_not_allowed(cors: &CorsPolicy) -> Result<Response<Body>, lambda_http::Error> {
    Ok(cors
        .apply(Response::builder().status(405))
        .header("Allow", CorsPolicy::ALLOWED_METHODS)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&TourResponse::error(
            "Method not allowed",
        ))?))?)
}

/// Parse request body as JSON, returning a 400 response on failure.
///
/// An empty or `null` body parses as `{}`. Returns `Ok(Ok(T))` on successful parse,
/// `Ok(Err(Response))` on parse error (400), or `Err(lambda_http::Error)` on
/// serialization failure.
pub fn parse_json_body<T: DeserializeOwned>(
    body: &Body,
    cors: &CorsPolicy,
) -> Result<Result<T, Response<Body>>, lambda_http::Error> {
    let bytes: &[u8] = body.as_ref();
    let blank_or_null = std::str::from_utf8(bytes)
        .map(|text| matches!(text.trim(), "" | "null"))
        .unwrap_or(false);
    let bytes = if blank_or_null {
        b"{}".as_slice()
    } else {
        bytes
    };

    match serde_json::from_slice(bytes) {
        Ok(parsed) => Ok(Ok(parsed)),
        Err(e) => {
            let response = error_response(400, format!("Invalid request body: {}", e), cors)?;
            Ok(Err(response))
        }
    }
}

/// Macro to parse request body, returning early with 400 on parse error.
///
/// Usage:
/// ```ignore
/// let request: TourRequest = parse_body!(event.body(), &cors);
/// ```
#[macro_export]
macro_rules! parse_body {
    ($body:expr, $cors:expr) => {
        match $crate::http::parse_json_body($body, $cors)? {
            Ok(parsed) => parsed,
            Err(response) => return Ok(response),
        }
    };
}
