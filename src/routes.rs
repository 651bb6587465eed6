use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::errors::{AppError, ResultExt};
use crate::function_event::{CorsProfile, FunctionEvent, FunctionResponse};
use crate::handlers::{self, AppState, FunctionName, SERVICE_VERSION};

const GATEWAY_ROUTES: &[&str] = &[
    "/health",
    "/invoke/:function",
    "/api/:function",
    "/.netlify/functions/:function",
];

/// Build the HTTP gateway in front of the functions.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.body_limit_bytes;

    Router::new()
        .route("/health", any(health))
        .route("/invoke/:function", any(invoke_event))
        .route("/api/:function", any(invoke_http))
        .route("/api/:function/*rest", any(invoke_http))
        .route("/.netlify/functions/:function", any(invoke_http))
        .route("/.netlify/functions/:function/*rest", any(invoke_http))
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
}

/// Gateway-level preflight and method check for the routes that are not
/// functions themselves.
fn gateway_method(method: &Method, allowed: &'static [&'static str]) -> Option<Response> {
    if *method == Method::OPTIONS {
        return Some(FunctionResponse::preflight(&CorsProfile::APP).into_response());
    }
    if allowed.contains(&method.as_str()) {
        return None;
    }
    Some(
        AppError::MethodNotAllowed {
            message: "Método não permitido".to_string(),
            allowed,
        }
        .into_response(),
    )
}

/// Health check endpoint.
pub async fn health(method: Method) -> Response {
    if let Some(response) = gateway_method(&method, &["GET"]) {
        return response;
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "qualificadora-api",
            "version": SERVICE_VERSION
        })),
    )
        .into_response()
}

fn resolve_function(name: &str) -> Result<FunctionName, AppError> {
    FunctionName::parse(name).ok_or_else(|| AppError::UnknownFunction {
        name: name.to_string(),
        available: FunctionName::NAMES,
    })
}

/// ANY /api/:function[/*rest]
///
/// Wraps a plain HTTP request into a function event. The path seen by the
/// function is the part after the function name (`/` when there is none).
pub async fn invoke_http(
    State(state): State<Arc<AppState>>,
    Path(params): Path<HashMap<String, String>>,
    method: Method,
    Query(query): Query<BTreeMap<String, String>>,
    body: Bytes,
) -> Result<FunctionResponse, AppError> {
    let name = params.get("function").map(String::as_str).unwrap_or_default();
    let function = resolve_function(name)?;

    let path = params
        .get("rest")
        .map(|rest| format!("/{}", rest.trim_start_matches('/')))
        .unwrap_or_else(|| "/".to_string());

    let mut event = FunctionEvent::new(method.as_str(), path);
    if !query.is_empty() {
        event = event.with_query(query);
    }
    if !body.is_empty() {
        let raw = String::from_utf8(body.to_vec()).map_err(|e| {
            AppError::InternalError(format!("Request body is not valid UTF-8: {}", e))
        })?;
        event = event.with_raw_body(raw);
    }

    Ok(handlers::invoke(function, &state, &event))
}

/// POST /invoke/:function
///
/// Accepts a complete function event and returns the response envelope
/// as JSON, the way the hosting platform would see it.
pub async fn invoke_event(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    method: Method,
    body: Bytes,
) -> Result<Response, AppError> {
    if let Some(response) = gateway_method(&method, &["POST"]) {
        return Ok(response);
    }

    let function = resolve_function(&name)?;
    let event: FunctionEvent = serde_json::from_slice(&body)
        .map_err(AppError::InvalidBody)
        .with_context(|| format!("Invalid event for function '{}'", name))?;

    Ok(Json(handlers::invoke(function, &state, &event)).into_response())
}

async fn not_found(uri: Uri) -> AppError {
    AppError::UnknownRoute {
        path: uri.path().to_string(),
        available: GATEWAY_ROUTES,
    }
}
