use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::function_event::{CorsProfile, FunctionResponse};

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Path not served by the function.
    UnknownRoute {
        path: String,
        available: &'static [&'static str],
    },
    /// HTTP method not accepted on a recognized route.
    MethodNotAllowed {
        message: String,
        allowed: &'static [&'static str],
    },
    /// Unrecognized cleaner `operation` discriminator.
    UnknownOperation {
        operation: String,
        available: &'static [&'static str],
    },
    /// No function registered under the requested name.
    UnknownFunction {
        name: String,
        available: &'static [&'static str],
    },
    /// Request body is not valid JSON or has the wrong shape.
    InvalidBody(serde_json::Error),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UnknownRoute { path, .. } => write!(f, "Endpoint não encontrado: {}", path),
            AppError::MethodNotAllowed { message, .. } => write!(f, "{}", message),
            AppError::UnknownOperation { operation, .. } => {
                write!(f, "Operação não reconhecida: {}", operation)
            }
            AppError::UnknownFunction { name, .. } => write!(f, "Função não encontrada: {}", name),
            AppError::InvalidBody(e) => write!(f, "Invalid JSON body: {}", e),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => write!(f, "{}: {}", context, source),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Innermost error of a context chain.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.root() {
            AppError::UnknownRoute { .. } | AppError::UnknownFunction { .. } => {
                StatusCode::NOT_FOUND
            }
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::UnknownOperation { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidBody(_) | AppError::InternalError(_) | AppError::WithContext { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Renders the error into a function response carrying `profile`'s headers.
    ///
    /// 4xx variants keep their explanatory payload; everything else collapses
    /// into a generic 500 with the full context chain as `message`.
    pub fn into_function_response(self, profile: &CorsProfile) -> FunctionResponse {
        let status = self.status_code();
        let body = match self.root() {
            AppError::UnknownRoute { path, available } => {
                tracing::warn!("Unknown path requested: {}", path);
                json!({
                    "error": "Endpoint não encontrado",
                    "path": path,
                    "available_endpoints": available,
                })
            }
            AppError::MethodNotAllowed { message, allowed } => {
                tracing::warn!("{}", message);
                json!({
                    "error": message,
                    "allowed_methods": allowed,
                })
            }
            AppError::UnknownOperation {
                operation,
                available,
            } => {
                tracing::warn!("Unknown cleaner operation: {}", operation);
                json!({
                    "error": "Operação não reconhecida",
                    "operation": operation,
                    "available_operations": available,
                })
            }
            AppError::UnknownFunction { name, available } => {
                tracing::warn!("Unknown function requested: {}", name);
                json!({
                    "error": "Função não encontrada",
                    "function": name,
                    "available_functions": available,
                })
            }
            AppError::InvalidBody(_) | AppError::InternalError(_) | AppError::WithContext { .. } => {
                tracing::error!("Function failed: {}", self);
                let mut body = json!({
                    "error": "Erro interno do servidor",
                    "message": self.to_string(),
                });
                if profile.timestamp_on_error {
                    body["timestamp"] = json!(chrono::Utc::now().to_rfc3339());
                }
                body
            }
        };

        FunctionResponse::json(status, profile, &body)
    }
}

impl IntoResponse for AppError {
    /// Gateway-level errors use the broadest CORS profile.
    fn into_response(self) -> Response {
        self.into_function_response(&CorsProfile::APP)
            .into_response()
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_root_status() {
        let err: Result<(), AppError> = Err(AppError::UnknownOperation {
            operation: "merge".to_string(),
            available: &["clean_lead"],
        });
        let err = err.context("cleaner").unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "cleaner: Operação não reconhecida: merge");
    }

    #[test]
    fn test_internal_error_body_has_message_and_timestamp() {
        let result: Result<(), AppError> = Err(AppError::InternalError("boom".to_string()));
        let response = result
            .context("Failed to load leads")
            .unwrap_err()
            .into_function_response(&CorsProfile::APP);

        assert_eq!(response.status_code, 500);
        let body = response.body_json().unwrap();
        assert_eq!(body["error"], "Erro interno do servidor");
        assert_eq!(body["message"], "Failed to load leads: Internal error: boom");
        assert!(body.get("timestamp").is_some());
    }

    #[test]
    fn test_main_profile_omits_timestamp() {
        let response = AppError::InternalError("boom".to_string())
            .into_function_response(&CorsProfile::MAIN);

        let body = response.body_json().unwrap();
        assert!(body.get("timestamp").is_none());
    }

    #[test]
    fn test_method_not_allowed_payload() {
        let response = AppError::MethodNotAllowed {
            message: "Método não permitido para /dashboard".to_string(),
            allowed: &["GET"],
        }
        .into_function_response(&CorsProfile::APP);

        assert_eq!(response.status_code, 405);
        let body = response.body_json().unwrap();
        assert_eq!(body["allowed_methods"], serde_json::json!(["GET"]));
    }
}
