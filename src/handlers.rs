use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::config::Config;
use crate::crm_cleaner::{
    clean_lead_data, deduplicate_leads, normalize_contact_data, validate_company_data,
};
use crate::dashboard::summarize;
use crate::errors::{AppError, ResultExt};
use crate::function_event::{CorsProfile, FunctionEvent, FunctionResponse};
use crate::lead_source::{new_lead_record, updated_lead_record, LeadSource};
use crate::models::{CleanerRequest, CleaningOperation, LeadRecord};
use crate::qualification::{criteria_table, qualify_lead};

pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Paths served by the `app` function.
const APP_ENDPOINTS: &[&str] = &["/leads", "/qualificacao", "/dashboard", "/status"];

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Read-only lead data source.
    pub leads: Arc<dyn LeadSource>,
}

/// Serverless functions exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionName {
    Main,
    App,
    Dashboard,
    Cleaner,
}

impl FunctionName {
    pub const NAMES: &'static [&'static str] = &["main", "app", "dashboard", "cleaner"];

    /// Accepts the short names plus the legacy module names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "main" => Some(FunctionName::Main),
            "app" => Some(FunctionName::App),
            "dashboard" | "dashboard_interativo" => Some(FunctionName::Dashboard),
            "cleaner" | "sme_crm_cleaner" => Some(FunctionName::Cleaner),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionName::Main => "main",
            FunctionName::App => "app",
            FunctionName::Dashboard => "dashboard",
            FunctionName::Cleaner => "cleaner",
        }
    }

    pub fn profile(&self) -> &'static CorsProfile {
        match self {
            FunctionName::Main => &CorsProfile::MAIN,
            FunctionName::App => &CorsProfile::APP,
            FunctionName::Dashboard => &CorsProfile::DASHBOARD,
            FunctionName::Cleaner => &CorsProfile::CLEANER,
        }
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Serialize a response model. Failures here are on the output side.
fn to_payload<T: Serialize>(model: &T) -> Result<Value, AppError> {
    serde_json::to_value(model)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize response: {}", e)))
}

fn respond(status: StatusCode, profile: &CorsProfile, payload: Value) -> FunctionResponse {
    FunctionResponse::json(status, profile, &payload)
}

/// Run one function invocation to completion.
///
/// `OPTIONS` is answered as a CORS preflight before any routing. Any error
/// raised by the function is rendered with the function's own headers, so
/// this never fails.
pub fn invoke(function: FunctionName, state: &AppState, event: &FunctionEvent) -> FunctionResponse {
    tracing::info!(
        "Invoking function '{}': {} {}",
        function.as_str(),
        event.method(),
        event.path
    );
    if let Some(params) = &event.query_string_parameters {
        tracing::debug!("Query parameters: {:?}", params);
    }

    let profile = function.profile();
    if event.method() == "OPTIONS" {
        return FunctionResponse::preflight(profile);
    }

    let result = match function {
        FunctionName::Main => main_function(event),
        FunctionName::App => app_function(state, event),
        FunctionName::Dashboard => dashboard_function(state, event),
        FunctionName::Cleaner => cleaner_function(event),
    };

    let response = result.unwrap_or_else(|e| e.into_function_response(profile));
    tracing::debug!(
        "Function '{}' responded {}",
        function.as_str(),
        response.status_code
    );
    response
}

// ============ main ============

/// Health/status on GET, echo of the decoded body on POST.
pub fn main_function(event: &FunctionEvent) -> Result<FunctionResponse, AppError> {
    let profile = &CorsProfile::MAIN;

    match event.method() {
        "GET" => Ok(respond(
            StatusCode::OK,
            profile,
            json!({
                "status": "success",
                "message": "Sistema Qualificadora ativo",
                "service": "main",
                "version": SERVICE_VERSION,
            }),
        )),
        "POST" => {
            let data: Value = event.decode_body()?;
            Ok(respond(
                StatusCode::OK,
                profile,
                json!({
                    "status": "success",
                    "message": "Requisição processada com sucesso",
                    "data": data,
                    "timestamp": timestamp(),
                }),
            ))
        }
        _ => Err(AppError::MethodNotAllowed {
            message: "Método não permitido".to_string(),
            allowed: &["GET", "POST", "OPTIONS"],
        }),
    }
}

// ============ app ============

/// Lead CRUD, qualification, dashboard and status, routed by path.
///
/// Routing matches path substrings in the order `/leads`, `/qualificacao`,
/// `/dashboard`, `/status` (or exactly `/`).
pub fn app_function(state: &AppState, event: &FunctionEvent) -> Result<FunctionResponse, AppError> {
    let path = event.path.as_str();

    if path.contains("/leads") {
        handle_leads(state, event)
    } else if path.contains("/qualificacao") {
        handle_qualificacao(state, event)
    } else if path.contains("/dashboard") {
        handle_app_dashboard(state, event)
    } else if path.contains("/status") || path == "/" {
        Ok(handle_status(state))
    } else {
        Err(AppError::UnknownRoute {
            path: path.to_string(),
            available: APP_ENDPOINTS,
        })
    }
}

fn handle_leads(state: &AppState, event: &FunctionEvent) -> Result<FunctionResponse, AppError> {
    let profile = &CorsProfile::APP;

    match event.method() {
        "GET" => {
            let leads = state.leads.fetch_leads().context("Failed to fetch leads")?;
            let count = leads.len();
            Ok(respond(
                StatusCode::OK,
                profile,
                json!({
                    "status": "success",
                    "data": leads,
                    "count": count,
                }),
            ))
        }
        "POST" => {
            let data: LeadRecord = event.decode_body().context("Invalid lead payload")?;
            let existing = state.leads.fetch_leads().context("Failed to fetch leads")?;
            let lead = new_lead_record(existing.len(), &data);
            tracing::info!("Lead created: id={}", lead["id"]);
            Ok(respond(
                StatusCode::CREATED,
                profile,
                json!({
                    "status": "success",
                    "message": "Lead criado com sucesso",
                    "data": lead,
                }),
            ))
        }
        "PUT" => {
            let data: LeadRecord = event.decode_body().context("Invalid lead payload")?;
            let lead = updated_lead_record(&data);
            Ok(respond(
                StatusCode::OK,
                profile,
                json!({
                    "status": "success",
                    "message": "Lead atualizado com sucesso",
                    "data": lead,
                }),
            ))
        }
        _ => Err(AppError::MethodNotAllowed {
            message: "Método não permitido para /leads".to_string(),
            allowed: &["GET", "POST", "PUT"],
        }),
    }
}

fn handle_qualificacao(
    state: &AppState,
    event: &FunctionEvent,
) -> Result<FunctionResponse, AppError> {
    let profile = &CorsProfile::APP;
    let min_score = state.config.min_qualification_score;

    match event.method() {
        "POST" => {
            let data: LeadRecord = event
                .decode_body()
                .context("Invalid qualification payload")?;
            let resultado = to_payload(&qualify_lead(&data, min_score))?;
            Ok(respond(
                StatusCode::OK,
                profile,
                json!({
                    "status": "success",
                    "message": "Qualificação processada",
                    "resultado": resultado,
                }),
            ))
        }
        "GET" => {
            let criterios = to_payload(&criteria_table(min_score))?;
            Ok(respond(
                StatusCode::OK,
                profile,
                json!({
                    "status": "success",
                    "criterios": criterios,
                }),
            ))
        }
        _ => Err(AppError::MethodNotAllowed {
            message: "Método não permitido para /qualificacao".to_string(),
            allowed: &["GET", "POST"],
        }),
    }
}

fn dashboard_payload(state: &AppState) -> Result<Value, AppError> {
    let leads = state.leads.fetch_leads().context("Failed to fetch leads")?;
    let summary = to_payload(&summarize(&leads))?;
    Ok(json!({
        "status": "success",
        "dashboard": summary,
    }))
}

fn handle_app_dashboard(
    state: &AppState,
    event: &FunctionEvent,
) -> Result<FunctionResponse, AppError> {
    match event.method() {
        "GET" => Ok(respond(
            StatusCode::OK,
            &CorsProfile::APP,
            dashboard_payload(state)?,
        )),
        _ => Err(AppError::MethodNotAllowed {
            message: "Método não permitido para /dashboard".to_string(),
            allowed: &["GET"],
        }),
    }
}

fn handle_status(state: &AppState) -> FunctionResponse {
    respond(
        StatusCode::OK,
        &CorsProfile::APP,
        json!({
            "status": "ativo",
            "service": "qualificadora-app",
            "version": SERVICE_VERSION,
            "timestamp": timestamp(),
            "environment": state.config.environment,
        }),
    )
}

// ============ dashboard ============

pub fn dashboard_function(
    state: &AppState,
    event: &FunctionEvent,
) -> Result<FunctionResponse, AppError> {
    match event.method() {
        "GET" => Ok(respond(
            StatusCode::OK,
            &CorsProfile::DASHBOARD,
            dashboard_payload(state)?,
        )),
        _ => Err(AppError::MethodNotAllowed {
            message: "Método não permitido".to_string(),
            allowed: &["GET"],
        }),
    }
}

// ============ cleaner ============

/// CRM data cleaning: service info on GET, operation dispatch on POST.
pub fn cleaner_function(event: &FunctionEvent) -> Result<FunctionResponse, AppError> {
    let profile = &CorsProfile::CLEANER;

    match event.method() {
        "POST" => {
            let fields: LeadRecord = event
                .decode_body()
                .context("Invalid cleaner request")?;
            let request: CleanerRequest = serde_json::from_value(Value::Object(fields))
                .map_err(AppError::InvalidBody)
                .context("Invalid cleaner request")?;
            let (operation, result) = run_cleaning_operation(request)?;
            Ok(respond(
                StatusCode::OK,
                profile,
                json!({
                    "status": "success",
                    "operation": operation.as_str(),
                    "result": result,
                    "processed_at": timestamp(),
                }),
            ))
        }
        "GET" => {
            let operations: Map<String, Value> = CleaningOperation::ALL
                .iter()
                .map(|op| (op.as_str().to_string(), json!(op.description())))
                .collect();
            Ok(respond(
                StatusCode::OK,
                profile,
                json!({
                    "status": "ativo",
                    "service": "sme-crm-cleaner",
                    "version": SERVICE_VERSION,
                    "operations": operations,
                }),
            ))
        }
        _ => Err(AppError::MethodNotAllowed {
            message: "Método não permitido".to_string(),
            allowed: &["GET", "POST"],
        }),
    }
}

/// Dispatch a cleaner request to its operation.
pub fn run_cleaning_operation(
    request: CleanerRequest,
) -> Result<(CleaningOperation, Value), AppError> {
    let operation = CleaningOperation::parse(request.operation_name()).ok_or_else(|| {
        AppError::UnknownOperation {
            operation: request.operation_name().to_string(),
            available: CleaningOperation::NAMES,
        }
    })?;

    tracing::info!("Running cleaner operation: {}", operation.as_str());

    let result = match operation {
        CleaningOperation::CleanLead => {
            Value::Object(clean_lead_data(&request.lead_data.unwrap_or_default()))
        }
        CleaningOperation::NormalizeContact => Value::Object(normalize_contact_data(
            &request.contact_data.unwrap_or_default(),
        )),
        CleaningOperation::ValidateCompany => to_payload(&validate_company_data(
            &request.company_data.unwrap_or_default(),
        ))?,
        CleaningOperation::Deduplicate => {
            to_payload(&deduplicate_leads(&request.leads_list.unwrap_or_default()))?
        }
    };

    Ok((operation, result))
}
