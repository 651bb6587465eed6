/// Router tests: drive the HTTP gateway end to end with in-process requests
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use qualificadora_api::config::Config;
use qualificadora_api::handlers::AppState;
use qualificadora_api::lead_source::InMemoryLeadSource;
use qualificadora_api::routes::router;

fn test_app() -> Router {
    let state = AppState {
        config: Config {
            port: 0,
            environment: "test".to_string(),
            leads_file: None,
            body_limit_bytes: 64 * 1024,
            min_qualification_score: 70,
        },
        leads: Arc::new(InMemoryLeadSource::seeded()),
    };
    router(Arc::new(state))
}

async fn send(method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_cleaner_deduplicate_over_http() {
    let payload = json!({
        "operation": "deduplicate",
        "leads_list": [
            {"email": "a@x.com"},
            {"email": "A@X.com"},
            {"telefone": "11 2222-3333"}
        ]
    });

    let (status, body) = send(Method::POST, "/api/cleaner", Some(payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["operation"], "deduplicate");
    assert_eq!(body["result"]["unique_count"], 2);
    assert_eq!(body["result"]["duplicates_found"][0]["index"], 1);
    assert!(body["processed_at"].is_string());
}

#[tokio::test]
async fn test_legacy_function_path() {
    let payload = json!({"operation": "clean_lead", "lead_data": {"nome": "ana souza"}});
    let (status, body) =
        send(Method::POST, "/.netlify/functions/sme_crm_cleaner", Some(payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["nome"], "Ana Souza");
}

#[tokio::test]
async fn test_preflight_carries_cors_headers() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/app/leads")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_unknown_operation_is_bad_request() {
    let (status, body) = send(
        Method::POST,
        "/api/cleaner",
        Some(json!({"operation": "merge"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Operação não reconhecida");
    assert_eq!(
        body["available_operations"],
        json!(["clean_lead", "normalize_contact", "validate_company", "deduplicate"])
    );
}

#[tokio::test]
async fn test_app_unknown_path_is_not_found() {
    let (status, body) = send(Method::GET, "/api/app/nada", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint não encontrado");
    assert_eq!(
        body["available_endpoints"],
        json!(["/leads", "/qualificacao", "/dashboard", "/status"])
    );
}

#[tokio::test]
async fn test_app_leads_and_qualification() {
    let (status, body) = send(Method::GET, "/api/app/leads", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = send(
        Method::POST,
        "/api/app/leads",
        Some(json!({"nome": "Carla"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 3);

    let lead = json!({
        "lead_id": 7,
        "empresa": "Acme",
        "cargo": "Gerente Comercial",
        "orcamento": 20000,
        "necessidade_urgente": true
    });
    let (status, body) = send(Method::POST, "/api/app/qualificacao", Some(lead)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resultado"]["lead_id"], 7);
    assert_eq!(body["resultado"]["pontuacao"], 90);
    assert_eq!(body["resultado"]["status"], "qualificado");
}

#[tokio::test]
async fn test_dashboard_rejects_post() {
    let (status, body) = send(Method::POST, "/api/dashboard", Some(json!({}))).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["allowed_methods"], json!(["GET"]));
}

#[tokio::test]
async fn test_dashboard_summary() {
    let (status, body) = send(Method::GET, "/api/dashboard", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dashboard"]["total_leads"], 2);
    assert_eq!(body["dashboard"]["leads_qualificados"], 1);
    assert_eq!(body["dashboard"]["leads_em_analise"], 1);
    assert_eq!(body["dashboard"]["pontuacao_media"], 78.5);
}

#[tokio::test]
async fn test_malformed_json_is_internal_error() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/cleaner")
        .body(Body::from("{not json"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Erro interno do servidor");
    assert!(body["message"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_invoke_returns_envelope() {
    let event = json!({
        "httpMethod": "POST",
        "path": "/",
        "body": "{\"operation\": \"validate_company\", \"company_data\": {\"cnpj\": \"123\"}}"
    });

    let (status, envelope) = send(Method::POST, "/invoke/cleaner", Some(event)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope["statusCode"], 200);
    assert_eq!(envelope["headers"]["Access-Control-Allow-Origin"], "*");

    let body: Value = serde_json::from_str(envelope["body"].as_str().unwrap()).unwrap();
    assert_eq!(body["result"]["is_valid"], false);
    assert_eq!(body["result"]["errors"], json!(["CNPJ inválido"]));
}

#[tokio::test]
async fn test_unknown_function_is_not_found() {
    let (status, body) = send(Method::GET, "/api/billing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["available_functions"],
        json!(["main", "app", "dashboard", "cleaner"])
    );
}

#[tokio::test]
async fn test_unmatched_route_lists_gateway_routes() {
    let (status, body) = send(Method::GET, "/nowhere", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["available_endpoints"].is_array());
}

async fn send_raw(method: Method, uri: &str, body: Body) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();
    test_app().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_gateway_routes_answer_preflight() {
    for uri in ["/invoke/cleaner", "/health"] {
        let response = send_raw(Method::OPTIONS, uri, Body::empty()).await;

        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}

#[tokio::test]
async fn test_gateway_routes_list_allowed_methods() {
    let (status, body) = send(Method::GET, "/invoke/cleaner", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["allowed_methods"], json!(["POST"]));

    let response = send_raw(Method::DELETE, "/health", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["allowed_methods"], json!(["GET"]));
}

#[tokio::test]
async fn test_cleaner_array_body_is_internal_error() {
    let (status, body) = send(Method::POST, "/api/cleaner", Some(json!([]))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Erro interno do servidor");
}

#[tokio::test]
async fn test_invalid_utf8_body_is_internal_error() {
    let body = Body::from(vec![b'{', 0xff, 0xfe, b'}']);
    let response = send_raw(Method::POST, "/api/cleaner", body).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("not valid UTF-8"));
}

#[tokio::test]
async fn test_invoke_with_malformed_event() {
    let response = send_raw(Method::POST, "/invoke/cleaner", Body::from("not an event")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid event for function 'cleaner'"));
}
