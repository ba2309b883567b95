use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use edubot_events::bus::EventBus;
use edubot_serve::AppState;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

fn test_app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState {
        db_path: dir.path().join("edubot.db").to_string_lossy().to_string(),
        docs_dir: dir.path().join("docs"),
        static_dir: None,
        event_bus: EventBus::new(64),
        inference: None,
    };
    (dir, edubot_serve::app(state))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn message_answers_with_keyword_intent() {
    let (_dir, app) = test_app();
    let response = app
        .oneshot(post_json(
            "/api/message",
            json!({"text": "¿Cuál es el horario?"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["intent"], "horario");
    assert_eq!(body["reply"], "El horario escolar es L-V 7:00 - 12:00.");
}

#[tokio::test]
async fn message_logs_both_directions() {
    let (_dir, app) = test_app();
    app.clone()
        .oneshot(post_json(
            "/api/message",
            json!({"text": "hola", "channel": "app"}),
        ))
        .await
        .unwrap();
    let response = app.oneshot(get("/api/logs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event_type"], "message_received");
    assert_eq!(events[1]["event_type"], "message_sent");
    assert_eq!(events[1]["channel"], "app");
    assert!(events[0]["timestamp"].as_i64().unwrap() >= events[1]["timestamp"].as_i64().unwrap());
}

#[tokio::test]
async fn chat_uses_the_legacy_contract() {
    let (_dir, app) = test_app();
    let response = app
        .oneshot(post_json("/api/chat", json!({"pregunta": "matrícula"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(
        body["respuesta"]
            .as_str()
            .unwrap()
            .contains("documento de identidad")
    );
}

#[tokio::test]
async fn tramite_submission_round_trip() {
    let (_dir, app) = test_app();
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/tramite",
            json!({"tipo": "constancia", "nombre": "Ana", "grado": "5to", "motivo": "beca"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["id"], 1);
    assert_eq!(body["pdf"], "tramite_1.pdf");

    let response = app.clone().oneshot(get("/api/tramites")).await.unwrap();
    let body = read_json(response).await;
    let tramites = body.as_array().unwrap();
    assert_eq!(tramites.len(), 1);
    assert_eq!(tramites[0]["nombre"], "Ana");
    assert_eq!(tramites[0]["extra"]["motivo"], "beca");

    let response = app
        .oneshot(get("/api/descargar-pdf/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("tramite_1.pdf"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn tramite_missing_fields_is_rejected_without_persistence() {
    let (_dir, app) = test_app();
    let response = app
        .clone()
        .oneshot(post_json("/api/tramite", json!({"tipo": "constancia"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["code"], "invalid_input");
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("nombre"));
    assert!(error.contains("grado"));

    let response = app.oneshot(get("/api/tramites")).await.unwrap();
    let body = read_json(response).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn download_unknown_document_is_not_found() {
    let (_dir, app) = test_app();
    let response = app.oneshot(get("/api/descargar-pdf/99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["code"], "not_found");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn correlation_header_is_echoed() {
    let (_dir, app) = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-correlation-id", "corr_test")
        .body(Body::from(json!({"pregunta": "hola"}).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-correlation-id"], "corr_test");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (_dir, app) = test_app();
    let response = app.oneshot(get("/api/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["paths"]["/api/tramite"].is_object());
}
