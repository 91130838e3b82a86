use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use vulnguard_core::constants::CALIBRATION_SCORE;
use vulnguard_core::logic::dataset::to_table;
use vulnguard_core::logic::model::to_json;
use vulnguard_core::{train_with, ForestConfig, Sample};

use super::analyze::MISSING_CODE;
use crate::config::Config;
use crate::{create_router, AppState};

const VULNERABLE: [&str; 3] = [
    "query = \"SELECT * FROM users WHERE id = '\" + user_id + \"'\"",
    "cursor.execute('DELETE FROM orders WHERE id = ' + order_id)",
    "sql = \"INSERT INTO logs VALUES ('\" + msg + \"')\"",
];
const SAFE: [&str; 3] = [
    "let total = items.iter().map(|i| i.price).sum::<u64>();",
    "const MAX_RETRIES: usize = 3;",
    "return Ok(value);",
];

fn test_config(training_data_path: String) -> Config {
    Config {
        port: 0,
        training_data_path,
        model_path: None,
        forest: ForestConfig {
            n_estimators: 5,
            ..Default::default()
        },
        calibration_score: CALIBRATION_SCORE,
        environment: "test".to_string(),
    }
}

/// State whose training table lives in a temp dir
fn corpus() -> Vec<Sample> {
    let mut samples = Vec::new();
    for _ in 0..5 {
        samples.extend(VULNERABLE.iter().map(|s| Sample::from_snippet(s, true)));
        samples.extend(SAFE.iter().map(|s| Sample::from_snippet(s, false)));
    }
    samples
}

fn state_with_table() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train_features.csv");
    std::fs::write(&path, to_table(&corpus())).unwrap();

    let config = test_config(path.to_string_lossy().into_owned());
    (AppState::new(config), dir)
}

fn fallback_state() -> AppState {
    AppState::new(test_config("/nonexistent/train_features.csv".to_string()))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_in_fallback_mode() {
    let (status, body) = send(create_router(fallback_state()), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["service"], "Vulnerability Detection API");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_analyze_requires_code() {
    for payload in ["{}", "{\"code\": null}", "{not json", "\"just text\""] {
        let (status, body) =
            send(create_router(fallback_state()), "POST", "/analyze", Some(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(body["error"], MISSING_CODE);
        assert_eq!(body["status"], 400);
    }
}

#[tokio::test]
async fn test_analyze_fallback_exec() {
    let (status, body) = send(
        create_router(fallback_state()),
        "POST",
        "/analyze",
        Some(r#"{"code": "os.exec(user_cmd)"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 1);
    assert_eq!(body["prob_vulnerable"], 0.85);
    assert_eq!(body["alert_level"], "CRITICA");
    assert_eq!(body["method"], "fallback");
    assert_eq!(body["patterns_detected"][0], "Funciones peligrosas/deprecated");
    assert_eq!(body["features"].as_object().unwrap().len(), 13);
}

#[tokio::test]
async fn test_analyze_coerces_non_string_code() {
    let (status, body) =
        send(create_router(fallback_state()), "POST", "/analyze", Some(r#"{"code": 12345}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 0);
    assert_eq!(body["features"]["length"], 5.0);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = send(create_router(fallback_state()), "GET", "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_stats_in_demo_mode() {
    let (status, body) = send(create_router(fallback_state()), "GET", "/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_type"], "Mock");
    assert_eq!(body["trained"], false);
    assert_eq!(body["message"], "Modelo en modo demo");
}

#[tokio::test]
async fn test_diff_endpoint() {
    let app = create_router(fallback_state());
    let payload = serde_json::json!({ "diff": "+os.system(cmd)\n-old\n+x = 1" }).to_string();
    let (status, body) = send(app.clone(), "POST", "/analyze/diff", Some(&payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_lines_analyzed"], 2);
    assert_eq!(body["summary"]["medium_risk_lines"], 1);
    assert_eq!(body["lines"][0]["risk_score"], 4);

    let (status, body) = send(app.clone(), "POST", "/analyze/diff", Some(r#"{"diff": ""}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_lines_analyzed"], 0);

    let (status, _) = send(app, "POST", "/analyze/diff", Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reload_failure_keeps_fallback() {
    let state = fallback_state();
    let (status, body) = send(create_router(state.clone()), "POST", "/model/reload", None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    assert!(!state.models.is_loaded());
}

#[tokio::test]
async fn test_reload_trains_and_swaps() {
    let (state, _dir) = state_with_table();
    let app = create_router(state.clone());

    let (status, body) = send(app.clone(), "POST", "/model/reload", None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["reloaded"], true);
    assert_eq!(body["n_estimators"], 5);
    assert_eq!(body["training_samples"], 30);
    assert!(state.models.is_loaded());

    let (_, stats) = send(app.clone(), "GET", "/stats", None).await;
    assert_eq!(stats["model_type"], "RandomForestClassifier");
    assert_eq!(stats["trained"], true);
    assert_eq!(stats["n_features"], 13);
    assert_eq!(stats["min_samples_leaf"], 5);

    let (_, health) = send(app.clone(), "GET", "/health", None).await;
    assert_eq!(health["model_loaded"], true);

    let (status, result) = send(
        app,
        "POST",
        "/analyze",
        Some(r#"{"code": "let x = 1;"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["method"], "random_forest");
    let total = result["prob_safe"].as_f64().unwrap() + result["prob_vulnerable"].as_f64().unwrap();
    assert!((total - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_reload_refuses_corrupt_model_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");

    let config = ForestConfig { n_estimators: 3, ..Default::default() };
    let model = train_with(&corpus(), &config).unwrap();
    let mut json: Value = serde_json::from_str(&to_json(&model).unwrap()).unwrap();
    for tree in json["forest"]["trees"].as_array_mut().unwrap() {
        tree["nodes"][0] = serde_json::json!({
            "kind": "split", "feature": 99, "threshold": 0.5, "left": 0, "right": 0
        });
    }
    std::fs::write(&path, json.to_string()).unwrap();

    let mut config = test_config("/nonexistent/train_features.csv".to_string());
    config.model_path = Some(path.to_string_lossy().into_owned());
    let state = AppState::new(config);
    let app = create_router(state.clone());

    let (status, body) = send(app.clone(), "POST", "/model/reload", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("corrupt model"), "{}", body);
    assert!(!state.models.is_loaded());

    let (status, result) =
        send(app, "POST", "/analyze", Some(r#"{"code": "eval(x)"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["method"], "fallback");
}
