mod common;

use axum::{Router, routing::post};
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use links_checker::api::handlers::report_handler;
use links_checker::domain::entities::LinkStatus;
use links_checker::state::AppState;

fn make_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/api/report", post(report_handler))
        .with_state(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_report_success() {
    let dir = TempDir::new().unwrap();
    let state = common::create_test_state(&dir).await;
    let first =
        common::create_checked_batch(&state, &[("https://ok.test", LinkStatus::Available)]).await;
    let second =
        common::create_checked_batch(&state, &[("https://gone.test", LinkStatus::Unavailable)])
            .await;
    let server = make_server(state);

    let response = server
        .post("/api/report")
        .json(&json!({ "links_num": [second, first] }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.header("content-disposition").to_str().unwrap(),
        "attachment; filename=\"report.txt\""
    );

    let body = response.text();
    assert!(body.starts_with("Links check report"));
    let second_at = body.find("Batch ID: 2").unwrap();
    let first_at = body.find("Batch ID: 1").unwrap();
    assert!(second_at < first_at);
    assert!(body.contains("https://gone.test"));
    assert!(body.contains("unexpected status code: 404"));
}

#[tokio::test]
async fn test_report_unknown_batch() {
    let dir = TempDir::new().unwrap();
    let state = common::create_test_state(&dir).await;
    common::create_checked_batch(&state, &[("https://ok.test", LinkStatus::Available)]).await;
    let server = make_server(state);

    let response = server
        .post("/api/report")
        .json(&json!({ "links_num": [1, 999] }))
        .await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["message"], "batch 999 not found");
}

#[tokio::test]
async fn test_report_empty_ids() {
    let dir = TempDir::new().unwrap();
    let server = make_server(common::create_test_state(&dir).await);

    let response = server
        .post("/api/report")
        .json(&json!({ "links_num": [] }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}
