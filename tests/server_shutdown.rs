mod common;

use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use links_checker::domain::entities::{BatchStatus, LinkStatus};
use links_checker::domain::repositories::BatchRepository;
use links_checker::infrastructure::persistence::FileBatchRepository;
use links_checker::server::finish;

#[tokio::test]
async fn test_finish_waits_for_detached_check_before_flush() {
    let dir = TempDir::new().unwrap();
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&upstream)
        .await;

    let state = common::create_test_state(&dir).await;
    let service = state.links_service.clone();
    let token = state.shutdown.child_token();
    let urls = vec![format!("{}/slow", upstream.uri())];

    // Nobody awaits this handle, as after a client disconnect.
    state.checks.spawn(async move {
        let _ = service.create_and_check_batch(&urls, token).await;
    });

    // Wait until the batch is stored as in progress and its request is in flight.
    for _ in 0..100 {
        if let Ok(batch) = state.repository.get_batch(1).await
            && batch.status() == BatchStatus::InProgress
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_millis(100)).await;

    finish(&state).await.unwrap();
    assert!(state.checks.is_empty());

    let reopened = FileBatchRepository::open(dir.path().join("state.json"))
        .await
        .unwrap();
    let batch = reopened.get_batch(1).await.unwrap();
    assert_eq!(batch.status(), BatchStatus::Done);
    assert_eq!(batch.results()[0].status, LinkStatus::Unavailable);
    assert_eq!(batch.results()[0].error.as_deref(), Some("request cancelled"));
}

#[tokio::test]
async fn test_finish_flushes_idle_store() {
    let dir = TempDir::new().unwrap();
    let state = common::create_test_state(&dir).await;

    finish(&state).await.unwrap();

    assert!(state.shutdown.is_cancelled());
    assert!(dir.path().join("state.json").exists());
}
