#![allow(dead_code)]

use links_checker::config::Config;
use links_checker::domain::entities::{BatchId, LinkBatch, LinkStatus};
use links_checker::domain::repositories::BatchRepository;
use links_checker::server::build_state;
use links_checker::state::AppState;
use std::path::Path;
use tempfile::TempDir;

pub fn test_config(state_path: &Path) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        state_path: state_path.to_path_buf(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        max_workers: 5,
        probe_timeout_secs: 2,
        batch_deadline_secs: None,
        report_title: "Links check report".to_string(),
    }
}

/// Builds application state over a fresh store inside `dir`.
pub async fn create_test_state(dir: &TempDir) -> AppState {
    create_test_state_at(&dir.path().join("state.json")).await
}

pub async fn create_test_state_at(state_path: &Path) -> AppState {
    build_state(&test_config(state_path)).await.unwrap()
}

/// Stores a finished batch directly, bypassing the checker.
pub async fn create_checked_batch(state: &AppState, results: &[(&str, LinkStatus)]) -> BatchId {
    let id = state.repository.next_batch_id().await.unwrap();
    let urls: Vec<&str> = results.iter().map(|(url, _)| *url).collect();

    let mut batch = LinkBatch::new(id, &urls).unwrap();
    state.repository.save_batch(&batch).await.unwrap();

    batch.start_processing().unwrap();
    for (index, (_, status)) in results.iter().enumerate() {
        let error = match status {
            LinkStatus::Unavailable => Some("unexpected status code: 404".to_string()),
            _ => None,
        };
        batch.record_result_at(index, *status, error);
    }
    state.repository.save_batch(&batch).await.unwrap();

    id
}
