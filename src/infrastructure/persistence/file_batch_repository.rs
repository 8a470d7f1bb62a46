//! JSON file implementation of the batch repository.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::domain::entities::{BatchId, LinkBatch};
use crate::domain::repositories::BatchRepository;
use crate::error::AppError;

const FIRST_BATCH_ID: BatchId = 1;

/// On-disk document: `{ "next_id": <int>, "batches": [ ... ] }`.
#[derive(Deserialize)]
struct StoreFile {
    next_id: BatchId,
    batches: Vec<LinkBatch>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    next_id: BatchId,
    batches: Vec<&'a LinkBatch>,
}

struct StoreState {
    next_id: BatchId,
    batches: BTreeMap<BatchId, LinkBatch>,
}

impl StoreState {
    fn empty() -> Self {
        Self {
            next_id: FIRST_BATCH_ID,
            batches: BTreeMap::new(),
        }
    }
}

/// Batch store kept in memory and mirrored to a single JSON file.
///
/// Every write serializes the whole store to a sibling temp file and renames
/// it over the backing file, so readers of the file never see a partial
/// document. One [`RwLock`] guards both the map and the file: lookups run
/// concurrently, saves are exclusive for the whole serialize-and-rename step.
pub struct FileBatchRepository {
    path: PathBuf,
    state: RwLock<StoreState>,
    write_failed: AtomicBool,
}

impl FileBatchRepository {
    /// Loads the store from `path`, or starts empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the file exists but cannot be read
    /// or parsed. Callers must treat this as fatal.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => Self::decode(&path, &bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No batch store found, starting empty");
                StoreState::empty()
            }
            Err(e) => {
                return Err(AppError::persistence(
                    "Failed to read batch store",
                    json!({ "path": path.display().to_string(), "reason": e.to_string() }),
                ));
            }
        };

        tracing::info!(
            path = %path.display(),
            batches = state.batches.len(),
            next_id = state.next_id,
            "Batch store loaded"
        );

        Ok(Self {
            path,
            state: RwLock::new(state),
            write_failed: AtomicBool::new(false),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored batches.
    pub async fn len(&self) -> usize {
        self.state.read().await.batches.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether the most recent write to the backing file failed. Cleared by
    /// the next successful write.
    pub fn last_write_failed(&self) -> bool {
        self.write_failed.load(Ordering::Relaxed)
    }

    /// Rewrites the backing file from memory. Called on shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the file could not be written.
    pub async fn flush(&self) -> Result<(), AppError> {
        let state = self.state.write().await;
        self.write_snapshot(&state).await?;
        tracing::info!(path = %self.path.display(), "Batch store flushed");
        Ok(())
    }

    fn decode(path: &Path, bytes: &[u8]) -> Result<StoreState, AppError> {
        let file: StoreFile = serde_json::from_slice(bytes).map_err(|e| {
            AppError::persistence(
                "Batch store is corrupt",
                json!({ "path": path.display().to_string(), "reason": e.to_string() }),
            )
        })?;

        let corrupt = |reason: String| {
            AppError::persistence(
                "Batch store is corrupt",
                json!({ "path": path.display().to_string(), "reason": reason }),
            )
        };

        let mut batches: BTreeMap<BatchId, LinkBatch> = BTreeMap::new();
        for batch in file.batches {
            if let Some(reason) = batch.integrity_error() {
                return Err(corrupt(reason));
            }
            let id = batch.id();
            if batches.insert(id, batch).is_some() {
                return Err(corrupt(format!("batch {id} is stored twice")));
            }
        }

        // Never hand out an ID at or below one already on disk.
        let after_highest = batches.keys().next_back().map_or(FIRST_BATCH_ID, |id| id + 1);
        let next_id = file.next_id.max(after_highest).max(FIRST_BATCH_ID);

        Ok(StoreState { next_id, batches })
    }

    async fn write_snapshot(&self, state: &StoreState) -> Result<(), AppError> {
        let document = StoreFileRef {
            next_id: state.next_id,
            batches: state.batches.values().collect(),
        };
        let bytes = serde_json::to_vec(&document).map_err(|e| {
            AppError::persistence(
                "Failed to serialize batch store",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let tmp = self.tmp_path();
        let written = self.replace_file(&tmp, &bytes).await;
        self.write_failed.store(written.is_err(), Ordering::Relaxed);
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            tracing::error!(path = %self.path.display(), error = %e, "Failed to write batch store");
            return Err(AppError::persistence(
                "Failed to write batch store",
                json!({ "path": self.path.display().to_string(), "reason": e.to_string() }),
            ));
        }

        Ok(())
    }

    async fn replace_file(&self, tmp: &Path, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(tmp, &self.path).await
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl BatchRepository for FileBatchRepository {
    async fn next_batch_id(&self) -> Result<BatchId, AppError> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id = id.checked_add(1).ok_or_else(|| {
            AppError::internal("Batch ID space exhausted", json!({ "next_id": id }))
        })?;
        Ok(id)
    }

    async fn save_batch(&self, batch: &LinkBatch) -> Result<(), AppError> {
        let mut state = self.state.write().await;

        let previous_next_id = state.next_id;
        let previous = state.batches.insert(batch.id(), batch.clone());
        if batch.id() >= state.next_id {
            state.next_id = batch.id().saturating_add(1);
        }

        if let Err(e) = self.write_snapshot(&state).await {
            // Keep memory identical to what is on disk.
            match previous {
                Some(old) => state.batches.insert(batch.id(), old),
                None => state.batches.remove(&batch.id()),
            };
            state.next_id = previous_next_id;
            return Err(e);
        }

        tracing::debug!(
            id = batch.id(),
            status = batch.status().as_str(),
            "Batch saved"
        );
        Ok(())
    }

    async fn get_batch(&self, id: BatchId) -> Result<LinkBatch, AppError> {
        let state = self.state.read().await;
        state
            .batches
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("batch {id} not found"), json!({ "id": id })))
    }

    async fn get_batches(&self, ids: &[BatchId]) -> Result<Vec<LinkBatch>, AppError> {
        let state = self.state.read().await;
        ids.iter()
            .map(|id| {
                state.batches.get(id).cloned().ok_or_else(|| {
                    AppError::not_found(format!("batch {id} not found"), json!({ "id": id }))
                })
            })
            .collect()
    }

    async fn list_batches_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<LinkBatch>, usize), AppError> {
        let state = self.state.read().await;
        let page = state
            .batches
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((page, state.batches.len()))
    }

    async fn list_batches(&self) -> Result<Vec<LinkBatch>, AppError> {
        let state = self.state.read().await;
        Ok(state.batches.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BatchStatus;

    #[test]
    fn test_decode_raises_watermark_past_highest_id() {
        let batch = LinkBatch::new(9, &["https://a.test"]).unwrap();
        let doc = serde_json::to_vec(&StoreFileRef {
            next_id: 3,
            batches: vec![&batch],
        })
        .unwrap();

        let state = FileBatchRepository::decode(Path::new("state.json"), &doc).unwrap();
        assert_eq!(state.next_id, 10);
        assert_eq!(state.batches[&9].status(), BatchStatus::Created);
    }

    #[test]
    fn test_decode_seeds_zero_watermark() {
        let state =
            FileBatchRepository::decode(Path::new("state.json"), br#"{"next_id":0,"batches":[]}"#)
                .unwrap();
        assert_eq!(state.next_id, FIRST_BATCH_ID);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = FileBatchRepository::decode(Path::new("state.json"), b"{\"next_id\": 1, \"bat")
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Persistence { .. }));
    }

    fn corrupt_reason(doc: &serde_json::Value) -> String {
        let bytes = serde_json::to_vec(doc).unwrap();
        match FileBatchRepository::decode(Path::new("state.json"), &bytes) {
            Err(AppError::Persistence { message, details }) => {
                assert_eq!(message, "Batch store is corrupt");
                details["reason"].as_str().unwrap().to_string()
            }
            Err(e) => panic!("expected corrupt store, got {e:?}"),
            Ok(_) => panic!("expected corrupt store, store was accepted"),
        }
    }

    fn batch_json(id: BatchId) -> serde_json::Value {
        serde_json::to_value(LinkBatch::new(id, &["https://a.test", "https://b.test"]).unwrap())
            .unwrap()
    }

    #[test]
    fn test_decode_rejects_results_shorter_than_links() {
        let mut batch = batch_json(1);
        batch["results"] = json!([{ "url": "https://zzz.test", "status": "unknown" }]);

        let reason = corrupt_reason(&json!({ "next_id": 2, "batches": [batch] }));
        assert_eq!(reason, "batch 1 has 2 links but 1 results");
    }

    #[test]
    fn test_decode_rejects_result_for_other_url() {
        let mut batch = batch_json(1);
        batch["results"][1]["url"] = json!("https://zzz.test");

        let reason = corrupt_reason(&json!({ "next_id": 2, "batches": [batch] }));
        assert_eq!(reason, "batch 1 result 1 does not match its link");
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let reason = corrupt_reason(&json!({
            "next_id": 2,
            "batches": [batch_json(1), batch_json(1)],
        }));
        assert_eq!(reason, "batch 1 is stored twice");
    }

    #[test]
    fn test_tmp_path_is_sibling() {
        let repo = FileBatchRepository {
            path: PathBuf::from("data/state.json"),
            state: RwLock::new(StoreState::empty()),
            write_failed: AtomicBool::new(false),
        };
        assert_eq!(repo.tmp_path(), PathBuf::from("data/state.json.tmp"));
    }
}
