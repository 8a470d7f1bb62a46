//! Link batch aggregate and its lifecycle state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;

/// Batch identity. Allocated by the repository, strictly increasing.
pub type BatchId = u64;

/// Availability of a single link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Unknown,
    Available,
    Unavailable,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Unknown => "unknown",
            LinkStatus::Available => "available",
            LinkStatus::Unavailable => "unavailable",
        }
    }
}

/// Lifecycle of a batch: `created -> in_progress -> done`, with `failed`
/// reachable from either non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Created,
    InProgress,
    Done,
    Failed,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Created => "created",
            BatchStatus::InProgress => "in_progress",
            BatchStatus::Done => "done",
            BatchStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Done | BatchStatus::Failed)
    }
}

/// A single URL within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// Outcome of checking one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkResult {
    #[serde(flatten)]
    pub link: Link,
    pub status: LinkStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One unit of work: an ordered set of links and one result per link.
///
/// Links are fixed at construction. Results are only written through
/// [`LinkBatch::record_result`] / [`LinkBatch::record_result_at`], which take
/// `&mut self`; concurrent probe completions are funnelled through a single
/// owner (see [`crate::infrastructure::checker::ConcurrentChecker`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkBatch {
    id: BatchId,
    links: Vec<Link>,
    results: Vec<LinkResult>,
    status: BatchStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LinkBatch {
    /// Builds a batch in `created` status with every result `unknown`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `urls` is empty or contains only
    /// blank entries.
    pub fn new<S: AsRef<str>>(id: BatchId, urls: &[S]) -> Result<Self, AppError> {
        let links = Self::parse_links(urls)?;
        Ok(Self::from_links(id, links))
    }

    /// Drops blank entries; the rest are kept verbatim.
    ///
    /// Exposed separately so callers can reject bad input before spending a
    /// batch ID on it.
    pub fn parse_links<S: AsRef<str>>(urls: &[S]) -> Result<Vec<Link>, AppError> {
        if urls.is_empty() {
            return Err(AppError::bad_request("urls must not be empty", json!({})));
        }

        let links: Vec<Link> = urls
            .iter()
            .map(AsRef::as_ref)
            .filter(|url| !url.trim().is_empty())
            .map(|url| Link {
                url: url.to_string(),
            })
            .collect();

        if links.is_empty() {
            return Err(AppError::bad_request(
                "no valid urls provided",
                json!({ "received": urls.len() }),
            ));
        }

        Ok(links)
    }

    /// Builds a batch from links already validated by [`Self::parse_links`].
    pub(crate) fn from_links(id: BatchId, links: Vec<Link>) -> Self {
        let now = Utc::now();
        let results = links
            .iter()
            .map(|link| LinkResult {
                link: link.clone(),
                status: LinkStatus::Unknown,
                error: None,
            })
            .collect();

        Self {
            id,
            links,
            results,
            status: BatchStatus::Created,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn results(&self) -> &[LinkResult] {
        &self.results
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Number of results still `unknown`.
    pub fn pending_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == LinkStatus::Unknown)
            .count()
    }

    /// Transitions `created -> in_progress`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidState`] from any other status; the status is
    /// left untouched.
    pub fn start_processing(&mut self) -> Result<(), AppError> {
        if self.status != BatchStatus::Created {
            return Err(AppError::invalid_state(
                "batch must be in 'created' status",
                json!({ "id": self.id, "status": self.status.as_str() }),
            ));
        }
        self.status = BatchStatus::InProgress;
        self.touch();
        Ok(())
    }

    /// Marks a non-terminal batch as `failed`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidState`] if the batch is already `done` or
    /// `failed`.
    pub fn fail(&mut self) -> Result<(), AppError> {
        if self.status.is_terminal() {
            return Err(AppError::invalid_state(
                "batch is already finished",
                json!({ "id": self.id, "status": self.status.as_str() }),
            ));
        }
        self.status = BatchStatus::Failed;
        self.touch();
        Ok(())
    }

    /// Records the outcome for the first link whose URL equals `url`.
    ///
    /// Returns `false` when no link matches or the batch is already finished.
    pub fn record_result(&mut self, url: &str, status: LinkStatus, error: Option<String>) -> bool {
        match self.links.iter().position(|link| link.url == url) {
            Some(index) => self.record_result_at(index, status, error),
            None => false,
        }
    }

    /// Records the outcome for the link at `index` (creation order).
    ///
    /// Completes the batch once no result is `unknown` while `in_progress`.
    /// Returns `false` when `index` is out of range or the batch is already
    /// finished.
    pub fn record_result_at(
        &mut self,
        index: usize,
        status: LinkStatus,
        error: Option<String>,
    ) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        let Some(result) = self.results.get_mut(index) else {
            return false;
        };

        result.status = status;
        result.error = error;
        self.touch();

        if self.status == BatchStatus::InProgress && self.pending_count() == 0 {
            self.status = BatchStatus::Done;
            self.touch();
        }

        true
    }

    /// Describes the first broken invariant of a deserialized batch, if any.
    ///
    /// Batches built through [`Self::new`] always pass; this guards data read
    /// back from storage.
    pub fn integrity_error(&self) -> Option<String> {
        if self.links.is_empty() {
            return Some(format!("batch {} has no links", self.id));
        }
        if self.results.len() != self.links.len() {
            return Some(format!(
                "batch {} has {} links but {} results",
                self.id,
                self.links.len(),
                self.results.len()
            ));
        }
        if let Some(index) = self
            .links
            .iter()
            .zip(&self.results)
            .position(|(link, result)| *link != result.link)
        {
            return Some(format!(
                "batch {} result {} does not match its link",
                self.id, index
            ));
        }
        if self.status == BatchStatus::Done && self.pending_count() > 0 {
            return Some(format!("batch {} is done with unknown results", self.id));
        }
        if self.updated_at < self.created_at {
            return Some(format!("batch {} was updated before it was created", self.id));
        }
        None
    }

    fn touch(&mut self) {
        // Clock steps backwards must not make updated_at regress.
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(urls: &[&str]) -> LinkBatch {
        let mut batch = LinkBatch::new(1, urls).unwrap();
        batch.start_processing().unwrap();
        batch
    }

    #[test]
    fn test_new_batch_has_one_unknown_result_per_link() {
        let batch = LinkBatch::new(7, &["https://a.test", "https://b.test"]).unwrap();

        assert_eq!(batch.id(), 7);
        assert_eq!(batch.status(), BatchStatus::Created);
        assert_eq!(batch.links().len(), 2);
        assert_eq!(batch.results().len(), batch.links().len());
        assert!(
            batch
                .results()
                .iter()
                .all(|r| r.status == LinkStatus::Unknown && r.error.is_none())
        );
        assert_eq!(batch.created_at(), batch.updated_at());
    }

    #[test]
    fn test_new_batch_drops_blanks_keeps_urls_verbatim() {
        let batch = LinkBatch::new(1, &["", "  https://a.test ", "\t"]).unwrap();

        assert_eq!(batch.links().len(), 1);
        assert_eq!(batch.links()[0].url, "  https://a.test ");
        assert_eq!(batch.results()[0].link.url, "  https://a.test ");
    }

    #[test]
    fn test_new_batch_rejects_empty_input() {
        let urls: [&str; 0] = [];
        let err = LinkBatch::new(1, &urls).unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.to_string(), "urls must not be empty");
    }

    #[test]
    fn test_new_batch_rejects_blank_only_input() {
        let err = LinkBatch::new(1, &["", " "]).unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.to_string(), "no valid urls provided");
    }

    #[test]
    fn test_integrity_error_flags_broken_batches() {
        let mut batch = started(&["https://a.test", "https://b.test"]);
        assert!(batch.integrity_error().is_none());

        let mut short = batch.clone();
        short.results.pop();
        assert_eq!(
            short.integrity_error().as_deref(),
            Some("batch 1 has 2 links but 1 results")
        );

        let mut mismatched = batch.clone();
        mismatched.results[1].link.url = "https://zzz.test".to_string();
        assert!(mismatched.integrity_error().is_some());

        batch.status = BatchStatus::Done;
        assert!(batch.integrity_error().is_some());
    }

    #[test]
    fn test_start_processing_only_from_created() {
        let mut batch = started(&["https://a.test"]);
        assert_eq!(batch.status(), BatchStatus::InProgress);

        let err = batch.start_processing().unwrap_err();
        assert!(matches!(err, AppError::InvalidState { .. }));
        assert_eq!(batch.status(), BatchStatus::InProgress);

        batch.record_result_at(0, LinkStatus::Available, None);
        assert_eq!(batch.status(), BatchStatus::Done);
        assert!(batch.start_processing().is_err());
        assert_eq!(batch.status(), BatchStatus::Done);
    }

    #[test]
    fn test_batch_done_after_last_result() {
        let mut batch = started(&["https://a.test", "https://b.test"]);

        assert!(batch.record_result("https://b.test", LinkStatus::Available, None));
        assert_eq!(batch.status(), BatchStatus::InProgress);
        assert_eq!(batch.pending_count(), 1);

        assert!(batch.record_result(
            "https://a.test",
            LinkStatus::Unavailable,
            Some("unexpected status code: 404".to_string()),
        ));
        assert_eq!(batch.status(), BatchStatus::Done);
        assert_eq!(batch.results()[0].status, LinkStatus::Unavailable);
        assert_eq!(
            batch.results()[0].error.as_deref(),
            Some("unexpected status code: 404")
        );
        assert!(batch.updated_at() >= batch.created_at());
    }

    #[test]
    fn test_results_before_start_do_not_complete() {
        let mut batch = LinkBatch::new(1, &["https://a.test"]).unwrap();

        assert!(batch.record_result_at(0, LinkStatus::Available, None));
        assert_eq!(batch.status(), BatchStatus::Created);
    }

    #[test]
    fn test_record_result_unknown_url() {
        let mut batch = started(&["https://a.test"]);

        assert!(!batch.record_result("https://other.test", LinkStatus::Available, None));
        assert_eq!(batch.pending_count(), 1);
    }

    #[test]
    fn test_record_result_at_out_of_range() {
        let mut batch = started(&["https://a.test"]);

        assert!(!batch.record_result_at(3, LinkStatus::Available, None));
        assert_eq!(batch.status(), BatchStatus::InProgress);
    }

    #[test]
    fn test_duplicate_urls_are_recorded_positionally() {
        let mut batch = started(&["https://dup.test", "https://dup.test"]);

        batch.record_result_at(1, LinkStatus::Unavailable, Some("timeout".to_string()));
        assert_eq!(batch.results()[0].status, LinkStatus::Unknown);
        assert_eq!(batch.results()[1].status, LinkStatus::Unavailable);

        batch.record_result_at(0, LinkStatus::Available, None);
        assert_eq!(batch.status(), BatchStatus::Done);
    }

    #[test]
    fn test_finished_batch_is_immutable() {
        let mut batch = started(&["https://a.test"]);
        batch.record_result_at(0, LinkStatus::Available, None);
        let snapshot = batch.clone();

        assert!(!batch.record_result_at(0, LinkStatus::Unavailable, Some("late".to_string())));
        assert_eq!(batch, snapshot);
    }

    #[test]
    fn test_fail_from_non_terminal_states() {
        let mut created = LinkBatch::new(1, &["https://a.test"]).unwrap();
        created.fail().unwrap();
        assert_eq!(created.status(), BatchStatus::Failed);
        assert!(created.fail().is_err());

        let mut running = started(&["https://a.test"]);
        running.fail().unwrap();
        assert_eq!(running.status(), BatchStatus::Failed);
        assert!(!running.record_result_at(0, LinkStatus::Available, None));
    }

    #[test]
    fn test_fail_rejected_when_done() {
        let mut batch = started(&["https://a.test"]);
        batch.record_result_at(0, LinkStatus::Available, None);

        let err = batch.fail().unwrap_err();
        assert!(matches!(err, AppError::InvalidState { .. }));
        assert_eq!(batch.status(), BatchStatus::Done);
    }

    #[test]
    fn test_serialized_shape() {
        let mut batch = started(&["https://a.test"]);
        batch.record_result_at(0, LinkStatus::Unavailable, Some("boom".to_string()));

        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["status"], "done");
        assert_eq!(value["links"][0]["url"], "https://a.test");
        assert_eq!(value["results"][0]["url"], "https://a.test");
        assert_eq!(value["results"][0]["status"], "unavailable");
        assert_eq!(value["results"][0]["error"], "boom");
        assert!(value["created_at"].is_string());
    }
}
