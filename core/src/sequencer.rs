//! Paced, strictly sequential bulk item creation

use crate::environment::Clock;
use crate::error::ListsError;
use crate::model::{ListItemRequest, RejectedItem, SubmissionResult};
use crate::service::ListService;
use std::sync::Arc;
use std::time::Duration;

/// Default pause between bulk submissions, in seconds
pub const DEFAULT_RATE_LIMIT_DELAY_SECS: f64 = 1.2;

/// Convert a caller-supplied delay in seconds to a [`Duration`]
///
/// # Errors
///
/// Returns `ListsError::Validation` for negative or non-finite values
pub fn pacing_delay(secs: f64) -> Result<Duration, ListsError> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        ListsError::validation(format!(
            "rate_limit_delay must be a non-negative number of seconds, got {secs}"
        ))
    })
}

/// Submits item requests one at a time with a fixed pause between them
///
/// Each request produces exactly one [`SubmissionResult`] at the same index.
/// A failing request never stops the batch.
#[derive(Clone)]
pub struct BulkSubmissionSequencer {
    service: Arc<dyn ListService>,
    clock: Arc<dyn Clock>,
}

impl BulkSubmissionSequencer {
    /// Create a sequencer over `service`, pacing with `clock`
    #[must_use]
    pub fn new(service: Arc<dyn ListService>, clock: Arc<dyn Clock>) -> Self {
        Self { service, clock }
    }

    /// Submit `requests` to `list_id` in order
    ///
    /// Sleeps for `delay` before every entry after the first, whether or
    /// not the previous one succeeded. A [`RejectedItem`] becomes a failed
    /// result at its index without a call to Slack.
    #[tracing::instrument(skip(self, requests), fields(total = requests.len()))]
    pub async fn submit(
        &self,
        list_id: &str,
        requests: Vec<Result<ListItemRequest, RejectedItem>>,
        delay: Duration,
    ) -> Vec<SubmissionResult> {
        let mut results = Vec::with_capacity(requests.len());

        for (index, entry) in requests.into_iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                self.clock.sleep(delay).await;
            }
            let result = match entry {
                Ok(request) => self.submit_one(list_id, index, request).await,
                Err(rejected) => {
                    tracing::warn!(index, error = %rejected.error, "Item could not be read");
                    SubmissionResult::failure(index, rejected.title, &rejected.error)
                }
            };
            results.push(result);
        }

        let succeeded = results.iter().filter(|r| r.succeeded).count();
        tracing::info!(
            list_id,
            total = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            "Bulk submission finished"
        );

        results
    }

    async fn submit_one(
        &self,
        list_id: &str,
        index: usize,
        request: ListItemRequest,
    ) -> SubmissionResult {
        let title = request.title().to_string();

        let create = match request.into_create_request(list_id) {
            Ok(create) => create,
            Err(error) => {
                tracing::warn!(index, %error, "Item rejected before submission");
                return SubmissionResult::failure(index, title, &error);
            }
        };

        match self.service.create_item(create).await {
            Ok(item) => {
                tracing::debug!(index, item_id = %item.id, "Item created");
                SubmissionResult::success(index, title, item.id)
            }
            Err(error) => {
                tracing::warn!(index, %error, kind = error.kind(), "Item creation failed");
                SubmissionResult::failure(index, title, &error)
            }
        }
    }
}
