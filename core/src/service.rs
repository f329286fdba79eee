//! The list service seam
//!
//! Everything above this module talks to Slack through [`ListService`], so
//! tests can swap in a stub and the tools never see HTTP.

use crate::error::ListsError;
use async_trait::async_trait;
use slack_lists_api::{
    CreateItemRequest, Item, ListItemsRequest, ListItemsResponse, MAX_PAGE_SIZE, SlackListsClient,
};

/// Operations the adapter needs from Slack Lists
#[async_trait]
pub trait ListService: Send + Sync {
    /// Create one item
    ///
    /// # Errors
    ///
    /// Returns the mapped service failure
    async fn create_item(&self, request: CreateItemRequest) -> Result<Item, ListsError>;

    /// Fetch one page of items
    ///
    /// # Errors
    ///
    /// Returns the mapped service failure
    async fn list_items(&self, request: ListItemsRequest) -> Result<ListItemsResponse, ListsError>;
}

#[async_trait]
impl ListService for SlackListsClient {
    async fn create_item(&self, request: CreateItemRequest) -> Result<Item, ListsError> {
        Ok(Self::create_item(self, &request).await?)
    }

    async fn list_items(&self, request: ListItemsRequest) -> Result<ListItemsResponse, ListsError> {
        Ok(Self::list_items(self, &request).await?)
    }
}

/// Items gathered across pages by [`collect_items`]
#[derive(Clone, Debug, Default)]
pub struct CollectedItems {
    /// Items in service order
    pub items: Vec<Item>,
    /// Whether Slack still had items past the ones collected
    pub has_more: bool,
}

/// Fetch up to `max_items` items, following cursors
///
/// Pages request at most [`MAX_PAGE_SIZE`] items and never more than are
/// still needed. Paging stops at `max_items`, when Slack has no more pages,
/// or when a page comes back empty whatever its cursor says.
///
/// # Errors
///
/// Returns the first page failure
pub async fn collect_items(
    service: &dyn ListService,
    list_id: &str,
    max_items: usize,
) -> Result<CollectedItems, ListsError> {
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    while items.len() < max_items {
        let remaining = max_items - items.len();
        let limit = u32::try_from(remaining).map_or(MAX_PAGE_SIZE, |r| r.min(MAX_PAGE_SIZE));

        let page = service
            .list_items(ListItemsRequest::new(list_id, limit).with_cursor(cursor.take()))
            .await?;
        let next = page.next_cursor().map(str::to_string);
        let empty = page.items.is_empty();
        items.extend(page.items);

        tracing::debug!(list_id, fetched = items.len(), has_more = next.is_some(), "Fetched page");

        match next {
            Some(next) if !empty => cursor = Some(next),
            _ => {
                if empty && next.is_some() {
                    tracing::warn!(list_id, "Empty page with a cursor, stopping");
                }
                items.truncate(max_items);
                return Ok(CollectedItems {
                    items,
                    has_more: false,
                });
            }
        }
    }

    let has_more = items.len() > max_items || cursor.is_some();
    items.truncate(max_items);
    Ok(CollectedItems { items, has_more })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves `total` items in pages, honouring the requested limit
    struct PagedService {
        total: usize,
        limits: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl ListService for PagedService {
        async fn create_item(&self, _request: CreateItemRequest) -> Result<Item, ListsError> {
            Err(ListsError::Service("unused".to_string()))
        }

        async fn list_items(
            &self,
            request: ListItemsRequest,
        ) -> Result<ListItemsResponse, ListsError> {
            self.limits.lock().expect("lock").push(request.limit);
            let start: usize = request.cursor.as_deref().map_or(0, |c| c.parse().expect("cursor"));
            let end = (start + request.limit as usize).min(self.total);
            let items: Vec<_> = (start..end).map(|i| json!({"id": format!("Rec{i}")})).collect();
            let cursor = if end < self.total { end.to_string() } else { String::new() };
            Ok(serde_json::from_value(json!({
                "items": items,
                "response_metadata": {"next_cursor": cursor}
            }))
            .expect("valid page"))
        }
    }

    fn service(total: usize) -> PagedService {
        PagedService {
            total,
            limits: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_collect_stops_at_max_items() {
        let svc = service(250);
        let collected = collect_items(&svc, "F1", 150).await.expect("collect");
        assert_eq!(collected.items.len(), 150);
        assert!(collected.has_more);
        assert_eq!(*svc.limits.lock().expect("lock"), vec![100, 50]);
    }

    #[tokio::test]
    async fn test_collect_stops_when_exhausted() {
        let svc = service(30);
        let collected = collect_items(&svc, "F1", 100).await.expect("collect");
        assert_eq!(collected.items.len(), 30);
        assert!(!collected.has_more);
        assert_eq!(collected.items[29].id, "Rec29");
    }

    #[tokio::test]
    async fn test_collect_zero_makes_no_calls() {
        let svc = service(10);
        let collected = collect_items(&svc, "F1", 0).await.expect("collect");
        assert!(collected.items.is_empty());
        assert!(svc.limits.lock().expect("lock").is_empty());
    }

    /// Always answers with an empty page that still carries a cursor
    struct EmptyPagesService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ListService for EmptyPagesService {
        async fn create_item(&self, _request: CreateItemRequest) -> Result<Item, ListsError> {
            Err(ListsError::Service("unused".to_string()))
        }

        async fn list_items(
            &self,
            _request: ListItemsRequest,
        ) -> Result<ListItemsResponse, ListsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_value(json!({
                "items": [],
                "response_metadata": {"next_cursor": "again"}
            }))
            .expect("valid page"))
        }
    }

    #[tokio::test]
    async fn test_collect_stops_on_empty_page_with_cursor() {
        let svc = EmptyPagesService {
            calls: AtomicUsize::new(0),
        };

        let collected = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            collect_items(&svc, "F1", usize::MAX),
        )
        .await
        .expect("paging must terminate")
        .expect("collect");

        assert!(collected.items.is_empty());
        assert!(!collected.has_more);
        assert_eq!(svc.calls.load(Ordering::SeqCst), 1);
    }
}
