//! In-memory list service for exercising tools and the sequencer
//!
//! [`StubListService`] stores items in a `Vec`, serves them in cursor pages,
//! and records every call so tests can assert on what reached "Slack".

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on a poisoned lock

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use slack_lists_api::{CreateItemRequest, Item, ItemField, ListItemsRequest, ListItemsResponse};
use slack_lists_core::environment::Clock;
use slack_lists_core::{ListService, ListsError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Stub list service
///
/// Created items get ids `Rec0001`, `Rec0002`, ... and are appended to the
/// stored list, so a later `list_items` sees them.
///
/// # Example
///
/// ```
/// use slack_lists_testing::StubListService;
/// use slack_lists_core::{ListService, ListsError};
/// use slack_lists_api::ListItemsRequest;
///
/// # tokio_test::block_on(async {
/// let service = StubListService::new()
///     .with_text_item("Rec1", "Col1", "hello")
///     .fail_create_call(0, ListsError::Auth("invalid_auth".into()));
///
/// let page = service.list_items(ListItemsRequest::new("F1", 10)).await.unwrap();
/// assert_eq!(page.items.len(), 1);
/// # });
/// ```
#[derive(Clone)]
pub struct StubListService {
    state: Arc<RwLock<StubState>>,
    clock: Option<Arc<dyn Clock>>,
}

#[derive(Default)]
struct StubState {
    items: Vec<Item>,
    next_id: usize,
    created: Vec<CreateItemRequest>,
    create_times: Vec<DateTime<Utc>>,
    list_requests: Vec<ListItemsRequest>,
    create_failures: HashMap<usize, ListsError>,
    list_failure: Option<ListsError>,
}

impl Default for StubListService {
    fn default() -> Self {
        Self::new()
    }
}

impl StubListService {
    /// Create an empty service
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StubState::default())),
            clock: None,
        }
    }

    /// Builder: stamp create calls with `clock`
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builder: store `item`
    #[must_use]
    pub fn with_item(self, item: Item) -> Self {
        self.state.write().unwrap().items.push(item);
        self
    }

    /// Builder: store an item holding one text column
    #[must_use]
    pub fn with_text_item(self, id: &str, column_id: &str, text: &str) -> Self {
        let mut field = ItemField::new(column_id);
        field.text = Some(text.to_string());
        self.with_item(Item {
            id: id.to_string(),
            fields: vec![field],
            ..Item::default()
        })
    }

    /// Builder: store `count` generated items `Rec0..` with a title column
    #[must_use]
    pub fn with_generated_items(self, count: usize) -> Self {
        {
            let mut state = self.state.write().unwrap();
            for i in 0..count {
                let mut field = ItemField::new("Col10000000");
                field.text = Some(format!("Item {i}"));
                state.items.push(Item {
                    id: format!("Rec{i}"),
                    fields: vec![field],
                    ..Item::default()
                });
            }
        }
        self
    }

    /// Builder: fail the `call`th create (0-based) with `error`
    #[must_use]
    pub fn fail_create_call(self, call: usize, error: ListsError) -> Self {
        self.state
            .write()
            .unwrap()
            .create_failures
            .insert(call, error);
        self
    }

    /// Builder: fail every list call with `error`
    #[must_use]
    pub fn fail_listing(self, error: ListsError) -> Self {
        self.state.write().unwrap().list_failure = Some(error);
        self
    }

    /// Number of `create_item` calls received
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.state.read().unwrap().created.len()
    }

    /// Number of `list_items` calls received
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.state.read().unwrap().list_requests.len()
    }

    /// Every create request received, in order
    #[must_use]
    pub fn created_requests(&self) -> Vec<CreateItemRequest> {
        self.state.read().unwrap().created.clone()
    }

    /// Every list request received, in order
    #[must_use]
    pub fn list_requests(&self) -> Vec<ListItemsRequest> {
        self.state.read().unwrap().list_requests.clone()
    }

    /// Clock reading at each create call
    ///
    /// Empty unless the service was built [`with_clock`](Self::with_clock).
    #[must_use]
    pub fn create_times(&self) -> Vec<DateTime<Utc>> {
        self.state.read().unwrap().create_times.clone()
    }

    /// Items currently stored
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.state.read().unwrap().items.clone()
    }
}

#[async_trait]
impl ListService for StubListService {
    async fn create_item(&self, request: CreateItemRequest) -> Result<Item, ListsError> {
        let mut state = self.state.write().unwrap();
        let call = state.created.len();
        state.created.push(request.clone());
        if let Some(clock) = &self.clock {
            state.create_times.push(clock.now());
        }

        if let Some(error) = state.create_failures.remove(&call) {
            return Err(error);
        }

        state.next_id += 1;
        let fields = request
            .initial_fields
            .iter()
            .map(|field| {
                let value = serde_json::to_value(field).unwrap_or_else(|_| json!({}));
                serde_json::from_value(value)
                    .unwrap_or_else(|_| ItemField::new(field.column_id.clone()))
            })
            .collect();
        let item = Item {
            id: format!("Rec{:04}", state.next_id),
            list_id: Some(request.list_id),
            parent_item_id: request.parent_item_id,
            fields,
            ..Item::default()
        };
        state.items.push(item.clone());
        Ok(item)
    }

    async fn list_items(&self, request: ListItemsRequest) -> Result<ListItemsResponse, ListsError> {
        let mut state = self.state.write().unwrap();
        state.list_requests.push(request.clone());

        if let Some(error) = &state.list_failure {
            return Err(error.clone());
        }

        let start = request
            .cursor
            .as_deref()
            .and_then(|cursor| cursor.strip_prefix("offset:"))
            .and_then(|offset| offset.parse::<usize>().ok())
            .unwrap_or(0)
            .min(state.items.len());
        let end = (start + request.limit as usize).min(state.items.len());
        let next_cursor = if end < state.items.len() {
            format!("offset:{end}")
        } else {
            String::new()
        };

        let items: Vec<Item> = state.items[start..end].to_vec();
        let page = json!({
            "items": items,
            "response_metadata": {"next_cursor": next_cursor}
        });
        serde_json::from_value(page).map_err(|e| ListsError::Service(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pages_follow_cursor() {
        let service = StubListService::new().with_generated_items(5);

        let first = service
            .list_items(ListItemsRequest::new("F1", 3))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 3);
        let cursor = first.next_cursor().map(str::to_string);
        assert_eq!(cursor.as_deref(), Some("offset:3"));

        let second = service
            .list_items(ListItemsRequest::new("F1", 3).with_cursor(cursor))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.next_cursor(), None);
        assert_eq!(service.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_scripted_create_failure() {
        let service =
            StubListService::new().fail_create_call(1, ListsError::NotFound("list_not_found".into()));
        let request = CreateItemRequest::new("F1", vec![]);

        assert!(service.create_item(request.clone()).await.is_ok());
        assert!(matches!(
            service.create_item(request.clone()).await,
            Err(ListsError::NotFound(_))
        ));
        assert_eq!(service.create_item(request).await.unwrap().id, "Rec0002");
        assert_eq!(service.create_calls(), 3);
    }
}
