//! Request bodies for the Slack Lists API

use crate::types::InitialField;
use serde::Serialize;

/// Largest page size `slackLists.items.list` accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Body of `slackLists.items.create`
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CreateItemRequest {
    /// Target list
    pub list_id: String,
    /// Field values for the new item
    pub initial_fields: Vec<InitialField>,
    /// Parent item (creates a subtask)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_item_id: Option<String>,
}

impl CreateItemRequest {
    /// Create a request with the given fields
    #[must_use]
    pub fn new(list_id: impl Into<String>, initial_fields: Vec<InitialField>) -> Self {
        Self {
            list_id: list_id.into(),
            initial_fields,
            parent_item_id: None,
        }
    }

    /// Builder: Set parent item
    #[must_use]
    pub fn with_parent(mut self, parent_item_id: Option<String>) -> Self {
        self.parent_item_id = parent_item_id;
        self
    }
}

/// Query of `slackLists.items.list`
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ListItemsRequest {
    /// Source list
    pub list_id: String,
    /// Page size
    pub limit: u32,
    /// Cursor from the previous page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl ListItemsRequest {
    /// First page of `list_id`, page size clamped to `1..=MAX_PAGE_SIZE`
    #[must_use]
    pub fn new(list_id: impl Into<String>, limit: u32) -> Self {
        Self {
            list_id: list_id.into(),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            cursor: None,
        }
    }

    /// Builder: Set cursor
    #[must_use]
    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }
}
