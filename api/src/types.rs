//! Wire types for the Slack Lists API

use serde::{Deserialize, Serialize};

/// Column id Slack assigns to the primary (title) column of a new list
pub const DEFAULT_TITLE_COLUMN_ID: &str = "Col10000000";

/// A field sent in `initial_fields` when creating an item
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct InitialField {
    /// Target column
    pub column_id: String,
    /// Typed payload, serialized as a sibling key of `column_id`
    #[serde(flatten)]
    pub value: FieldPayload,
}

impl InitialField {
    /// Rich text field holding a single plain-text run
    #[must_use]
    pub fn text(column_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            value: FieldPayload::RichText(vec![RichTextBlock::plain(text)]),
        }
    }
}

/// Field payload keyed by the Slack column type
///
/// Every variant except `Checkbox` is a list on the wire, even when it carries
/// a single value.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FieldPayload {
    /// Rich text blocks
    RichText(Vec<RichTextBlock>),
    /// Dates in `YYYY-MM-DD` form
    Date(Vec<String>),
    /// Slack user ids
    User(Vec<String>),
    /// Select option ids
    Select(Vec<String>),
    /// Checkbox state
    Checkbox(bool),
    /// Numbers
    Number(Vec<f64>),
    /// Email addresses
    Email(Vec<String>),
    /// Phone numbers
    Phone(Vec<String>),
}

/// Top-level rich text block
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextBlock {
    /// A `rich_text` block
    RichText {
        /// Child elements
        elements: Vec<RichTextElement>,
    },
}

impl RichTextBlock {
    /// Block wrapping one section with one text run
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::RichText {
            elements: vec![RichTextElement::RichTextSection {
                elements: vec![RichTextElement::Text { text: text.into() }],
            }],
        }
    }
}

/// Rich text element
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextElement {
    /// Section grouping inline elements
    RichTextSection {
        /// Inline elements
        elements: Vec<RichTextElement>,
    },
    /// Plain text run
    Text {
        /// The text
        text: String,
    },
}

/// An item as returned by `slackLists.items.*`
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Item id
    #[serde(default)]
    pub id: String,
    /// Owning list id
    #[serde(default)]
    pub list_id: Option<String>,
    /// Creation time (unix seconds)
    #[serde(default)]
    pub date_created: i64,
    /// Creator's user id
    #[serde(default)]
    pub created_by: Option<String>,
    /// Parent item id for subtasks
    #[serde(default)]
    pub parent_item_id: Option<String>,
    /// Field values in column order
    #[serde(default)]
    pub fields: Vec<ItemField>,
}

/// A field value on a returned item
///
/// Slack fills in whichever keys match the column type, so every value key is
/// optional.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemField {
    /// Column id
    pub column_id: String,
    /// Plain text rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Generic value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Dates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Vec<String>>,
    /// User ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Vec<String>>,
    /// Select option ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,
    /// Checkbox state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox: Option<bool>,
    /// Numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<Vec<serde_json::Value>>,
    /// Email addresses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Vec<String>>,
    /// Phone numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Vec<String>>,
    /// Rich text blocks, kept raw since Slack may send element kinds we do not model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_text: Option<serde_json::Value>,
}

impl ItemField {
    /// Empty field for `column_id`
    #[must_use]
    pub fn new(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            ..Self::default()
        }
    }
}

/// Body of a successful `slackLists.items.create` call
#[derive(Clone, Debug, Deserialize)]
pub struct CreateItemResponse {
    /// The created item
    pub item: Item,
}

/// Body of a successful `slackLists.items.list` call
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListItemsResponse {
    /// Items on this page
    #[serde(default)]
    pub items: Vec<Item>,
    /// Pagination metadata
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl ListItemsResponse {
    /// Cursor for the next page, if any
    ///
    /// Slack sends an empty string on the last page.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.response_metadata
            .as_ref()
            .and_then(|meta| meta.next_cursor.as_deref())
            .filter(|cursor| !cursor.is_empty())
    }
}

/// Pagination metadata
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Cursor for the next page
    #[serde(default)]
    pub next_cursor: Option<String>,
}
