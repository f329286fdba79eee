//! Flattened, string-rendered view of list items
//!
//! Filtering and export both work on [`Record`]s rather than raw items so that
//! a column compares the same way regardless of its Slack type.

use chrono::{DateTime, SecondsFormat};
use serde_json::Value;
use slack_lists_api::{Item, ItemField};

/// Insertion-ordered mapping from key to rendered value
pub type Record = serde_json::Map<String, Value>;

/// Key holding the item id
pub const ID_KEY: &str = "id";

/// Render `item` as a record
///
/// The id comes first, then list id, creation time, creator and parent
/// (when `include_metadata` is set), then one entry per column in the item's
/// field order. Every value is a string; absent values render as `""`.
#[must_use]
pub fn item_record(item: &Item, include_metadata: bool) -> Record {
    let mut record = Record::new();
    record.insert(ID_KEY.to_string(), Value::String(item.id.clone()));

    if include_metadata {
        record.insert(
            "list_id".to_string(),
            Value::String(item.list_id.clone().unwrap_or_default()),
        );
        record.insert(
            "created_date".to_string(),
            Value::String(created_date(item.date_created)),
        );
        record.insert(
            "created_by".to_string(),
            Value::String(item.created_by.clone().unwrap_or_default()),
        );
        if let Some(parent) = &item.parent_item_id {
            record.insert("parent_item_id".to_string(), Value::String(parent.clone()));
        }
    }

    for field in &item.fields {
        record.insert(
            field.column_id.clone(),
            Value::String(field_text(field).unwrap_or_default()),
        );
    }

    record
}

/// ISO-8601 UTC timestamp for a unix time, empty when unset
#[must_use]
pub fn created_date(unix_secs: i64) -> String {
    if unix_secs <= 0 {
        return String::new();
    }
    DateTime::from_timestamp(unix_secs, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Display text of a field, or `None` if it holds nothing
///
/// Keys are consulted in a fixed order: `text`, `value`, `date`, `user`,
/// `select`, `checkbox`, `number`, `email`, `phone`, `rich_text`. Lists are
/// joined with `", "` except dates, numbers, emails and phones, which only
/// show their first entry. Empty lists count as absent.
#[must_use]
pub fn field_text(field: &ItemField) -> Option<String> {
    if let Some(text) = &field.text {
        return Some(text.clone());
    }
    if let Some(value) = field.value.as_ref().filter(|v| !v.is_null()) {
        return Some(cell_text(value));
    }
    if let Some(date) = first(field.date.as_deref()) {
        return Some(date.clone());
    }
    if let Some(users) = non_empty(field.user.as_deref()) {
        return Some(users.join(", "));
    }
    if let Some(options) = non_empty(field.select.as_deref()) {
        return Some(options.join(", "));
    }
    if let Some(checked) = field.checkbox {
        return Some(checked.to_string());
    }
    if let Some(number) = first(field.number.as_deref()) {
        return Some(cell_text(number));
    }
    if let Some(email) = first(field.email.as_deref()) {
        return Some(email.clone());
    }
    if let Some(phone) = first(field.phone.as_deref()) {
        return Some(phone.clone());
    }
    field
        .rich_text
        .as_ref()
        .map(rich_text_plain)
        .filter(|text| !text.is_empty())
}

/// Render any JSON value as cell text
///
/// Strings are unquoted, null is empty, arrays are joined with `", "`.
#[must_use]
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(values) => values.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Value of `key` in `record` as text, empty when missing
#[must_use]
pub fn column_text(record: &Record, key: &str) -> String {
    record.get(key).map(cell_text).unwrap_or_default()
}

fn first<T>(values: Option<&[T]>) -> Option<&T> {
    values.and_then(<[T]>::first)
}

fn non_empty<T>(values: Option<&[T]>) -> Option<&[T]> {
    values.filter(|v| !v.is_empty())
}

fn rich_text_plain(blocks: &Value) -> String {
    let mut out = String::new();
    collect_text(blocks, &mut out);
    out
}

fn collect_text(node: &Value, out: &mut String) {
    match node {
        Value::Array(children) => {
            for child in children {
                collect_text(child, out);
            }
        }
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("text") {
                out.push_str(text);
            }
            if let Some(elements) = map.get("elements") {
                collect_text(elements, out);
            }
        }
        _ => {}
    }
}
