//! Slack Lists tools
//!
//! Each tool takes JSON arguments and returns a JSON document. Failures come
//! back as [`ToolError`] carrying the error kind, never as success text.

use crate::input::{json_array, non_blank, parse_args, require_non_empty};
use crate::registry::ToolRegistry;
use crate::tool::{Tool, ToolError, ToolExecutorFn, ToolFuture};
use serde::Deserialize;
use serde_json::{Value, json};
use slack_lists_api::{DEFAULT_TITLE_COLUMN_ID, ListItemsRequest, MAX_PAGE_SIZE};
use slack_lists_core::environment::Clock;
use slack_lists_core::record::created_date;
use slack_lists_core::{
    BulkSubmissionSequencer, DEFAULT_RATE_LIMIT_DELAY_SECS, ExportFormat, FieldInput,
    FilterOperator, FilterPredicate, ListItemRequest, ListService, ListsError, Record, RejectedItem,
    collect_items, filter_records, item_record, pacing_delay, render,
};
use std::future::Future;
use std::sync::Arc;

/// Default page size for `get_list_items`
pub const DEFAULT_GET_LIMIT: i64 = 50;

/// Default number of items `filter_list_items` fetches
pub const DEFAULT_FILTER_MAX_ITEMS: usize = 100;

/// Dependencies shared by the list tools
#[derive(Clone)]
pub struct ListsToolContext {
    service: Arc<dyn ListService>,
    clock: Arc<dyn Clock>,
}

impl ListsToolContext {
    /// Create a context over `service`, pacing bulk work with `clock`
    #[must_use]
    pub fn new(service: Arc<dyn ListService>, clock: Arc<dyn Clock>) -> Self {
        Self { service, clock }
    }

    fn sequencer(&self) -> BulkSubmissionSequencer {
        BulkSubmissionSequencer::new(self.service.clone(), self.clock.clone())
    }
}

/// All five list tools
#[must_use]
pub fn list_tools(context: &ListsToolContext) -> Vec<(Tool, ToolExecutorFn)> {
    vec![
        create_list_item_tool(context),
        create_multiple_list_items_tool(context),
        get_list_items_tool(context),
        filter_list_items_tool(context),
        export_list_items_tool(context),
    ]
}

/// Register all list tools in `registry`
pub fn register_list_tools(registry: &ToolRegistry, context: &ListsToolContext) {
    for (tool, executor) in list_tools(context) {
        registry.register(tool, executor);
    }
}

fn executor<F, Fut>(context: &ListsToolContext, run: F) -> ToolExecutorFn
where
    F: Fn(ListsToolContext, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    let context = context.clone();
    Arc::new(move |input: String| {
        let output = run(context.clone(), input);
        Box::pin(async move { output.await.map(|value| value.to_string()) }) as ToolFuture
    })
}

fn field_item_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "column_id": {"type": "string", "description": "Column ID, e.g. Col123"},
            "type": {
                "type": "string",
                "enum": ["text", "date", "user", "select", "checkbox", "number", "email", "phone"]
            },
            "value": {"description": "String, YYYY-MM-DD date, id or list of ids, boolean, or number depending on type"}
        },
        "required": ["column_id", "type", "value"]
    })
}

fn operator_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["contains", "equals", "not_equals", "not_contains", "exists", "not_exists"],
        "default": "contains",
        "description": "How to match the value (case-insensitive)"
    })
}

// ═══════════════════════════════════════════════════════════════════════
// create_list_item
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct CreateListItemArgs {
    list_id: String,
    title: String,
    #[serde(default)]
    title_column_id: Option<String>,
    #[serde(default)]
    additional_fields: Option<Value>,
    #[serde(default)]
    parent_item_id: Option<String>,
}

/// Create the `create_list_item` tool
///
/// Returns JSON:
/// ```json
/// {
///   "item_id": "Rec0001",
///   "list_id": "F1234ABCD",
///   "title": "Write docs",
///   "created": "2025-01-01T00:00:00Z",
///   "field_count": 2
/// }
/// ```
#[must_use]
pub fn create_list_item_tool(context: &ListsToolContext) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "create_list_item".to_string(),
        description: "Create a new item in a Slack List. The item needs a title and may carry \
                      additional typed fields; pass parent_item_id to create a subtask."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "list_id": {"type": "string", "description": "Slack List ID (format: F1234ABCD)"},
                "title": {"type": "string", "description": "Title of the item"},
                "title_column_id": {
                    "type": "string",
                    "default": DEFAULT_TITLE_COLUMN_ID,
                    "description": "Column ID for the title field"
                },
                "additional_fields": {
                    "type": ["array", "string"],
                    "items": field_item_schema(),
                    "description": "Extra fields as an array or a JSON string holding one"
                },
                "parent_item_id": {"type": "string", "description": "Parent item ID to create a subtask"}
            },
            "required": ["list_id", "title"]
        }),
    };

    (tool, executor(context, create_list_item))
}

#[tracing::instrument(skip_all)]
async fn create_list_item(context: ListsToolContext, input: String) -> Result<Value, ToolError> {
    let args: CreateListItemArgs = parse_args(&input)?;
    let fields = field_inputs(
        "additional_fields",
        json_array("additional_fields", args.additional_fields)?,
    )?;

    let mut request = ListItemRequest::new(args.title.clone())
        .with_fields(fields)
        .with_parent(non_blank(args.parent_item_id));
    if let Some(column) = non_blank(args.title_column_id) {
        request = request.with_title_column(column);
    }

    let create = request.into_create_request(&args.list_id)?;
    let field_count = create.initial_fields.len();
    let item = context.service.create_item(create).await?;

    tracing::info!(list_id = %args.list_id, item_id = %item.id, field_count, "Created list item");

    Ok(json!({
        "item_id": item.id,
        "list_id": args.list_id,
        "title": args.title,
        "created": created_date(item.date_created),
        "field_count": field_count,
    }))
}

fn field_inputs(name: &str, values: Vec<Value>) -> Result<Vec<FieldInput>, ToolError> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value(value)
                .map_err(|e| ToolError::invalid_input(format!("{name}[{i}]: {e}")))
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// create_multiple_list_items
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct CreateMultipleArgs {
    list_id: String,
    items_data: Value,
    #[serde(default)]
    title_column_id: Option<String>,
    #[serde(default)]
    rate_limit_delay: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    fields: Vec<FieldInput>,
    #[serde(default)]
    parent_item_id: Option<String>,
}

/// Create the `create_multiple_list_items` tool
///
/// Items are created one at a time, `rate_limit_delay` seconds apart. One
/// failing item does not stop the rest.
///
/// Returns JSON:
/// ```json
/// {
///   "list_id": "F1234ABCD",
///   "total": 2,
///   "succeeded": 1,
///   "failed": 1,
///   "results": [
///     {"index": 0, "title": "A", "succeeded": true, "item_id": "Rec0001"},
///     {"index": 1, "title": "", "succeeded": false,
///      "error_message": "Validation error: title must not be empty",
///      "error_kind": "validation_error"}
///   ]
/// }
/// ```
#[must_use]
pub fn create_multiple_list_items_tool(context: &ListsToolContext) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "create_multiple_list_items".to_string(),
        description: "Create several items in a Slack List, sequentially with a delay between \
                      requests to stay under Slack's rate limit (about 50 per minute). Returns \
                      one result per item in input order."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "list_id": {"type": "string", "description": "Slack List ID (format: F1234ABCD)"},
                "items_data": {
                    "type": ["array", "string"],
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "fields": {"type": "array", "items": field_item_schema()},
                            "parent_item_id": {"type": "string"}
                        },
                        "required": ["title"]
                    },
                    "description": "Items as an array or a JSON string holding one"
                },
                "title_column_id": {
                    "type": "string",
                    "default": DEFAULT_TITLE_COLUMN_ID,
                    "description": "Column ID for the title field"
                },
                "rate_limit_delay": {
                    "type": "number",
                    "minimum": 0,
                    "default": DEFAULT_RATE_LIMIT_DELAY_SECS,
                    "description": "Seconds to wait between requests"
                }
            },
            "required": ["list_id", "items_data"]
        }),
    };

    (tool, executor(context, create_multiple_list_items))
}

#[tracing::instrument(skip_all)]
async fn create_multiple_list_items(
    context: ListsToolContext,
    input: String,
) -> Result<Value, ToolError> {
    let args: CreateMultipleArgs = parse_args(&input)?;
    let list_id = require_non_empty("list_id", &args.list_id)?;
    let delay = pacing_delay(args.rate_limit_delay.unwrap_or(DEFAULT_RATE_LIMIT_DELAY_SECS))?;
    let title_column = non_blank(args.title_column_id);

    let requests: Vec<_> = json_array("items_data", Some(args.items_data))?
        .into_iter()
        .enumerate()
        .map(|(i, value)| bulk_request(i, value, title_column.as_deref()))
        .collect();

    let results = context.sequencer().submit(list_id, requests, delay).await;
    let succeeded = results.iter().filter(|r| r.succeeded).count();

    Ok(json!({
        "list_id": list_id,
        "total": results.len(),
        "succeeded": succeeded,
        "failed": results.len() - succeeded,
        "results": results,
    }))
}

/// Decode one `items_data` element; a bad element fails only its own slot
fn bulk_request(
    index: usize,
    value: Value,
    title_column: Option<&str>,
) -> Result<ListItemRequest, RejectedItem> {
    let title = value
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let item: BulkItem = serde_json::from_value(value).map_err(|e| {
        RejectedItem::new(title, ListsError::validation(format!("items_data[{index}]: {e}")))
    })?;

    let mut request = ListItemRequest::new(item.title)
        .with_fields(item.fields)
        .with_parent(non_blank(item.parent_item_id));
    if let Some(column) = title_column {
        request = request.with_title_column(column);
    }
    Ok(request)
}

// ═══════════════════════════════════════════════════════════════════════
// get_list_items
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct GetListItemsArgs {
    list_id: String,
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    include_metadata: Option<bool>,
}

/// Create the `get_list_items` tool
///
/// Returns JSON:
/// ```json
/// {
///   "list_id": "F1234ABCD",
///   "count": 1,
///   "has_more": false,
///   "items": [{"id": "Rec1", "list_id": "F1234ABCD", "created_date": "...", "created_by": "U1", "Col10000000": "Write docs"}]
/// }
/// ```
#[must_use]
pub fn get_list_items_tool(context: &ListsToolContext) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "get_list_items".to_string(),
        description: "Retrieve items from a Slack List, one page of up to 100, with each \
                      item's field values rendered as text."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "list_id": {"type": "string", "description": "Slack List ID (format: F1234ABCD)"},
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_PAGE_SIZE,
                    "default": DEFAULT_GET_LIMIT,
                    "description": "Maximum number of items to retrieve"
                },
                "include_metadata": {
                    "type": "boolean",
                    "default": true,
                    "description": "Include list id, creation date and creator"
                }
            },
            "required": ["list_id"]
        }),
    };

    (tool, executor(context, get_list_items))
}

#[tracing::instrument(skip_all)]
async fn get_list_items(context: ListsToolContext, input: String) -> Result<Value, ToolError> {
    let args: GetListItemsArgs = parse_args(&input)?;
    let list_id = require_non_empty("list_id", &args.list_id)?;
    let limit = clamp_limit(args.limit.unwrap_or(DEFAULT_GET_LIMIT));
    let include_metadata = args.include_metadata.unwrap_or(true);

    let page = context
        .service
        .list_items(ListItemsRequest::new(list_id, limit))
        .await?;
    let has_more = page.next_cursor().is_some();
    let items: Vec<Record> = page
        .items
        .iter()
        .map(|item| item_record(item, include_metadata))
        .collect();

    tracing::debug!(list_id, count = items.len(), has_more, "Fetched list items");

    Ok(json!({
        "list_id": list_id,
        "count": items.len(),
        "has_more": has_more,
        "items": items,
    }))
}

fn clamp_limit(limit: i64) -> u32 {
    u32::try_from(limit.clamp(1, i64::from(MAX_PAGE_SIZE))).unwrap_or(MAX_PAGE_SIZE)
}

// ═══════════════════════════════════════════════════════════════════════
// filter_list_items
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct FilterListItemsArgs {
    list_id: String,
    filter_column_id: String,
    #[serde(default)]
    filter_value: Option<String>,
    #[serde(default)]
    filter_operator: Option<String>,
    #[serde(default)]
    max_items: Option<usize>,
}

/// Create the `filter_list_items` tool
///
/// Fetches up to `max_items` items and keeps those whose column matches.
///
/// Returns JSON:
/// ```json
/// {
///   "list_id": "F1234ABCD",
///   "filter": {"column_id": "Col2", "operator": "equals", "value": "done"},
///   "scanned": 42,
///   "matched": 3,
///   "has_more": false,
///   "items": [...]
/// }
/// ```
#[must_use]
pub fn filter_list_items_tool(context: &ListsToolContext) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "filter_list_items".to_string(),
        description: "Find items in a Slack List whose column matches a value, e.g. by \
                      status, assignee or priority. Matching is case-insensitive."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "list_id": {"type": "string", "description": "Slack List ID (format: F1234ABCD)"},
                "filter_column_id": {"type": "string", "description": "Column ID to filter by"},
                "filter_value": {
                    "type": "string",
                    "description": "Value to match; not needed for exists/not_exists"
                },
                "filter_operator": operator_schema(),
                "max_items": {
                    "type": "integer",
                    "minimum": 1,
                    "default": DEFAULT_FILTER_MAX_ITEMS,
                    "description": "Maximum number of items to fetch and scan"
                }
            },
            "required": ["list_id", "filter_column_id"]
        }),
    };

    (tool, executor(context, filter_list_items))
}

#[tracing::instrument(skip_all)]
async fn filter_list_items(context: ListsToolContext, input: String) -> Result<Value, ToolError> {
    let args: FilterListItemsArgs = parse_args(&input)?;
    let list_id = require_non_empty("list_id", &args.list_id)?;
    let predicate = predicate(
        args.filter_column_id,
        args.filter_operator.as_deref(),
        args.filter_value,
    )?;
    let max_items = args.max_items.unwrap_or(DEFAULT_FILTER_MAX_ITEMS);
    if max_items == 0 {
        return Err(ToolError::invalid_input("max_items must be at least 1"));
    }

    let collected = collect_items(context.service.as_ref(), list_id, max_items).await?;
    let scanned = collected.items.len();
    let records: Vec<Record> = collected
        .items
        .iter()
        .map(|item| item_record(item, true))
        .collect();
    let matched = filter_records(records, &predicate);

    tracing::info!(
        list_id,
        scanned,
        matched = matched.len(),
        has_more = collected.has_more,
        "Filtered list items"
    );

    Ok(json!({
        "list_id": list_id,
        "filter": predicate,
        "scanned": scanned,
        "matched": matched.len(),
        "has_more": collected.has_more,
        "items": matched,
    }))
}

fn predicate(
    column_id: String,
    operator: Option<&str>,
    value: Option<String>,
) -> Result<FilterPredicate, ToolError> {
    let operator = match operator.filter(|op| !op.trim().is_empty()) {
        Some(op) => op.parse()?,
        None => FilterOperator::default(),
    };
    Ok(FilterPredicate::new(column_id, operator, value)?)
}

// ═══════════════════════════════════════════════════════════════════════
// export_list_items
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct ExportListItemsArgs {
    list_id: String,
    #[serde(default)]
    export_format: Option<String>,
    #[serde(default)]
    filter_column_id: Option<String>,
    #[serde(default)]
    filter_value: Option<String>,
    #[serde(default)]
    filter_operator: Option<String>,
}

/// Create the `export_list_items` tool
///
/// Exports every item in the list, optionally filtered, with metadata.
///
/// Returns JSON:
/// ```json
/// {
///   "list_id": "F1234ABCD",
///   "format": "csv",
///   "item_count": 2,
///   "filter_applied": false,
///   "content": "id,list_id,created_date,created_by,Col10000000\n..."
/// }
/// ```
#[must_use]
pub fn export_list_items_tool(context: &ListsToolContext) -> (Tool, ToolExecutorFn) {
    let tool = Tool {
        name: "export_list_items".to_string(),
        description: "Export all items of a Slack List as JSON or CSV, optionally filtered \
                      by one column."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "list_id": {"type": "string", "description": "Slack List ID (format: F1234ABCD)"},
                "export_format": {
                    "type": "string",
                    "enum": ["json", "csv"],
                    "default": "json"
                },
                "filter_column_id": {"type": "string", "description": "Optional column ID to filter by"},
                "filter_value": {"type": "string", "description": "Value to match"},
                "filter_operator": operator_schema()
            },
            "required": ["list_id"]
        }),
    };

    (tool, executor(context, export_list_items))
}

#[tracing::instrument(skip_all)]
async fn export_list_items(context: ListsToolContext, input: String) -> Result<Value, ToolError> {
    let args: ExportListItemsArgs = parse_args(&input)?;
    let list_id = require_non_empty("list_id", &args.list_id)?;
    let format: ExportFormat = match non_blank(args.export_format) {
        Some(token) => token.parse()?,
        None => ExportFormat::default(),
    };
    let filter = match non_blank(args.filter_column_id) {
        Some(column) => Some(predicate(
            column,
            args.filter_operator.as_deref(),
            args.filter_value,
        )?),
        None => None,
    };

    let items = collect_items(context.service.as_ref(), list_id, usize::MAX)
        .await?
        .items;
    let mut records: Vec<Record> = items.iter().map(|item| item_record(item, true)).collect();
    if let Some(predicate) = &filter {
        records = filter_records(records, predicate);
    }

    let content = render(&records, format)?;
    let content = String::from_utf8(content)
        .map_err(|e| ToolError::from(ListsError::Service(e.to_string())))?;

    tracing::info!(list_id, %format, item_count = records.len(), "Exported list items");

    Ok(json!({
        "list_id": list_id,
        "format": format,
        "item_count": records.len(),
        "filter_applied": filter.is_some(),
        "content": content,
    }))
}
