//! Item creation requests and their typed field values

use crate::error::ListsError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slack_lists_api::{CreateItemRequest, FieldPayload, InitialField, DEFAULT_TITLE_COLUMN_ID};
use std::fmt;
use std::str::FromStr;

/// Column type of a field value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Rich text
    Text,
    /// Calendar date (`YYYY-MM-DD`)
    Date,
    /// Slack users
    User,
    /// Select options
    Select,
    /// Checkbox
    Checkbox,
    /// Number
    Number,
    /// Email address
    Email,
    /// Phone number
    Phone,
}

impl FieldType {
    /// Every supported type, in documentation order
    pub const ALL: [Self; 8] = [
        Self::Text,
        Self::Date,
        Self::User,
        Self::Select,
        Self::Checkbox,
        Self::Number,
        Self::Email,
        Self::Phone,
    ];

    /// Wire token
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::User => "user",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Number => "number",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ListsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                ListsError::validation(format!(
                    "unsupported field type '{s}'; expected one of text, date, user, select, checkbox, number, email, phone"
                ))
            })
    }
}

/// Payload of a field, shaped by its type
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldData {
    /// Plain text, sent as rich text
    Text(String),
    /// Date in `YYYY-MM-DD` form
    Date(String),
    /// User ids
    User(Vec<String>),
    /// Option ids
    Select(Vec<String>),
    /// Checked or not
    Checkbox(bool),
    /// Numeric value
    Number(f64),
    /// Email address
    Email(String),
    /// Phone number
    Phone(String),
}

/// A validated field value
///
/// Can only be built through [`FieldValue::new`], so the payload always has
/// the shape its type demands.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldValue {
    column_id: String,
    #[serde(flatten)]
    data: FieldData,
}

impl FieldValue {
    /// Validate `value` against `field_type` and build the field
    ///
    /// A bare string is accepted for `user` and `select` and promoted to a
    /// one-element list.
    ///
    /// # Errors
    ///
    /// Returns `ListsError::Validation` if the column id is empty or the value
    /// shape does not match the type
    pub fn new(
        column_id: impl Into<String>,
        field_type: FieldType,
        value: &Value,
    ) -> Result<Self, ListsError> {
        let column_id = column_id.into();
        if column_id.trim().is_empty() {
            return Err(ListsError::validation("field column_id must not be empty"));
        }

        let mismatch = |expected: &str| {
            ListsError::validation(format!(
                "field {column_id} of type {field_type} expects {expected}, got {}",
                json_kind(value)
            ))
        };

        let data = match field_type {
            FieldType::Text => FieldData::Text(value.as_str().ok_or_else(|| mismatch("a string"))?.to_string()),
            FieldType::Date => {
                let date = value.as_str().ok_or_else(|| mismatch("a YYYY-MM-DD string"))?;
                NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                    ListsError::validation(format!(
                        "field {column_id} of type date expects YYYY-MM-DD, got '{date}'"
                    ))
                })?;
                FieldData::Date(date.to_string())
            }
            FieldType::User => FieldData::User(
                id_list(value).ok_or_else(|| mismatch("a non-empty list of user ids"))?,
            ),
            FieldType::Select => FieldData::Select(
                id_list(value).ok_or_else(|| mismatch("a non-empty list of option ids"))?,
            ),
            FieldType::Checkbox => FieldData::Checkbox(value.as_bool().ok_or_else(|| mismatch("a boolean"))?),
            FieldType::Number => FieldData::Number(value.as_f64().ok_or_else(|| mismatch("a number"))?),
            FieldType::Email => FieldData::Email(value.as_str().ok_or_else(|| mismatch("a string"))?.to_string()),
            FieldType::Phone => FieldData::Phone(value.as_str().ok_or_else(|| mismatch("a string"))?.to_string()),
        };

        Ok(Self { column_id, data })
    }

    /// Target column
    #[must_use]
    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    /// Typed payload
    #[must_use]
    pub const fn data(&self) -> &FieldData {
        &self.data
    }

    /// Column type
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self.data {
            FieldData::Text(_) => FieldType::Text,
            FieldData::Date(_) => FieldType::Date,
            FieldData::User(_) => FieldType::User,
            FieldData::Select(_) => FieldType::Select,
            FieldData::Checkbox(_) => FieldType::Checkbox,
            FieldData::Number(_) => FieldType::Number,
            FieldData::Email(_) => FieldType::Email,
            FieldData::Phone(_) => FieldType::Phone,
        }
    }
}

impl From<&FieldValue> for InitialField {
    fn from(field: &FieldValue) -> Self {
        let value = match &field.data {
            FieldData::Text(text) => return Self::text(field.column_id.clone(), text.clone()),
            FieldData::Date(date) => FieldPayload::Date(vec![date.clone()]),
            FieldData::User(ids) => FieldPayload::User(ids.clone()),
            FieldData::Select(ids) => FieldPayload::Select(ids.clone()),
            FieldData::Checkbox(checked) => FieldPayload::Checkbox(*checked),
            FieldData::Number(number) => FieldPayload::Number(vec![*number]),
            FieldData::Email(email) => FieldPayload::Email(vec![email.clone()]),
            FieldData::Phone(phone) => FieldPayload::Phone(vec![phone.clone()]),
        };

        Self {
            column_id: field.column_id.clone(),
            value,
        }
    }
}

fn id_list(value: &Value) -> Option<Vec<String>> {
    let ids: Vec<String> = match value {
        Value::String(id) => vec![id.clone()],
        Value::Array(values) => values
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<_>>()?,
        _ => return None,
    };

    (!ids.is_empty() && ids.iter().all(|id| !id.is_empty())).then_some(ids)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A field exactly as the caller declared it, before validation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldInput {
    /// Target column
    #[serde(default)]
    pub column_id: String,
    /// Declared type token
    #[serde(default, rename = "type")]
    pub field_type: String,
    /// Raw value
    #[serde(default)]
    pub value: Value,
}

impl FieldInput {
    /// Build an input from parts
    #[must_use]
    pub fn new(column_id: impl Into<String>, field_type: impl Into<String>, value: Value) -> Self {
        Self {
            column_id: column_id.into(),
            field_type: field_type.into(),
            value,
        }
    }

    /// Validate into a typed [`FieldValue`]
    ///
    /// # Errors
    ///
    /// Returns `ListsError::Validation` for unknown types or mismatched shapes
    pub fn validate(&self) -> Result<FieldValue, ListsError> {
        FieldValue::new(self.column_id.clone(), self.field_type.parse()?, &self.value)
    }
}

/// Request to create one list item
#[derive(Clone, Debug, PartialEq)]
pub struct ListItemRequest {
    title: String,
    title_column_id: String,
    fields: Vec<FieldInput>,
    parent_item_id: Option<String>,
}

impl ListItemRequest {
    /// Request titled `title` in the default title column
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_column_id: DEFAULT_TITLE_COLUMN_ID.to_string(),
            fields: Vec::new(),
            parent_item_id: None,
        }
    }

    /// Builder: Set title column
    #[must_use]
    pub fn with_title_column(mut self, title_column_id: impl Into<String>) -> Self {
        self.title_column_id = title_column_id.into();
        self
    }

    /// Builder: Set additional fields
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldInput>) -> Self {
        self.fields = fields;
        self
    }

    /// Builder: Set parent item
    #[must_use]
    pub fn with_parent(mut self, parent_item_id: Option<String>) -> Self {
        self.parent_item_id = parent_item_id.filter(|id| !id.is_empty());
        self
    }

    /// Item title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title column
    #[must_use]
    pub fn title_column_id(&self) -> &str {
        &self.title_column_id
    }

    /// Declared fields
    #[must_use]
    pub fn fields(&self) -> &[FieldInput] {
        &self.fields
    }

    /// Parent item
    #[must_use]
    pub fn parent_item_id(&self) -> Option<&str> {
        self.parent_item_id.as_deref()
    }

    /// Validate and build the wire request for `list_id`
    ///
    /// The title is always the first field sent.
    ///
    /// # Errors
    ///
    /// Returns `ListsError::Validation` for an empty title, an empty title
    /// column, or any field that fails [`FieldInput::validate`]
    pub fn into_create_request(self, list_id: &str) -> Result<CreateItemRequest, ListsError> {
        if list_id.trim().is_empty() {
            return Err(ListsError::validation("list_id must not be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(ListsError::validation("title must not be empty"));
        }
        if self.title_column_id.trim().is_empty() {
            return Err(ListsError::validation("title_column_id must not be empty"));
        }

        let mut initial_fields = Vec::with_capacity(self.fields.len() + 1);
        initial_fields.push(InitialField::text(self.title_column_id, self.title));
        for field in &self.fields {
            initial_fields.push(InitialField::from(&field.validate()?));
        }

        Ok(CreateItemRequest::new(list_id, initial_fields).with_parent(self.parent_item_id))
    }
}

/// Batch entry that could not be turned into a [`ListItemRequest`]
///
/// Submitted as a failure at its own index without calling Slack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedItem {
    /// Title, if one could be read
    pub title: String,
    /// Why the entry was rejected
    pub error: ListsError,
}

impl RejectedItem {
    /// Reject an entry with `title`
    #[must_use]
    pub fn new(title: impl Into<String>, error: ListsError) -> Self {
        Self {
            title: title.into(),
            error,
        }
    }
}

/// Outcome of one request in a batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    /// Zero-based position in the batch
    pub index: usize,
    /// Title that was submitted
    pub title: String,
    /// Whether the item was created
    pub succeeded: bool,
    /// Created item id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Failure class, see [`ListsError::kind`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl SubmissionResult {
    /// Successful submission
    #[must_use]
    pub fn success(index: usize, title: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            succeeded: true,
            item_id: Some(item_id.into()),
            error_message: None,
            error_kind: None,
        }
    }

    /// Failed submission
    #[must_use]
    pub fn failure(index: usize, title: impl Into<String>, error: &ListsError) -> Self {
        Self {
            index,
            title: title.into(),
            succeeded: false,
            item_id: None,
            error_message: Some(error.to_string()),
            error_kind: Some(error.kind().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_parse() {
        assert_eq!("checkbox".parse::<FieldType>(), Ok(FieldType::Checkbox));
        assert!(matches!(
            "rating".parse::<FieldType>(),
            Err(ListsError::Validation(_))
        ));
    }

    #[test]
    fn test_select_promotes_single_string() {
        let field = FieldValue::new("Col2", FieldType::Select, &json!("High")).expect("valid");
        assert_eq!(field.data(), &FieldData::Select(vec!["High".to_string()]));
    }

    #[test]
    fn test_user_rejects_non_string_members() {
        let result = FieldValue::new("Col3", FieldType::User, &json!(["U1", 7]));
        assert!(matches!(result, Err(ListsError::Validation(_))));

        let result = FieldValue::new("Col3", FieldType::User, &json!([]));
        assert!(matches!(result, Err(ListsError::Validation(_))));
    }

    #[test]
    fn test_checkbox_requires_boolean() {
        let result = FieldValue::new("Col4", FieldType::Checkbox, &json!("true"));
        let err = result.expect_err("string is not a boolean");
        assert!(err.to_string().contains("expects a boolean"));
    }

    #[test]
    fn test_date_must_be_calendar_date() {
        assert!(FieldValue::new("Col1", FieldType::Date, &json!("2024-12-31")).is_ok());
        assert!(FieldValue::new("Col1", FieldType::Date, &json!("2024-02-30")).is_err());
        assert!(FieldValue::new("Col1", FieldType::Date, &json!("31/12/2024")).is_err());
    }

    #[test]
    fn test_number_field_wire_shape() {
        let field = FieldValue::new("Col5", FieldType::Number, &json!(3.5)).expect("valid");
        let wire = serde_json::to_value(InitialField::from(&field)).expect("serializable");
        assert_eq!(wire, json!({"column_id": "Col5", "number": [3.5]}));
    }

    #[test]
    fn test_empty_title_rejected() {
        let result = ListItemRequest::new("   ").into_create_request("F123");
        assert_eq!(
            result,
            Err(ListsError::Validation("title must not be empty".to_string()))
        );
    }

    #[test]
    fn test_create_request_puts_title_first() {
        let request = ListItemRequest::new("Fix bug #123")
            .with_title_column("Col10000000")
            .with_fields(vec![
                FieldInput::new("Col10000001", "date", json!("2024-12-10")),
                FieldInput::new("Col10000002", "select", json!(["Medium"])),
            ])
            .with_parent(Some("Rec0".to_string()))
            .into_create_request("F123")
            .expect("valid request");

        assert_eq!(request.list_id, "F123");
        assert_eq!(request.parent_item_id.as_deref(), Some("Rec0"));
        assert_eq!(request.initial_fields.len(), 3);
        assert_eq!(request.initial_fields[0].column_id, "Col10000000");
        assert_eq!(
            request.initial_fields[2].value,
            FieldPayload::Select(vec!["Medium".to_string()])
        );
    }

    #[test]
    fn test_bad_field_fails_whole_request() {
        let result = ListItemRequest::new("Item")
            .with_fields(vec![FieldInput::new("Col9", "checkbox", json!(1))])
            .into_create_request("F123");
        assert!(matches!(result, Err(ListsError::Validation(_))));
    }

    #[test]
    fn test_field_input_deserializes_type_key() {
        let input: FieldInput =
            serde_json::from_value(json!({"column_id": "Col1", "type": "text", "value": "hi"}))
                .expect("valid input");
        assert_eq!(input.field_type, "text");
        assert_eq!(
            input.validate().expect("valid field").field_type(),
            FieldType::Text
        );
    }

    #[test]
    fn test_submission_result_failure_carries_kind() {
        let result = SubmissionResult::failure(2, "x", &ListsError::validation("bad"));
        assert!(!result.succeeded);
        assert_eq!(result.error_kind.as_deref(), Some("validation_error"));
        assert_eq!(result.error_message.as_deref(), Some("Validation error: bad"));
    }
}
