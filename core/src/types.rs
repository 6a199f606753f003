//! Domain DTOs shared by the todo server and client.
//!
//! # Design
//! Every wire type lives here so the server handlers and the client build
//! and parse the same JSON shape. Field names are camelCase on the wire
//! (the web client expects them); structs stay snake_case internally via
//! serde rename rules. Request priorities are plain integers so range
//! violations reach the validation layer as field errors instead of dying
//! in the deserializer.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Ordinal urgency level, Low through Urgent.
///
/// Serialized as its integer value, matching the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
    Urgent = 3,
}

impl Priority {
    /// Converts a raw request value, `None` when out of range.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Low),
            1 => Some(Self::Medium),
            2 => Some(Self::High),
            3 => Some(Self::Urgent),
            _ => None,
        }
    }

    /// Human-readable name, exposed as `priorityLabel` in responses.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority as u8
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_i32(i32::from(value)).ok_or_else(|| format!("priority out of range: {value}"))
    }
}

/// A single todo record as returned by the API.
///
/// `completed_at` is non-null exactly when `is_completed` is true;
/// `priority_label` is derived from `priority` on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub priority_label: String,
    pub tags: Vec<String>,
}

fn default_priority() -> i32 {
    1
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Caller's timezone offset in minutes, JavaScript `getTimezoneOffset()`
    /// convention (positive west of UTC). Only consulted when validating
    /// `due_date`; never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_offset: Option<i32>,
    /// Raw priority value, validated to the 0..=3 range before use.
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Request payload for updating an existing todo. Only the fields present
/// in the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// See [`CreateTodo::timezone_offset`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_offset: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Optional equality filters for the list endpoint, carried in the query
/// string as `isCompleted` and `priority`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoFilter {
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<u8>,
}

/// Standard error body for every non-2xx response.
///
/// `errors` maps field names to their failure messages on validation
/// errors; `trace_id` identifies the server-side log entry for faults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_todo() -> Todo {
        Todo {
            id: 1,
            title: "Test".to_string(),
            description: None,
            is_completed: false,
            created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            completed_at: None,
            due_date: None,
            priority: Priority::Medium,
            priority_label: "Medium".to_string(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn priority_serializes_as_integer() {
        let json = serde_json::to_value(Priority::High).unwrap();
        assert_eq!(json, 2);
    }

    #[test]
    fn priority_rejects_out_of_range() {
        let result: Result<Priority, _> = serde_json::from_str("7");
        assert!(result.is_err());
    }

    #[test]
    fn priority_labels_match_variants() {
        assert_eq!(Priority::Low.label(), "Low");
        assert_eq!(Priority::Urgent.label(), "Urgent");
        assert_eq!(Priority::from_i32(2), Some(Priority::High));
        assert_eq!(Priority::from_i32(4), None);
    }

    #[test]
    fn todo_serializes_to_camel_case_json() {
        let json = serde_json::to_value(sample_todo()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["isCompleted"], false);
        assert_eq!(json["createdAt"], "2026-01-15T10:00:00Z");
        assert!(json["completedAt"].is_null());
        assert!(json["dueDate"].is_null());
        assert_eq!(json["priority"], 1);
        assert_eq!(json["priorityLabel"], "Medium");
        assert_eq!(json["tags"], serde_json::json!([]));
    }

    #[test]
    fn todo_roundtrips_through_json() {
        let todo = Todo {
            description: Some("details".to_string()),
            is_completed: true,
            completed_at: Some(Utc.with_ymd_and_hms(2026, 1, 16, 9, 30, 0).unwrap()),
            due_date: Some(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()),
            priority: Priority::Urgent,
            priority_label: "Urgent".to_string(),
            tags: vec!["home".to_string(), "errand".to_string()],
            ..sample_todo()
        };
        let json = serde_json::to_string(&todo).unwrap();
        let back: Todo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, todo);
    }

    #[test]
    fn create_todo_defaults_priority_to_medium() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(input.title, "Buy milk");
        assert_eq!(input.priority, 1);
        assert!(input.description.is_none());
        assert!(input.due_date.is_none());
        assert!(input.tags.is_none());
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"priority":2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_todo_accepts_out_of_range_priority() {
        // Range enforcement is the validation layer's job, not serde's.
        let input: CreateTodo = serde_json::from_str(r#"{"title":"x","priority":-1}"#).unwrap();
        assert_eq!(input.priority, -1);
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.is_completed.is_none());
        assert!(input.tags.is_none());
    }

    #[test]
    fn update_todo_serializes_only_present_fields() {
        let input = UpdateTodo {
            priority: Some(3),
            ..UpdateTodo::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({"priority": 3}));
    }

    #[test]
    fn filter_deserializes_camel_case_keys() {
        let filter: TodoFilter =
            serde_json::from_str(r#"{"isCompleted":true,"priority":2}"#).unwrap();
        assert_eq!(filter.is_completed, Some(true));
        assert_eq!(filter.priority, Some(2));
    }

    #[test]
    fn error_body_roundtrips_with_field_errors() {
        let json = r#"{"message":"Validation failed","statusCode":400,"errors":{"title":["Title is required"]}}"#;
        let body: ErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.status_code, 400);
        assert_eq!(
            body.errors.as_ref().unwrap()["title"],
            vec!["Title is required".to_string()]
        );
        assert!(body.trace_id.is_none());
    }
}
