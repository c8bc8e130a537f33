//! Wire representation of todo rows and the conversions between the
//! remote store's shape (snake_case columns, RFC 3339 string
//! timestamps) and the domain types.

use chrono::{DateTime, Utc};
use domain::{AddTodoRequest, Priority, Todo, TodoError, TodoId, UserId};
use serde::{Deserialize, Serialize};

/// A todo row exactly as the remote store returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
    pub is_completed: bool,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<TodoRecord> for Todo {
    type Error = TodoError;

    fn try_from(record: TodoRecord) -> Result<Self, Self::Error> {
        Ok(Todo {
            id: TodoId::from_string(record.id),
            title: record.title,
            description: record.description,
            due_date: parse_timestamp(&record.due_date)?,
            priority: record.priority,
            is_completed: record.is_completed,
            user_id: UserId::from_string(record.user_id),
            created_at: parse_timestamp(&record.created_at)?,
            updated_at: parse_timestamp(&record.updated_at)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TodoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TodoError::MalformedRecord(format!("{value}: {e}")))
}

/// Insert payload for a new row. No id, created_at, or updated_at —
/// the server assigns those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoInsert {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
    pub is_completed: bool,
    pub user_id: String,
}

impl TodoInsert {
    /// Builds the insert payload for the authenticated caller. The
    /// completion flag is always false and the owner always comes from
    /// the session, never from the request body.
    pub fn from_request(request: &AddTodoRequest, owner: &UserId) -> Self {
        Self {
            title: request.title.clone(),
            description: request.description.clone(),
            due_date: request.due_date.to_rfc3339(),
            priority: request.priority,
            is_completed: false,
            user_id: owner.as_str().to_string(),
        }
    }
}

/// Update payload. Immutable columns (id, user_id, created_at) are not
/// representable; absent fields are left untouched by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    pub updated_at: String,
}

impl TodoPatch {
    /// Full replace of the editable fields, with a fresh `updated_at`.
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            title: Some(todo.title.clone()),
            description: Some(todo.description.clone()),
            due_date: Some(todo.due_date.to_rfc3339()),
            priority: Some(todo.priority),
            is_completed: Some(todo.is_completed),
            updated_at: Utc::now().to_rfc3339(),
        }
    }

    /// Patch touching only the completion flag (plus `updated_at`).
    pub fn completion(is_completed: bool) -> Self {
        Self {
            title: None,
            description: None,
            due_date: None,
            priority: None,
            is_completed: Some(is_completed),
            updated_at: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> TodoRecord {
        TodoRecord {
            id: "todo-1".to_string(),
            title: "Buy milk".to_string(),
            description: "Two liters".to_string(),
            due_date: "2024-09-01T12:00:00+00:00".to_string(),
            priority: Priority::High,
            is_completed: true,
            user_id: "user-a".to_string(),
            created_at: "2024-08-01T08:30:00+00:00".to_string(),
            updated_at: "2024-08-02T09:15:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_record_maps_to_domain() {
        let todo = Todo::try_from(sample_record()).unwrap();
        assert_eq!(todo.id.as_str(), "todo-1");
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.priority, Priority::High);
        assert!(todo.is_completed);
        assert_eq!(todo.user_id.as_str(), "user-a");
        assert_eq!(todo.due_date.to_rfc3339(), "2024-09-01T12:00:00+00:00");
    }

    #[test]
    fn test_malformed_due_date_is_rejected() {
        let mut record = sample_record();
        record.due_date = "next tuesday".to_string();
        let err = Todo::try_from(record).unwrap_err();
        assert!(matches!(err, TodoError::MalformedRecord(_)));
    }

    #[test]
    fn test_insert_forces_completion_false_and_session_owner() {
        let request = AddTodoRequest {
            title: "Buy milk".to_string(),
            description: String::new(),
            due_date: Utc::now(),
            priority: Priority::Low,
        };
        let owner = UserId::from_string("user-a".to_string());
        let insert = TodoInsert::from_request(&request, &owner);
        assert!(!insert.is_completed);
        assert_eq!(insert.user_id, "user-a");
    }

    #[test]
    fn test_insert_payload_has_no_server_assigned_columns() {
        let request = AddTodoRequest {
            title: "Buy milk".to_string(),
            description: String::new(),
            due_date: Utc::now(),
            priority: Priority::Low,
        };
        let owner = UserId::from_string("user-a".to_string());
        let json = serde_json::to_value(TodoInsert::from_request(&request, &owner)).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
        assert!(json.get("updated_at").is_none());
    }

    #[test]
    fn test_round_trip_preserves_fields_and_refreshes_updated_at() {
        let record = sample_record();
        let todo = Todo::try_from(record.clone()).unwrap();
        let patch = TodoPatch::from_todo(&todo);

        assert_eq!(patch.title.as_deref(), Some(record.title.as_str()));
        assert_eq!(patch.description.as_deref(), Some(record.description.as_str()));
        assert_eq!(patch.priority, Some(record.priority));
        assert_eq!(patch.is_completed, Some(record.is_completed));
        assert_eq!(
            patch.due_date.as_deref(),
            Some("2024-09-01T12:00:00+00:00")
        );
        let patched = DateTime::parse_from_rfc3339(&patch.updated_at).unwrap();
        let prior = DateTime::parse_from_rfc3339(&record.updated_at).unwrap();
        assert!(patched > prior);
    }

    #[test]
    fn test_full_patch_has_no_immutable_columns() {
        let todo = Todo::try_from(sample_record()).unwrap();
        let json = serde_json::to_value(TodoPatch::from_todo(&todo)).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("user_id").is_none());
        assert!(json.get("created_at").is_none());
        assert!(json.get("updated_at").is_some());
    }

    #[test]
    fn test_completion_patch_carries_only_flag_and_timestamp() {
        let json = serde_json::to_value(TodoPatch::completion(true)).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["is_completed"], true);
        assert!(object.contains_key("updated_at"));
    }
}
