//! Wire models for the Taskly service.

use serde::{Deserialize, Serialize};

/// A task as returned by the service. The client holds a transient copy
/// fetched per command and never caches it across invocations.
///
/// `completed_at` is set iff `completed` is true; that invariant is enforced
/// server-side and trusted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[allow(dead_code)]
    pub token_type: Option<String>,
}

/// Success payload of /auth/register and /auth/login.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: AuthToken,
}

/// Unsaved form state for creating or editing a task.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// GET /tasks/:id wraps the task; create/update/toggle return it bare.
#[derive(Debug, Deserialize)]
pub struct TaskEnvelope {
    pub task: Task,
}

/// The list endpoint has been observed returning both a wrapped object and a
/// bare array. Accept both here and normalize, so no caller ever sees the
/// difference.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TaskListResponse {
    Wrapped { tasks: Vec<Task> },
    Bare(Vec<Task>),
}

impl TaskListResponse {
    pub fn into_tasks(self) -> Vec<Task> {
        match self {
            TaskListResponse::Wrapped { tasks } => tasks,
            TaskListResponse::Bare(tasks) => tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_wrapped_shape() {
        let raw = r#"{"tasks": [{"id": "1", "title": "Buy milk", "description": null,
            "completed": false, "completed_at": null,
            "created_at": "2026-01-05T10:00:00Z", "updated_at": "2026-01-05T10:00:00Z"}]}"#;
        let parsed: TaskListResponse = serde_json::from_str(raw).unwrap();
        let tasks = parsed.into_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy milk");
    }

    #[test]
    fn test_list_bare_shape() {
        let raw = r#"[{"id": "1", "title": "Buy milk", "description": null,
            "completed": false, "completed_at": null,
            "created_at": "2026-01-05T10:00:00Z", "updated_at": "2026-01-05T10:00:00Z"}]"#;
        let parsed: TaskListResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_tasks().len(), 1);
    }

    #[test]
    fn test_list_empty_shapes() {
        let wrapped: TaskListResponse = serde_json::from_str(r#"{"tasks": []}"#).unwrap();
        assert!(wrapped.into_tasks().is_empty());
        let bare: TaskListResponse = serde_json::from_str("[]").unwrap();
        assert!(bare.into_tasks().is_empty());
    }

    #[test]
    fn test_auth_response_decodes_nested_token() {
        let raw = r#"{"user": {"id": "u-1", "email": "a@b.com", "created_at": "2026-01-05T10:00:00Z"},
            "token": {"access_token": "tok-abc", "token_type": "bearer"}}"#;
        let parsed: AuthResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.user.email, "a@b.com");
        assert_eq!(parsed.token.access_token, "tok-abc");
    }

    #[test]
    fn test_draft_omits_missing_description() {
        let draft = TaskDraft {
            title: "Buy milk".to_string(),
            description: None,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Buy milk"}));

        let with_desc = TaskDraft {
            title: "Buy milk".to_string(),
            description: Some("2 liters".to_string()),
        };
        let json = serde_json::to_value(&with_desc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "Buy milk", "description": "2 liters"})
        );
    }

    #[test]
    fn test_completed_task_carries_completed_at() {
        let raw = r#"{"id": "2", "title": "Pay rent", "description": "before the 1st",
            "completed": true, "completed_at": "2026-01-06T08:00:00Z",
            "created_at": "2026-01-05T10:00:00Z", "updated_at": "2026-01-06T08:00:00Z"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert!(task.completed);
        assert!(task.completed_at.is_some());
    }
}
