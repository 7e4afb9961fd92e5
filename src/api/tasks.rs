//! Task endpoints. Every function issues exactly one request; nothing is
//! cached between calls.

use super::client::ApiClient;
use super::error::ApiError;
use super::models::{Task, TaskDraft, TaskEnvelope, TaskListResponse};

/// Fetch all tasks, normalizing the response shape to a plain vector.
pub async fn list(client: &ApiClient) -> Result<Vec<Task>, ApiError> {
    let response = client.get("/tasks").await?;
    let list: TaskListResponse = response.json().await.map_err(ApiError::Decode)?;
    Ok(list.into_tasks())
}

pub async fn get(client: &ApiClient, id: &str) -> Result<Task, ApiError> {
    let response = client.get(&format!("/tasks/{id}")).await?;
    let envelope: TaskEnvelope = response.json().await.map_err(ApiError::Decode)?;
    Ok(envelope.task)
}

pub async fn create(client: &ApiClient, draft: &TaskDraft) -> Result<Task, ApiError> {
    let response = client.post("/tasks", draft).await?;
    response.json().await.map_err(ApiError::Decode)
}

/// Full-replace update: the whole draft is sent, not a diff.
pub async fn update(client: &ApiClient, id: &str, draft: &TaskDraft) -> Result<Task, ApiError> {
    let response = client.put(&format!("/tasks/{id}"), draft).await?;
    response.json().await.map_err(ApiError::Decode)
}

pub async fn toggle(client: &ApiClient, id: &str) -> Result<Task, ApiError> {
    let response = client.patch(&format!("/tasks/{id}/toggle")).await?;
    response.json().await.map_err(ApiError::Decode)
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/tasks/{id}")).await?;
    Ok(())
}
