//! Account endpoints: /auth/register and /auth/login.

use super::client::ApiClient;
use super::error::ApiError;
use super::models::{AuthResponse, Credentials};

pub async fn register(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<AuthResponse, ApiError> {
    let body = Credentials {
        email: email.to_string(),
        password: password.to_string(),
    };
    let response = client.post("/auth/register", &body).await?;
    response.json().await.map_err(ApiError::Decode)
}

pub async fn login(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<AuthResponse, ApiError> {
    let body = Credentials {
        email: email.to_string(),
        password: password.to_string(),
    };
    let response = client.post("/auth/login", &body).await?;
    response.json().await.map_err(ApiError::Decode)
}
