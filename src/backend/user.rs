use reqwest::Method;
use serde_json::json;

use super::{Api, ApiError};
use crate::model::user::{UpdateUserPayload, User};
use crate::models::LoginResponse;

impl Api<'_> {
    /// Exchanges credentials for a session token.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let req = self
            .request(Method::POST, "auth/local")
            .json(&json!({ "identifier": identifier, "password": password }));
        Self::fetch(req).await.map_err(|e| match e {
            ApiError::Server { status, message } => {
                ApiError::Auth(format!("login failed ({status}): {message}"))
            }
            other => other,
        })
    }

    /// User owning the session token.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        if self.token.is_none() {
            return Err(ApiError::Auth("missing session token".into()));
        }
        Self::fetch(self.request(Method::GET, "users/me")).await
    }

    pub async fn update_user(&self, id: u64, payload: &UpdateUserPayload) -> Result<User, ApiError> {
        if self.token.is_none() {
            return Err(ApiError::Auth("missing session token".into()));
        }
        let req = self.request(Method::PUT, &format!("users/{id}")).json(payload);
        Self::fetch(req).await
    }
}
