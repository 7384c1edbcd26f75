//! HTTP client for the remote collection API.
//!
//! Every entity (employee, branch, payroll, user) is a remote collection with
//! create, list, update and delete calls. Writes send `{ "data": ... }`.
//! Any non-2xx status is an error; there is no retry, no backoff and no
//! idempotency key, so a failed write has to be submitted again by the user.

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

pub mod employee;
pub mod filial;
pub mod payroll;
pub mod user;

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("auth: {0}")]
    Auth(String),

    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message the backend put in its error body, when it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } | ApiError::Auth(message) if !message.is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

/// Shared connection pool to the backend. Cheap to clone.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Calls made on behalf of one request, carrying its bearer token.
    pub fn session<'a>(&'a self, token: Option<&'a str>) -> Api<'a> {
        Api { client: self, token }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Backend view bound to one session token.
pub struct Api<'a> {
    client: &'a BackendClient,
    token: Option<&'a str>,
}

impl Api<'_> {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.http.request(method, self.client.url(path));
        match self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends and decodes a JSON body.
    async fn fetch<R: DeserializeOwned>(builder: RequestBuilder) -> Result<R, ApiError> {
        let resp = builder.send().await?;
        let resp = Self::check(resp).await?;
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }

    /// Sends and ignores whatever body comes back (deletes answer 204).
    async fn execute(builder: RequestBuilder) -> Result<(), ApiError> {
        let resp = builder.send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Server {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// Pulls `error.message` out of a backend error body, falling back to the
/// raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_backend_json() {
        let body = r#"{"data":null,"error":{"status":400,"message":"Email already taken"}}"#;
        assert_eq!(error_message(body), "Email already taken");
        assert_eq!(error_message("  Bad Gateway "), "Bad Gateway");
        assert_eq!(error_message(""), "");
    }

    #[test]
    fn urls_are_rooted_at_api() {
        let client = BackendClient::new("http://strapi.local:1337/");
        assert_eq!(client.url("employes"), "http://strapi.local:1337/api/employes");
        assert_eq!(client.url("/users/me"), "http://strapi.local:1337/api/users/me");
    }

    #[test]
    fn backend_message_skips_transport_errors() {
        let err = ApiError::Server { status: 400, message: "Nome inválido".into() };
        assert_eq!(err.backend_message(), Some("Nome inválido"));
        let err = ApiError::Server { status: 500, message: String::new() };
        assert_eq!(err.backend_message(), None);
        let err = ApiError::Decode("eof".into());
        assert_eq!(err.backend_message(), None);
    }
}
