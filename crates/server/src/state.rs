use std::sync::{Arc, Mutex};

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use llm_bridge::SymptomAnalyzer;
use rusqlite::Connection;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Header carrying the caller's opaque owner id
pub const OWNER_HEADER: &str = "x-owner-id";

pub struct AppState {
    db: Mutex<Connection>,
    pub analyzer: Arc<dyn SymptomAnalyzer>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(conn: Connection, analyzer: Arc<dyn SymptomAnalyzer>, config: ServerConfig) -> Self {
        Self {
            db: Mutex::new(conn),
            analyzer,
            config,
        }
    }

    /// Run `f` with the connection locked; the lock ends with the closure
    pub fn with_db<T>(&self, f: impl FnOnce(&Connection) -> Result<T, ApiError>) -> Result<T, ApiError> {
        let conn = self
            .db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))?;
        f(&conn)
    }
}

/// Caller identity taken from the `X-Owner-Id` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Owner(value.to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}

/// JSON request body whose rejections use the API error envelope
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}
