//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
    #[error("invalid route {path}: {reason}")]
    InvalidRoute { path: String, reason: String },
    #[error("duplicate route path: {0}")]
    DuplicatePath(String),
    #[error("routes file {path}: {reason}")]
    RoutesFile { path: String, reason: String },
}

/// Failure reported by a backing store for one query.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("decode: {0}")]
    Decode(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
