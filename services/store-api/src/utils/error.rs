// /lf-gaming-store/services/store-api/src/utils/error.rs
// Centralized error handling untuk storefront API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::{amount_from_cents, format_cents, Cents, ErrorResponse};

/// Type alias untuk Result dengan AppError
pub type AppResult<T> = Result<T, AppError>;

/// Application error enum dengan semua possible errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Saldo wallet tidak mencukupi")]
    InsufficientFunds { balance: Cents },

    #[error("Transisi status tidak valid: {from} -> {action}")]
    InvalidTransition { from: String, action: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl IntoResponse for AppError {
    /// Convert AppError ke HTTP response.
    /// Detail internal storage tidak pernah ikut keluar ke caller.
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Operasi database gagal".to_string(),
                    None,
                )
            }
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                None,
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                msg.clone(),
                None,
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::InsufficientFunds { balance } => (
                StatusCode::BAD_REQUEST,
                "INSUFFICIENT_FUNDS",
                format!(
                    "Saldo wallet tidak mencukupi (saldo sekarang: {})",
                    format_cents(*balance)
                ),
                // Saldo sekarang ikut dikirim supaya frontend bisa menampilkannya
                Some(serde_json::json!({ "balance": amount_from_cents(*balance) })),
            ),
            AppError::InvalidTransition { .. } => (
                StatusCode::CONFLICT,
                "INVALID_TRANSITION",
                self.to_string(),
                None,
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                msg.clone(),
                None,
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                msg.clone(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error_code: Some(error_code.to_string()),
            details,
        });

        (status, body).into_response()
    }
}

// Implement conversions dari common error types
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource tidak ditemukan".to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}
