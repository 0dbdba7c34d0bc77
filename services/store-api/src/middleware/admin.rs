// /lf-gaming-store/services/store-api/src/middleware/admin.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::utils::error::AppError;
use crate::AppState;

/// Guard untuk semua route /api/admin: header X-Admin-Token harus
/// cocok dengan ADMIN_API_TOKEN dari environment.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get("x-admin-token")
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(token) if token == state.admin_token => next.run(request).await,
        Some(_) => {
            tracing::warn!("Request admin dengan token salah ditolak");
            AppError::Forbidden("Token admin tidak valid".to_string()).into_response()
        }
        None => AppError::Unauthorized("Token admin diperlukan".to_string()).into_response(),
    }
}
