// /lf-gaming-store/services/store-api/src/api/handlers.rs

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use validator::Validate;

use crate::{
    models::*,
    utils::{
        error::{AppError, AppResult},
        security,
        validator as utils_validator,
    },
    AppState,
};

// ========================= AUTH HANDLERS =========================

/// Handler untuk registrasi user baru
/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<serde_json::Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let email = utils_validator::normalize_email(&payload.email);
    utils_validator::validate_email_basic(&email)?;

    let password_hash = security::hash_password(&payload.password)?;
    state
        .repository
        .user()
        .create(&email, &password_hash, "customer")
        .await?;

    // Wallet dibuat idempotent saat registrasi
    state.wallet_ledger.ensure(&email).await?;

    tracing::info!("User baru terdaftar: {}", email);

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Registrasi berhasil"
    })))
}

/// Handler untuk login user/admin
/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<serde_json::Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let email = utils_validator::normalize_email(&payload.email);

    // Pesan gagal sengaja sama untuk user tidak ada dan password salah
    let user = state
        .repository
        .user()
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Kredensial tidak valid".to_string()))?;

    if !security::verify_password(&payload.password, &user.password_hash) {
        tracing::warn!("Login gagal untuk {}", email);
        return Err(AppError::Unauthorized("Kredensial tidak valid".to_string()));
    }

    tracing::info!("Login berhasil: {} ({})", user.email, user.role);

    Ok(Json(serde_json::json!({
        "success": true,
        "role": user.role
    })))
}

// ========================= CATALOG HANDLERS =========================

/// Handler untuk daftar games
/// GET /api/games
pub async fn list_games(State(state): State<AppState>) -> AppResult<Json<Vec<Game>>> {
    let games = state.repository.catalog().list_games().await?;
    Ok(Json(games))
}

/// Handler untuk regions dari satu game
/// GET /api/regions?gameId=
pub async fn list_regions(
    State(state): State<AppState>,
    Query(params): Query<RegionsQuery>,
) -> AppResult<Json<Vec<Region>>> {
    let regions = state.repository.catalog().list_regions(&params.game_id).await?;
    Ok(Json(regions))
}

/// Handler untuk packages dari satu game (dengan atau tanpa region)
/// GET /api/packages?gameId=&regionKey=
pub async fn list_packages(
    State(state): State<AppState>,
    Query(params): Query<PackagesQuery>,
) -> AppResult<Json<Vec<PackageView>>> {
    // Frontend lama mengirim string "null"/"undefined" untuk game yang
    // tidak regionable; dua-duanya diperlakukan sebagai absen
    let region_key = params
        .region_key
        .as_deref()
        .filter(|key| !key.is_empty() && *key != "null" && *key != "undefined");

    let packages = state
        .repository
        .catalog()
        .list_packages(&params.game_id, region_key)
        .await?;

    Ok(Json(packages.into_iter().map(PackageView::from).collect()))
}

// ========================= WALLET HANDLERS =========================

/// Handler untuk baca saldo wallet
/// GET /api/wallet?email=
pub async fn get_wallet(
    State(state): State<AppState>,
    Query(params): Query<WalletQuery>,
) -> AppResult<Json<BalanceResponse>> {
    let email = utils_validator::normalize_email(&params.email);
    let balance = state.wallet_ledger.balance(&email).await?;

    Ok(Json(BalanceResponse {
        balance: amount_from_cents(balance),
    }))
}

/// Handler untuk top-up wallet
/// POST /api/wallet/topup
pub async fn topup_wallet(
    State(state): State<AppState>,
    Json(payload): Json<TopupRequest>,
) -> AppResult<Json<BalanceResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let email = utils_validator::normalize_email(&payload.email);
    utils_validator::validate_email_basic(&email)?;
    let amount = utils_validator::validate_positive_amount(payload.amount, "amount")?;

    let balance = state.wallet_ledger.credit(&email, amount).await?;

    tracing::info!("Top-up {} untuk {}", format_cents(amount), email);

    Ok(Json(BalanceResponse {
        balance: amount_from_cents(balance),
    }))
}

// ========================= ORDER HANDLERS =========================

/// Handler untuk membuat order baru
/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<CreateOrderResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.order_workflow.create_order(payload).await?;

    Ok(Json(CreateOrderResponse {
        success: true,
        order_id: created.order_id,
        payment_url: created.payment_url,
    }))
}

/// Handler untuk list orders milik user, terbaru dulu
/// GET /api/orders?email=
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrdersQuery>,
) -> AppResult<Json<Vec<OrderView>>> {
    let orders = state.order_workflow.list_orders(&params.email).await?;
    Ok(Json(orders.into_iter().map(OrderView::from).collect()))
}

// ========================= ADMIN HANDLERS =========================

/// Handler untuk list orders terbaru (admin)
/// GET /api/admin/orders
pub async fn admin_list_orders(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<OrderView>>> {
    let orders = state.order_workflow.admin_recent_orders().await?;
    Ok(Json(orders.into_iter().map(OrderView::from).collect()))
}

/// Handler untuk list item dari satu order (admin)
/// GET /api/admin/orders/{id}/items
pub async fn admin_list_order_items(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Vec<OrderItemView>>> {
    let items = state.order_workflow.order_items(&order_id).await?;
    Ok(Json(items.into_iter().map(OrderItemView::from).collect()))
}

/// Handler untuk mengisi PIN/kode redeem satu item (admin)
/// PUT /api/admin/orders/{id}/items/{item_id}/pin
pub async fn admin_set_item_pin(
    State(state): State<AppState>,
    Path((order_id, item_id)): Path<(String, i64)>,
    Json(payload): Json<SetPinRequest>,
) -> AppResult<Json<serde_json::Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state
        .order_workflow
        .set_item_pin(&order_id, item_id, &payload.pin)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "PIN berhasil disimpan"
    })))
}

/// Handler untuk menyelesaikan order (admin)
/// PUT /api/admin/orders/{id}/complete
pub async fn admin_complete_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<TransitionResponse>> {
    let status = state.order_workflow.complete(&order_id).await?;

    Ok(Json(TransitionResponse {
        success: true,
        order_id,
        status: status.to_db_string().to_string(),
    }))
}

/// Handler untuk membatalkan order (admin)
/// PUT /api/admin/orders/{id}/cancel
pub async fn admin_cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<TransitionResponse>> {
    let status = state.order_workflow.cancel(&order_id).await?;

    Ok(Json(TransitionResponse {
        success: true,
        order_id,
        status: status.to_db_string().to_string(),
    }))
}

/// Handler untuk refund order yang sudah dibatalkan (admin)
/// PUT /api/admin/orders/{id}/refund
pub async fn admin_refund_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<TransitionResponse>> {
    let status = state.order_workflow.refund(&order_id).await?;

    Ok(Json(TransitionResponse {
        success: true,
        order_id,
        status: status.to_db_string().to_string(),
    }))
}

/// Handler untuk override saldo wallet (admin)
/// PUT /api/admin/wallet
pub async fn admin_set_wallet_balance(
    State(state): State<AppState>,
    Json(payload): Json<SetWalletBalanceRequest>,
) -> AppResult<Json<serde_json::Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let email = utils_validator::normalize_email(&payload.email);
    utils_validator::validate_email_basic(&email)?;
    let balance = utils_validator::validate_non_negative_amount(payload.balance, "balance")?;

    state.wallet_ledger.set_balance(&email, balance).await?;

    tracing::info!("Saldo {} di-override jadi {}", email, format_cents(balance));

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Saldo wallet berhasil di-update"
    })))
}
