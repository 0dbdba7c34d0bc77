// /lf-gaming-store/services/store-api/src/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ========================= MONEY =========================

/// Nominal uang disimpan sebagai integer cents supaya bebas dari
/// masalah presisi floating-point. RM 50.00 = 5000 cents.
pub type Cents = i64;

/// Konversi amount desimal dari request JSON ke cents.
/// Menolak nilai non-finite dan nilai di luar range presisi f64.
pub fn cents_from_amount(amount: f64) -> Option<Cents> {
    if !amount.is_finite() {
        return None;
    }
    let cents = (amount * 100.0).round();
    // 2^53: batas integer yang masih exact di f64
    if cents.abs() >= 9_007_199_254_740_992.0 {
        return None;
    }
    Some(cents as Cents)
}

/// Konversi cents ke amount desimal untuk response JSON.
pub fn amount_from_cents(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Format cents jadi string desimal, dipakai di URL checkout gateway.
/// Contoh: 5000 -> "50.00"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

// ========================= DOMAIN MODELS =========================

/// Kredensial user dari tabel users
#[derive(Debug, Clone)]
pub struct User {
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Game dari katalog
#[derive(Debug, Clone, Serialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub regionable: bool,
    pub uid_required: bool,
}

/// Region dari satu game (untuk game yang regionable)
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    pub game_id: String,
    pub region_key: String,
    pub name: String,
    pub flag: Option<String>,
}

/// Paket top-up dari katalog
#[derive(Debug, Clone)]
pub struct Package {
    pub id: String,
    pub game_id: String,
    pub region_key: Option<String>,
    pub label: String,
    pub price_cents: Cents,
}

/// Order header dari tabel orders
#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub user_email: String,
    pub total_cents: Cents,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Satu baris pembelian di dalam order. Harga di-lock saat checkout;
/// hanya field pin yang boleh berubah setelah order dibuat.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: String,
    pub game_name: String,
    pub package_label: String,
    pub quantity: i64,
    pub price_cents: Cents,
    pub uid: Option<String>,
    pub pin: Option<String>,
}

/// Item yang akan disisipkan bersama order baru (belum punya id)
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub game_name: String,
    pub package_label: String,
    pub quantity: i64,
    pub price_cents: Cents,
    pub uid: Option<String>,
}

// ========================= ENUMS =========================

/// Status order di state machine fulfillment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    PendingPayment,
    Processing,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Convert dari string database
    pub fn from_db_str(status: &str) -> Option<Self> {
        match status {
            "Pending Payment" => Some(OrderStatus::PendingPayment),
            "Processing" => Some(OrderStatus::Processing),
            "Completed" => Some(OrderStatus::Completed),
            "Cancelled" => Some(OrderStatus::Cancelled),
            "Refunded" => Some(OrderStatus::Refunded),
            _ => None,
        }
    }

    /// Convert ke string untuk database
    pub fn to_db_string(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "Pending Payment",
            OrderStatus::Processing => "Processing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
        }
    }

}

/// Metode pembayaran yang didukung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Saldo wallet internal
    Wallet,
    /// Gateway eksternal iPay88 (disimulasikan)
    IPay88,
}

impl PaymentMethod {
    /// Convert dari string request/database
    pub fn from_db_str(method: &str) -> Option<Self> {
        match method {
            "LF Wallet" => Some(PaymentMethod::Wallet),
            "iPay88" => Some(PaymentMethod::IPay88),
            _ => None,
        }
    }

    /// Convert ke string untuk database
    pub fn to_db_string(&self) -> &'static str {
        match self {
            PaymentMethod::Wallet => "LF Wallet",
            PaymentMethod::IPay88 => "iPay88",
        }
    }
}

// ========================= REQUEST DTOs =========================

/// Request registrasi user baru
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Email diperlukan"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password minimal 8 karakter"))]
    pub password: String,
}

/// Request login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email diperlukan"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password diperlukan"))]
    pub password: String,
}

/// Request top-up wallet
#[derive(Debug, Deserialize, Validate)]
pub struct TopupRequest {
    #[validate(length(min = 1, message = "Email diperlukan"))]
    pub email: String,

    pub amount: f64,
}

/// Satu item di dalam request checkout
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderItemRequest {
    pub game_name: String,
    pub package_label: String,
    pub quantity: i64,
    pub price: f64,
    /// UID player untuk game yang top-up langsung ke akun
    pub uid: Option<String>,
}

/// Request untuk membuat order baru
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Email diperlukan"))]
    pub email: String,

    #[validate(length(min = 1, message = "Order harus memiliki minimal satu item"))]
    pub items: Vec<OrderItemRequest>,

    pub total: f64,

    #[validate(length(min = 1, message = "Metode pembayaran diperlukan"))]
    pub payment_method: String,
}

/// Request admin untuk mengisi PIN/kode redeem satu item
#[derive(Debug, Deserialize, Validate)]
pub struct SetPinRequest {
    #[validate(length(min = 1, max = 255, message = "PIN diperlukan (max 255 karakter)"))]
    pub pin: String,
}

/// Request admin untuk override saldo wallet
#[derive(Debug, Deserialize, Validate)]
pub struct SetWalletBalanceRequest {
    #[validate(length(min = 1, message = "Email diperlukan"))]
    pub email: String,

    pub balance: f64,
}

// ========================= QUERY PARAMS =========================

#[derive(Debug, Deserialize)]
pub struct WalletQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct RegionsQuery {
    #[serde(rename = "gameId")]
    pub game_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PackagesQuery {
    #[serde(rename = "gameId")]
    pub game_id: String,
    #[serde(rename = "regionKey")]
    pub region_key: Option<String>,
}

// ========================= RESPONSE DTOs =========================

/// Standard error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error_code: Option<String>,
    pub details: Option<serde_json::Value>,
}

/// Response saldo wallet
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

/// Response pembuatan order
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: String,
    /// Redirect URL gateway; hanya ada untuk metode iPay88
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

/// Response transisi status order (complete/cancel/refund)
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub success: bool,
    pub order_id: String,
    pub status: String,
}

/// Order untuk response JSON (cents dikonversi balik ke desimal)
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: String,
    pub user_email: String,
    pub total: f64,
    pub payment_method: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_email: order.user_email,
            total: amount_from_cents(order.total_cents),
            payment_method: order.payment_method.to_db_string().to_string(),
            status: order.status.to_db_string().to_string(),
            created_at: order.created_at,
        }
    }
}

/// OrderItem untuk response JSON
#[derive(Debug, Serialize)]
pub struct OrderItemView {
    pub id: i64,
    pub order_id: String,
    pub game_name: String,
    pub package_label: String,
    pub quantity: i64,
    pub price: f64,
    pub uid: Option<String>,
    pub pin: Option<String>,
}

impl From<OrderItem> for OrderItemView {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            order_id: item.order_id,
            game_name: item.game_name,
            package_label: item.package_label,
            quantity: item.quantity,
            price: amount_from_cents(item.price_cents),
            uid: item.uid,
            pin: item.pin,
        }
    }
}

/// Package untuk response JSON
#[derive(Debug, Serialize)]
pub struct PackageView {
    pub id: String,
    pub game_id: String,
    pub region_key: Option<String>,
    pub label: String,
    pub price: f64,
}

impl From<Package> for PackageView {
    fn from(package: Package) -> Self {
        Self {
            id: package.id,
            game_id: package.game_id,
            region_key: package.region_key,
            label: package.label,
            price: amount_from_cents(package.price_cents),
        }
    }
}
