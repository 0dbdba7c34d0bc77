// /lf-gaming-store/services/store-api/src/repository/order.rs

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::{NewOrderItem, Order, OrderItem, OrderStatus, PaymentMethod};
use crate::utils::error::{AppError, AppResult};

/// Repository untuk order header dan order items
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Create new order repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Tulis order header + semua item sebagai SATU batch all-or-nothing.
    /// Ini primitive batch milik store; kalau salah satu insert gagal,
    /// tidak ada baris yang tersisa.
    pub async fn insert_order_with_items(
        &self,
        order: &Order,
        items: &[NewOrderItem],
    ) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_email, total_cents, payment_method, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_email)
        .bind(order.total_cents)
        .bind(order.payment_method.to_db_string())
        .bind(order.status.to_db_string())
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, game_name, package_label, quantity, price_cents, uid)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&order.id)
            .bind(&item.game_name)
            .bind(&item.package_label)
            .bind(item.quantity)
            .bind(item.price_cents)
            .bind(&item.uid)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Find order by ID
    pub async fn find_by_id(&self, order_id: &str) -> AppResult<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_email, total_cents, payment_method, status, created_at
            FROM orders
            WHERE id = ?
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(|r| Self::map_row_to_order(&r)).transpose()
    }

    /// Pindahkan status order dengan conditional update: baris hanya
    /// berubah kalau status sekarang masih salah satu dari `from`.
    /// Return rows_affected (0 atau 1) supaya caller bisa membedakan
    /// menang/kalah race tanpa read-then-write.
    pub async fn transition(
        &self,
        order_id: &str,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> AppResult<u64> {
        let placeholders = vec!["?"; from.len()].join(", ");
        let sql = format!(
            "UPDATE orders SET status = ? WHERE id = ? AND status IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(to.to_db_string()).bind(order_id);
        for status in from {
            query = query.bind(status.to_db_string());
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// List orders milik satu user, terbaru dulu
    pub async fn list_by_email(&self, email: &str) -> AppResult<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_email, total_cents, payment_method, status, created_at
            FROM orders
            WHERE user_email = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.iter().map(Self::map_row_to_order).collect()
    }

    /// List orders terbaru untuk admin, dibatasi `limit`
    pub async fn list_recent(&self, limit: u32) -> AppResult<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_email, total_cents, payment_method, status, created_at
            FROM orders
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.iter().map(Self::map_row_to_order).collect()
    }

    /// List item dari satu order, urut sesuai insert
    pub async fn list_items(&self, order_id: &str) -> AppResult<Vec<OrderItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, game_name, package_label, quantity, price_cents, uid, pin
            FROM order_items
            WHERE order_id = ?
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| OrderItem {
                id: r.get("id"),
                order_id: r.get("order_id"),
                game_name: r.get("game_name"),
                package_label: r.get("package_label"),
                quantity: r.get("quantity"),
                price_cents: r.get("price_cents"),
                uid: r.get("uid"),
                pin: r.get("pin"),
            })
            .collect())
    }

    /// Isi/overwrite PIN satu item. Return rows_affected.
    pub async fn set_item_pin(&self, order_id: &str, item_id: i64, pin: &str) -> AppResult<u64> {
        let result = sqlx::query("UPDATE order_items SET pin = ? WHERE id = ? AND order_id = ?")
            .bind(pin)
            .bind(item_id)
            .bind(order_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    // Helper untuk mapping row ke Order
    fn map_row_to_order(row: &SqliteRow) -> AppResult<Order> {
        let status_str: String = row.get("status");
        let status = OrderStatus::from_db_str(&status_str)
            .ok_or_else(|| AppError::Database(format!("Status order tidak dikenal: {}", status_str)))?;

        let method_str: String = row.get("payment_method");
        let payment_method = PaymentMethod::from_db_str(&method_str).ok_or_else(|| {
            AppError::Database(format!("Metode pembayaran tidak dikenal: {}", method_str))
        })?;

        Ok(Order {
            id: row.get("id"),
            user_email: row.get("user_email"),
            total_cents: row.get("total_cents"),
            payment_method,
            status,
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
        })
    }
}
