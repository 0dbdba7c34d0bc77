// /lf-gaming-store/services/store-api/src/repository/wallet.rs

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::models::Cents;
use crate::utils::error::{AppError, AppResult};

/// Repository untuk baris wallet. Semua mutasi saldo berbentuk satu
/// statement conditional/unconditional update — tidak ada pola
/// read-then-write di sini.
pub struct WalletRepository {
    pool: SqlitePool,
}

impl WalletRepository {
    /// Create new wallet repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Buat baris wallet dengan saldo 0 kalau belum ada. Idempotent.
    pub async fn ensure(&self, email: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO wallets (user_email, balance_cents, updated_at) VALUES (?, 0, ?)",
        )
        .bind(email)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Baca saldo tanpa side effect. None = wallet belum pernah dibuat.
    pub async fn balance(&self, email: &str) -> AppResult<Option<Cents>> {
        let row = sqlx::query("SELECT balance_cents FROM wallets WHERE user_email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(|r| r.get("balance_cents")))
    }

    /// Debit bersyarat: saldo berkurang hanya kalau mencukupi, dicek dan
    /// dipotong dalam SATU statement supaya dua debit bersamaan tidak
    /// bisa sama-sama lolos. None = saldo kurang, tidak ada mutasi.
    pub async fn try_debit(&self, email: &str, amount: Cents) -> AppResult<Option<Cents>> {
        let row = sqlx::query(
            r#"
            UPDATE wallets
            SET balance_cents = balance_cents - ?, updated_at = ?
            WHERE user_email = ? AND balance_cents >= ?
            RETURNING balance_cents
            "#,
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(email)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(|r| r.get("balance_cents")))
    }

    /// Tambah saldo. None = baris wallet tidak ada (caller wajib ensure dulu).
    pub async fn credit(&self, email: &str, amount: Cents) -> AppResult<Option<Cents>> {
        let row = sqlx::query(
            r#"
            UPDATE wallets
            SET balance_cents = balance_cents + ?, updated_at = ?
            WHERE user_email = ?
            RETURNING balance_cents
            "#,
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(|r| r.get("balance_cents")))
    }

    /// Override saldo tanpa guard (admin tooling)
    pub async fn set_balance(&self, email: &str, amount: Cents) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE wallets SET balance_cents = ?, updated_at = ? WHERE user_email = ?",
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Wallet tidak ditemukan".to_string()));
        }

        Ok(())
    }
}
