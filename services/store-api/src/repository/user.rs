// /lf-gaming-store/services/store-api/src/repository/user.rs

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::models::User;
use crate::utils::error::{AppError, AppResult};

/// Repository untuk operasi database terkait user
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert user baru. Email yang sudah terdaftar kena primary key
    /// constraint dan dilaporkan sebagai Conflict.
    pub async fn create(&self, email: &str, password_hash: &str, role: &str) -> AppResult<()> {
        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.as_database_error()
                    .map(|db_err| db_err.is_unique_violation())
                    .unwrap_or(false)
                {
                    return Err(AppError::Conflict("Email sudah terdaftar".to_string()));
                }
                Err(AppError::Database(e.to_string()))
            }
        }
    }

    /// Cari user berdasarkan email (sudah dinormalisasi oleh caller)
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT email, password_hash, role FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(|r| User {
            email: r.get("email"),
            password_hash: r.get("password_hash"),
            role: r.get("role"),
        }))
    }
}
