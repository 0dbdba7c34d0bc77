// /lf-gaming-store/services/store-api/src/repository/mod.rs

pub mod catalog;
pub mod order;
pub mod user;
pub mod wallet;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::utils::error::{AppError, AppResult};

/// SQL migration untuk schema awal
const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Main repository struct yang menggabungkan semua repositories.
///
/// Store di bawahnya (SQLite kelas D1) cuma menawarkan dua primitive
/// tulis ke core: conditional update tunggal (dicek lewat rows_affected)
/// dan batch multi-statement yang all-or-nothing. WalletLedger dan
/// OrderWorkflow tidak boleh mengandalkan kemampuan lain dari store.
pub struct Repository {
    pool: SqlitePool,
    user_repo: Arc<user::UserRepository>,
    wallet_repo: Arc<wallet::WalletRepository>,
    order_repo: Arc<order::OrderRepository>,
    catalog_repo: Arc<catalog::CatalogRepository>,
}

impl Repository {
    /// Create new repository instance
    pub fn new(pool: SqlitePool) -> Self {
        let user_repo = Arc::new(user::UserRepository::new(pool.clone()));
        let wallet_repo = Arc::new(wallet::WalletRepository::new(pool.clone()));
        let order_repo = Arc::new(order::OrderRepository::new(pool.clone()));
        let catalog_repo = Arc::new(catalog::CatalogRepository::new(pool.clone()));

        Self {
            pool,
            user_repo,
            wallet_repo,
            order_repo,
            catalog_repo,
        }
    }

    /// Connect ke database SQLite, membuat file kalau belum ada
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Self::new(pool))
    }

    /// Run database migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration 001 gagal: {}", e)))?;

        Ok(())
    }

    /// Get user repository
    pub fn user(&self) -> &user::UserRepository {
        &self.user_repo
    }

    /// Get wallet repository
    pub fn wallet(&self) -> &wallet::WalletRepository {
        &self.wallet_repo
    }

    /// Get order repository
    pub fn order(&self) -> &order::OrderRepository {
        &self.order_repo
    }

    /// Get catalog repository
    pub fn catalog(&self) -> &catalog::CatalogRepository {
        &self.catalog_repo
    }

    /// Expose pool untuk health check
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Repository;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Repository di atas database SQLite sekali-pakai.
    /// TempDir harus tetap hidup selama test berjalan.
    pub async fn test_repository() -> (Arc<Repository>, TempDir) {
        let dir = TempDir::new().expect("gagal membuat temp dir");
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}", db_path.display());

        let repository = Repository::connect(&url)
            .await
            .expect("gagal connect test database");
        repository
            .migrate()
            .await
            .expect("gagal migrate test database");

        (Arc::new(repository), dir)
    }
}
