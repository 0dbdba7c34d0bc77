// /lf-gaming-store/services/store-api/src/repository/catalog.rs
// Katalog hanya dibaca oleh API ini; isinya dikelola tooling terpisah.

use sqlx::{Row, SqlitePool};

use crate::models::{Game, Package, Region};
use crate::utils::error::{AppError, AppResult};

/// Repository untuk katalog games, regions, dan packages
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Create new catalog repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Semua game di katalog
    pub async fn list_games(&self) -> AppResult<Vec<Game>> {
        let rows = sqlx::query(
            "SELECT id, name, image_url, category, regionable, uid_required FROM games ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| Game {
                id: r.get("id"),
                name: r.get("name"),
                image_url: r.get("image_url"),
                category: r.get("category"),
                regionable: r.get::<i64, _>("regionable") != 0,
                uid_required: r.get::<i64, _>("uid_required") != 0,
            })
            .collect())
    }

    /// Regions dari satu game
    pub async fn list_regions(&self, game_id: &str) -> AppResult<Vec<Region>> {
        let rows = sqlx::query(
            "SELECT game_id, region_key, name, flag FROM regions WHERE game_id = ? ORDER BY name",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| Region {
                game_id: r.get("game_id"),
                region_key: r.get("region_key"),
                name: r.get("name"),
                flag: r.get("flag"),
            })
            .collect())
    }

    /// Packages dari satu game. Tanpa region_key berarti game yang
    /// tidak regionable: match baris dengan region_key NULL atau kosong.
    pub async fn list_packages(
        &self,
        game_id: &str,
        region_key: Option<&str>,
    ) -> AppResult<Vec<Package>> {
        let rows = match region_key {
            Some(key) => {
                sqlx::query(
                    r#"
                    SELECT id, game_id, region_key, label, price_cents
                    FROM packages
                    WHERE game_id = ? AND region_key = ?
                    ORDER BY price_cents
                    "#,
                )
                .bind(game_id)
                .bind(key)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, game_id, region_key, label, price_cents
                    FROM packages
                    WHERE game_id = ? AND (region_key IS NULL OR region_key = '')
                    ORDER BY price_cents
                    "#,
                )
                .bind(game_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| Package {
                id: r.get("id"),
                game_id: r.get("game_id"),
                region_key: r.get("region_key"),
                label: r.get("label"),
                price_cents: r.get("price_cents"),
            })
            .collect())
    }
}
