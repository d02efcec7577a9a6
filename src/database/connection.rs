use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use tracing::info;

use crate::database::models::LunchSlot;
use crate::database::schema;

#[derive(Clone)]
pub struct DatabaseManager {
    pub pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            info!("Creating database {}", database_url);
            Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePool::connect(database_url).await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Applying database schema");
        schema::apply(&self.pool).await
    }

    /// Inserts a demo lunch week for `group` when the schedule table is
    /// empty. Returns whether anything was inserted.
    pub async fn seed_demo_lunch(&self, group: &str) -> Result<bool> {
        let seeded = LunchSlot::seed_demo_week(&self.pool, group).await?;
        if seeded {
            info!("Seeded demo lunch schedule for group {}", group);
        }
        Ok(seeded)
    }
}
