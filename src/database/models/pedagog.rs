use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::password::{hash_password, verify_password, Verification};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PedagogAuth {
    pub user_id: i64,
    pub fio: String,
    pub password_hash: String,
}

impl PedagogAuth {
    pub async fn is_registered(pool: &sqlx::SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pedagog_auth WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    /// Registers a pedagog. Re-registration replaces the row wholesale.
    pub async fn register(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        fio: &str,
        password: &str,
    ) -> anyhow::Result<()> {
        let password_hash = hash_password(password)?;

        sqlx::query(
            "INSERT OR REPLACE INTO pedagog_auth (user_id, fio, password_hash) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(fio)
        .bind(&password_hash)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Login by full name. Returns the matching user_id, or None.
    ///
    /// Full names are not unique; the first stored row that verifies wins.
    pub async fn login(
        pool: &sqlx::SqlitePool,
        fio: &str,
        password: &str,
    ) -> anyhow::Result<Option<i64>> {
        let candidates = sqlx::query_as::<_, (i64, String)>(
            "SELECT user_id, password_hash FROM pedagog_auth WHERE fio = ?",
        )
        .bind(fio)
        .fetch_all(pool)
        .await?;

        for (user_id, stored) in candidates {
            if let Verification::Valid { needs_rehash } = verify_password(password, &stored) {
                if needs_rehash {
                    upgrade_hash(pool, user_id, password).await?;
                }
                return Ok(Some(user_id));
            }
        }

        Ok(None)
    }

    /// Re-authenticates an already registered pedagog by user id.
    pub async fn login_by_user_id(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        password: &str,
    ) -> anyhow::Result<bool> {
        let stored = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM pedagog_auth WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        if let Some(stored) = stored {
            if let Verification::Valid { needs_rehash } = verify_password(password, &stored) {
                if needs_rehash {
                    upgrade_hash(pool, user_id, password).await?;
                }
                return Ok(true);
            }
        }

        Ok(false)
    }

    pub async fn fio(pool: &sqlx::SqlitePool, user_id: i64) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT fio FROM pedagog_auth WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Repoints a pedagog's stored identity to a new user id (re-login from
    /// a different Telegram account).
    pub async fn migrate_identity(
        pool: &sqlx::SqlitePool,
        old_user_id: i64,
        new_user_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE pedagog_auth SET user_id = ? WHERE user_id = ?")
            .bind(new_user_id)
            .bind(old_user_id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

async fn upgrade_hash(
    pool: &sqlx::SqlitePool,
    user_id: i64,
    password: &str,
) -> anyhow::Result<()> {
    let fresh = hash_password(password)?;
    sqlx::query("UPDATE pedagog_auth SET password_hash = ? WHERE user_id = ?")
        .bind(&fresh)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
