use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::password::{hash_password, verify_password, Verification};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StudentAuth {
    pub user_id: i64,
    pub fio: String,
    pub group_name: String,
    pub password_hash: String,
}

/// Latest-known group membership, one row per user. Kept alongside the auth
/// row because registration writes both and identity migration moves both.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserGroup {
    pub user_id: i64,
    pub group_name: String,
}

impl StudentAuth {
    pub async fn is_registered(pool: &sqlx::SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM student_auth WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    /// Registers a student. Re-registration replaces the auth row wholesale;
    /// the group-membership row is upserted in the same transaction.
    pub async fn register(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        fio: &str,
        group_name: &str,
        password: &str,
    ) -> anyhow::Result<()> {
        let password_hash = hash_password(password)?;

        let mut tx = pool.begin().await?;
        sqlx::query(
            "INSERT OR REPLACE INTO student_auth (user_id, fio, group_name, password_hash) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(fio)
        .bind(group_name)
        .bind(&password_hash)
        .execute(&mut tx)
        .await?;

        sqlx::query("INSERT OR REPLACE INTO user_groups (user_id, group_name) VALUES (?, ?)")
            .bind(user_id)
            .bind(group_name)
            .execute(&mut tx)
            .await?;
        tx.commit().await?;

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
            "SELECT user_id, password_hash FROM student_auth WHERE fio = ?",
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

    /// Re-authenticates an already registered student by user id.
    pub async fn login_by_user_id(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        password: &str,
    ) -> anyhow::Result<bool> {
        let stored = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM student_auth WHERE user_id = ?",
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

    pub async fn find_by_user_id(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, StudentAuth>(
            "SELECT user_id, fio, group_name, password_hash FROM student_auth WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Repoints a student's stored identity to a new user id (re-login from
    /// a different Telegram account). Moves the auth row and the
    /// group-membership row together.
    pub async fn migrate_identity(
        pool: &sqlx::SqlitePool,
        old_user_id: i64,
        new_user_id: i64,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("UPDATE student_auth SET user_id = ? WHERE user_id = ?")
            .bind(new_user_id)
            .bind(old_user_id)
            .execute(&mut tx)
            .await?;

        sqlx::query("UPDATE user_groups SET user_id = ? WHERE user_id = ?")
            .bind(new_user_id)
            .bind(old_user_id)
            .execute(&mut tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }
}

impl UserGroup {
    pub async fn get(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT group_name FROM user_groups WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Upserts the user's group; the previous membership is overwritten.
    pub async fn set(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        group_name: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT OR REPLACE INTO user_groups (user_id, group_name) VALUES (?, ?)")
            .bind(user_id)
            .bind(group_name)
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
    sqlx::query("UPDATE student_auth SET password_hash = ? WHERE user_id = ?")
        .bind(&fresh)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
