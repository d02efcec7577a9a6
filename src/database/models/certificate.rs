use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CertificateOrder {
    pub id: i64,
    pub user_id: i64,
    pub fio: String,
    pub group_name: String,
    pub created_at: String,
}

impl CertificateOrder {
    /// Appends one certificate order. The log is write-only at this layer;
    /// reporting tooling reads it out of band.
    pub async fn create(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        fio: &str,
        group_name: &str,
    ) -> Result<Self, sqlx::Error> {
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO certificate_orders (user_id, fio, group_name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(fio)
        .bind(group_name)
        .bind(&created_at)
        .execute(pool)
        .await?;

        Ok(CertificateOrder {
            id: result.last_insert_rowid(),
            user_id,
            fio: fio.to_string(),
            group_name: group_name.to_string(),
            created_at,
        })
    }
}
