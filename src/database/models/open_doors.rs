use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OpenDoorsRegistration {
    pub id: i64,
    pub user_id: i64,
    /// Index into the externally defined event list, not a foreign key.
    pub event_index: i64,
    pub fio: String,
    pub contact: String,
    pub created_at: String,
}

impl OpenDoorsRegistration {
    /// Whether the user already signed up for this event.
    pub async fn is_registered(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        event_index: i64,
    ) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM open_doors_registrations WHERE user_id = ? AND event_index = ?",
        )
        .bind(user_id)
        .bind(event_index)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    /// Appends one event registration. Contact is trimmed, stored empty
    /// when absent. event_index is accepted as-is.
    pub async fn create(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        event_index: i64,
        fio: &str,
        contact: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let contact = contact.unwrap_or("").trim().to_string();
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO open_doors_registrations (user_id, event_index, fio, contact, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(event_index)
        .bind(fio)
        .bind(&contact)
        .bind(&created_at)
        .execute(pool)
        .await?;

        Ok(OpenDoorsRegistration {
            id: result.last_insert_rowid(),
            user_id,
            event_index,
            fio: fio.to_string(),
            contact,
            created_at,
        })
    }
}
