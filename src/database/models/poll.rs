use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::groups::{group_matches, parse_group_list};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Poll {
    pub id: i64,
    pub user_id: i64,
    #[sqlx(rename = "type")]
    pub poll_type: String,
    pub title: Option<String>,
    pub question: Option<String>,
    pub options: Option<String>,
    pub link_or_file_id: Option<String>,
    /// Free-text role tag ("student", "pedagog", ...); None targets everyone.
    pub target_audience: Option<String>,
    /// Comma-separated group allow-list; empty or None means all groups.
    pub target_groups: Option<String>,
    pub created_at: String,
}

const POLL_COLUMNS: &str = "id, user_id, type, title, question, options, link_or_file_id, target_audience, target_groups, created_at";

impl Poll {
    /// Appends a new poll. Polls are immutable once created.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        poll_type: &str,
        title: Option<&str>,
        question: Option<&str>,
        options: Option<&str>,
        link_or_file_id: Option<&str>,
        target_audience: Option<&str>,
        target_groups: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO polls (user_id, type, title, question, options, link_or_file_id, created_at, target_audience, target_groups)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(poll_type)
        .bind(title)
        .bind(question)
        .bind(options)
        .bind(link_or_file_id)
        .bind(&created_at)
        .bind(target_audience)
        .bind(target_groups)
        .execute(pool)
        .await?;

        Ok(Poll {
            id: result.last_insert_rowid(),
            user_id,
            poll_type: poll_type.to_string(),
            title: title.map(str::to_string),
            question: question.map(str::to_string),
            options: options.map(str::to_string),
            link_or_file_id: link_or_file_id.map(str::to_string),
            target_audience: target_audience.map(str::to_string),
            target_groups: target_groups.map(str::to_string),
            created_at,
        })
    }

    /// The 50 most recent polls across all audiences, newest first.
    pub async fn list_for_staff(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {POLL_COLUMNS} FROM polls ORDER BY created_at DESC, id DESC LIMIT 50"
        );
        sqlx::query_as::<_, Poll>(&sql).fetch_all(pool).await
    }

    /// Polls visible to a student: target_audience must be exactly
    /// "student", and the student's group must pass the poll's
    /// target-group allow-list (empty list targets every group).
    pub async fn list_for_student(
        pool: &sqlx::SqlitePool,
        user_group: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {POLL_COLUMNS} FROM polls WHERE COALESCE(target_audience, '') = 'student' ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, Poll>(&sql).fetch_all(pool).await?;

        Ok(rows
            .into_iter()
            .filter(|poll| group_matches(user_group, poll.target_groups.as_deref().unwrap_or("")))
            .collect())
    }

    /// User ids to notify about a new poll: members of the listed groups,
    /// or every user with any known group when no groups are listed.
    pub async fn recipients_for_notification(
        pool: &sqlx::SqlitePool,
        target_groups: Option<&str>,
    ) -> Result<Vec<i64>, sqlx::Error> {
        let groups = parse_group_list(target_groups.unwrap_or(""));

        if groups.is_empty() {
            return sqlx::query_scalar::<_, i64>("SELECT user_id FROM user_groups")
                .fetch_all(pool)
                .await;
        }

        let placeholders = groups.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!("SELECT user_id FROM user_groups WHERE group_name IN ({placeholders})");

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for group in &groups {
            query = query.bind(group.as_str());
        }

        query.fetch_all(pool).await
    }
}
