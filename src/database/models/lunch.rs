use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LunchSlot {
    pub id: i64,
    pub group_name: String,
    /// Stored as zero-padded YYYY-MM-DD text, so the range queries below
    /// compare chronologically.
    pub schedule_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub note: String,
}

impl LunchSlot {
    /// Inserts one slot and returns it with its generated id.
    pub async fn create(
        pool: &sqlx::SqlitePool,
        group_name: &str,
        schedule_date: NaiveDate,
        start_time: &str,
        end_time: &str,
        note: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let note = note.unwrap_or("").to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO lunch_schedule (group_name, schedule_date, start_time, end_time, note)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(group_name)
        .bind(schedule_date)
        .bind(start_time)
        .bind(end_time)
        .bind(&note)
        .execute(pool)
        .await?;

        Ok(LunchSlot {
            id: result.last_insert_rowid(),
            group_name: group_name.to_string(),
            schedule_date,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            note,
        })
    }

    /// All slots for a group, optionally bounded by an inclusive date
    /// range, ordered by date then start time.
    pub async fn schedule(
        pool: &sqlx::SqlitePool,
        group_name: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut sql = String::from(
            "SELECT id, group_name, schedule_date, start_time, end_time, COALESCE(note, '') AS note \
             FROM lunch_schedule WHERE group_name = ?",
        );
        if from_date.is_some() {
            sql.push_str(" AND schedule_date >= ?");
        }
        if to_date.is_some() {
            sql.push_str(" AND schedule_date <= ?");
        }
        sql.push_str(" ORDER BY schedule_date, start_time");

        let mut query = sqlx::query_as::<_, LunchSlot>(&sql).bind(group_name);
        if let Some(from) = from_date {
            query = query.bind(from);
        }
        if let Some(to) = to_date {
            query = query.bind(to);
        }

        query.fetch_all(pool).await
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM lunch_schedule")
            .fetch_one(pool)
            .await
    }

    /// Seeds five demo slots (one per day starting today, 12:00-12:30) for
    /// `group_name`, only when the schedule table is empty. Returns whether
    /// anything was inserted.
    pub async fn seed_demo_week(
        pool: &sqlx::SqlitePool,
        group_name: &str,
    ) -> Result<bool, sqlx::Error> {
        if Self::count(pool).await? > 0 {
            return Ok(false);
        }

        let today = Utc::now().date_naive();
        for offset in 0..5i64 {
            let date = today + Duration::days(offset);
            sqlx::query(
                r#"
                INSERT INTO lunch_schedule (group_name, schedule_date, start_time, end_time, note)
                VALUES (?, ?, '12:00', '12:30', '')
                "#,
            )
            .bind(group_name)
            .bind(date)
            .execute(pool)
            .await?;
        }

        Ok(true)
    }
}
