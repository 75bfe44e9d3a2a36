use super::models::EventRow;
use super::EventStore;
use crate::error::{AppResult, Error};
use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

/// MySQL-backed store over the shared scheduling database
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Connect a pool for the given connection URL
    pub async fn connect(url: &str) -> AppResult<Self> {
        let pool = MySqlPoolOptions::new().max_connections(5).connect(url).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[allow(dead_code)]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for MySqlStore {
    async fn any_event_starting_at(&self, target: &str) -> AppResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE start_time = ?")
            .bind(target)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn users_with_event_at(&self, target: &str) -> AppResult<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT slack_user_id FROM events WHERE start_time = ?")
                .bind(target)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }

    async fn bot_token_for_user(&self, user_id: &str) -> AppResult<String> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT s.bot_token FROM users u \
             JOIN slacks s ON s.team_id = u.slack_team_id \
             WHERE u.slack_user_id = ? LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|(bot_token,)| bot_token).ok_or_else(|| Error::MissingRow {
            table: "slacks",
            user: user_id.to_string(),
        })
    }

    async fn event_for_user_at(&self, user_id: &str, target: &str) -> AppResult<EventRow> {
        let row: Option<EventRow> = sqlx::query_as(
            "SELECT summary, link, start_time, end_time FROM events \
             WHERE slack_user_id = ? AND start_time = ? LIMIT 1",
        )
        .bind(user_id)
        .bind(target)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::MissingRow {
            table: "events",
            user: user_id.to_string(),
        })
    }

    async fn channel_for_user(&self, user_id: &str) -> AppResult<String> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT slack_channel FROM webhooks WHERE slack_user_id = ? LIMIT 1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|(channel,)| channel).ok_or_else(|| Error::MissingRow {
            table: "webhooks",
            user: user_id.to_string(),
        })
    }
}
