pub mod models;
pub mod mysql;

pub use models::EventRow;
pub use mysql::MySqlStore;

use crate::error::AppResult;
use async_trait::async_trait;

/// Read-only access to the scheduling tables owned by the external
/// calendar product. Every method takes the target minute as the
/// `YYYY-MM-DD HH:MM` string the rows are matched against.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Whether any event starts exactly at the target minute
    async fn any_event_starting_at(&self, target: &str) -> AppResult<bool>;

    /// Owners of every event starting at the target minute
    async fn users_with_event_at(&self, target: &str) -> AppResult<Vec<String>>;

    /// Workspace bot token for a user's team
    async fn bot_token_for_user(&self, user_id: &str) -> AppResult<String>;

    /// Display fields of the user's event starting at the target minute
    async fn event_for_user_at(&self, user_id: &str, target: &str) -> AppResult<EventRow>;

    /// Destination channel configured for a user
    async fn channel_for_user(&self, user_id: &str) -> AppResult<String>;
}
