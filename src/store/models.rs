use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A calendar event row as stored by the external scheduling product.
/// Timestamps are zone-less wall-clock values in the store's fixed zone.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRow {
    pub summary: String,
    pub link: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}
