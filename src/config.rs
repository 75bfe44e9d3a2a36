use crate::error::{env_error, AppResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;

/// Default port for the HTTP trigger endpoint
pub const DEFAULT_PORT: u16 = 3000;

/// Default advance notice before an event starts, in minutes
pub const DEFAULT_LEAD_MINUTES: i64 = 15;

/// Default fixed UTC offset of the event store's wall clock, in hours
pub const DEFAULT_UTC_OFFSET_HOURS: i64 = 9;

/// Main configuration structure for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// MySQL host
    pub db_host: String,
    /// MySQL database name
    pub db_database: String,
    /// MySQL username
    pub db_username: String,
    /// MySQL password
    pub db_password: String,
    /// MySQL port
    pub db_port: u16,
    /// Port the trigger endpoint listens on
    pub port: u16,
    /// Minutes of advance notice before event start
    pub lead_minutes: i64,
    /// Fixed UTC offset of stored event timestamps
    pub utc_offset_hours: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required database connection parameters
        let db_host = env::var("DB_HOST").map_err(|_| env_error("DB_HOST"))?;
        let db_database = env::var("DB_DATABASE").map_err(|_| env_error("DB_DATABASE"))?;
        let db_username = env::var("DB_USERNAME").map_err(|_| env_error("DB_USERNAME"))?;
        let db_password = env::var("DB_PASSWORD").map_err(|_| env_error("DB_PASSWORD"))?;

        let db_port = env::var("DB_PORT")
            .map_err(|_| env_error("DB_PORT"))?
            .parse::<u16>()
            .map_err(|_| env_error("Invalid DB_PORT format"))?;

        // Optional overrides with sensible defaults
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| env_error("Invalid PORT format"))?,
            Err(_) => DEFAULT_PORT,
        };

        let lead_minutes = match env::var("NOTIFY_LEAD_MINUTES") {
            Ok(value) => value
                .parse::<i64>()
                .map_err(|_| env_error("Invalid NOTIFY_LEAD_MINUTES format"))?,
            Err(_) => DEFAULT_LEAD_MINUTES,
        };

        let utc_offset_hours = match env::var("UTC_OFFSET_HOURS") {
            Ok(value) => value
                .parse::<i64>()
                .map_err(|_| env_error("Invalid UTC_OFFSET_HOURS format"))?,
            Err(_) => DEFAULT_UTC_OFFSET_HOURS,
        };

        Ok(Config {
            db_host,
            db_database,
            db_username,
            db_password,
            db_port,
            port,
            lead_minutes,
            utc_offset_hours,
        })
    }

    /// Connection URL for the MySQL pool
    pub fn database_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.db_username, self.db_password, self.db_host, self.db_port, self.db_database
        )
    }
}
