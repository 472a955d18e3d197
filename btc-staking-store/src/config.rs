use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the stake database, shared by every binary.
#[derive(Clone, Debug, Deserialize)]
pub struct StoreConfig {
    pub database_url: String,
    pub sqlx_max_connections: u32,
    pub sqlx_min_connections: Option<u32>,
    pub sqlx_connect_timeout: Option<u64>,
    pub sqlx_acquire_timeout: Option<u64>,
    pub sqlx_idle_timeout: Option<u64>,
    pub sqlx_max_lifetime: Option<u64>,
    pub sqlx_logging: Option<bool>,
    pub sqlx_logging_level: Option<String>,
}

impl StoreConfig {
    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.database_url.to_owned());
        options
            .max_connections(self.sqlx_max_connections)
            .min_connections(self.sqlx_min_connections.unwrap_or(2))
            .connect_timeout(Duration::from_secs(self.sqlx_connect_timeout.unwrap_or(8)))
            .acquire_timeout(Duration::from_secs(self.sqlx_acquire_timeout.unwrap_or(8)))
            .idle_timeout(Duration::from_secs(self.sqlx_idle_timeout.unwrap_or(8)))
            .max_lifetime(Duration::from_secs(self.sqlx_max_lifetime.unwrap_or(8)))
            .sqlx_logging(self.sqlx_logging.unwrap_or(false))
            .sqlx_logging_level(
                match self
                    .sqlx_logging_level
                    .as_deref()
                    .map(str::parse::<log::LevelFilter>)
                {
                    Some(Ok(level)) => level,
                    _ => log::LevelFilter::Info,
                },
            );
        options
    }
}

pub async fn get_db_connection(config: &StoreConfig) -> Result<DatabaseConnection, DbErr> {
    Database::connect(config.connect_options()).await
}
