use crate::retry::RetryPolicy;
use btc_staking_store::StoreConfig;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub store: StoreConfig,
    pub rust_log: String,
    pub polling_service_log: String,
    pub observer_node: String,
    pub bitcoin_rpc_url: String,
    pub bitcoin_rpc_user: Option<String>,
    pub bitcoin_rpc_password: Option<String>,
    pub reward_service_node: String,
    pub required_confirmations: Option<u64>,
    pub polling_batch_size: Option<i64>,
    pub polling_sleep_secs: Option<u64>,
    pub store_retry_attempts: Option<u32>,
    pub store_retry_base_millis: Option<u64>,
}

impl Config {
    pub fn load(path: &str) -> Result<Config, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("STAKING_"))
            .extract()
    }

    pub fn required_confirmations(&self) -> u64 {
        self.required_confirmations.unwrap_or(6)
    }

    pub fn batch_size(&self) -> i64 {
        self.polling_batch_size.unwrap_or(100)
    }

    pub fn polling_sleep(&self) -> Duration {
        Duration::from_secs(self.polling_sleep_secs.unwrap_or(10))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.store_retry_attempts.unwrap_or(5),
            base_delay: Duration::from_millis(self.store_retry_base_millis.unwrap_or(100)),
        }
    }
}
