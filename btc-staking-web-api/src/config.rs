use btc_staking_store::StoreConfig;
use rocket::serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StakeApiConfig {
    #[serde(flatten)]
    pub store: StoreConfig,
    pub rust_log: String,
    pub web_api_log: String,
    pub cors_allowed_domains: String,
}
