mod bitcoin_rpc;
mod client;
mod config;
mod observer_service;
mod reconcile;
mod retry;
mod reward_service;
mod rewarder;
mod watcher;

#[cfg(test)]
mod test_utils;

use bitcoin_rpc::BitcoinRpc;
use btc_staking_store::StakeStore;
use observer_service::ObserverService;
use reward_service::RewardService;
use std::error::Error;
use tokio::{signal, task};
use tracing::{info, warn};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = config::Config::load("App.toml")?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &config.rust_log);
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                format!("btc_staking_polling_service={}", &config.polling_service_log)
                    .parse()
                    .expect("Error parsing directive"),
            ),
        )
        .with_span_events(FmtSpan::FULL)
        .init();

    let store = StakeStore::connect(&config.store).await?;
    let client = reqwest::Client::builder().build()?;
    let retry = config.retry_policy();
    let polling_sleep = config.polling_sleep();

    let watcher = task::spawn(watcher::run(
        store.clone(),
        ObserverService::new(client.clone(), config.observer_node.to_owned()),
        retry,
        polling_sleep,
    ));
    let reconciler = task::spawn(reconcile::run(
        store.clone(),
        BitcoinRpc::new(
            client.clone(),
            config.bitcoin_rpc_url.to_owned(),
            config.bitcoin_rpc_user.to_owned(),
            config.bitcoin_rpc_password.to_owned(),
        ),
        config.required_confirmations(),
        config.batch_size(),
        polling_sleep,
    ));
    let rewarder = task::spawn(rewarder::run(
        store,
        RewardService::new(client, config.reward_service_node.to_owned()),
        retry,
        config.batch_size(),
        polling_sleep,
    ));

    signal::ctrl_c().await?;
    warn!("Shutdown requested");
    for handle in [watcher, reconciler, rewarder] {
        handle.abort();
    }
    info!("Polling service stopped");
    Ok(())
}
