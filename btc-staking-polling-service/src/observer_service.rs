use crate::client::{ClientError, ObservedStake, StakeObserver};
use async_trait::async_trait;
use tracing::info;

/// Polls the chain observer node for staking transactions it has seen.
pub struct ObserverService {
    client: reqwest::Client,
    node: String,
}

impl ObserverService {
    pub fn new(client: reqwest::Client, node: String) -> Self {
        ObserverService { client, node }
    }
}

#[async_trait]
impl StakeObserver for ObserverService {
    async fn observed_stakes(&self) -> Result<Vec<ObservedStake>, ClientError> {
        let url = self.node.to_owned() + "/observed_stakes";
        info!("observer url: {:?}", url);
        let stakes = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<ObservedStake>>()
            .await?;
        Ok(stakes)
    }
}
