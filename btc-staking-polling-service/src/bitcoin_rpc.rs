use crate::client::{ClientError, ConfirmationSource};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// bitcoind answers `getrawtransaction` for unknown txids with this code.
const RPC_INVALID_ADDRESS_OR_KEY: i64 = -5;

/// Bitcoin Core JSON-RPC client, used for confirmation depth only.
pub struct BitcoinRpc {
    client: reqwest::Client,
    url: String,
    user: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<RawTransaction>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawTransaction {
    // absent while the transaction is in the mempool
    confirmations: Option<u64>,
}

impl BitcoinRpc {
    pub fn new(
        client: reqwest::Client,
        url: String,
        user: Option<String>,
        password: Option<String>,
    ) -> Self {
        BitcoinRpc {
            client,
            url,
            user,
            password,
        }
    }
}

#[async_trait]
impl ConfirmationSource for BitcoinRpc {
    async fn confirmations(&self, tx: &str) -> Result<Option<u64>, ClientError> {
        let body = json!({
            "jsonrpc": "1.0",
            "id": "btc-staking",
            "method": "getrawtransaction",
            "params": [tx, true],
        });
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(ref user) = self.user {
            request = request.basic_auth(user, self.password.as_ref());
        }
        // bitcoind reports rpc errors with a 500 status and a json body
        let response = request.send().await?.json::<RpcResponse>().await?;
        debug!("getrawtransaction {}: {:?}", tx, response);
        confirmations_from_response(response)
    }
}

fn confirmations_from_response(response: RpcResponse) -> Result<Option<u64>, ClientError> {
    match (response.result, response.error) {
        (_, Some(error)) if error.code == RPC_INVALID_ADDRESS_OR_KEY => Ok(None),
        (_, Some(error)) => Err(ClientError::Rpc {
            code: error.code,
            message: error.message,
        }),
        (Some(transaction), None) => Ok(Some(transaction.confirmations.unwrap_or(0))),
        (None, None) => Err(ClientError::BadResponse(
            "getrawtransaction returned neither result nor error".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<Option<u64>, ClientError> {
        confirmations_from_response(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn test_confirmed_transaction() {
        let body = r#"{"result":{"txid":"txid1","confirmations":7,"blocktime":1700000000},"error":null,"id":"btc-staking"}"#;
        assert_eq!(parse(body).unwrap(), Some(7));
    }

    #[test]
    fn test_mempool_transaction() {
        let body = r#"{"result":{"txid":"txid1"},"error":null,"id":"btc-staking"}"#;
        assert_eq!(parse(body).unwrap(), Some(0));
    }

    #[test]
    fn test_unknown_transaction() {
        let body = r#"{"result":null,"error":{"code":-5,"message":"No such mempool or blockchain transaction."},"id":"btc-staking"}"#;
        assert_eq!(parse(body).unwrap(), None);
    }

    #[test]
    fn test_rpc_error() {
        let body = r#"{"result":null,"error":{"code":-28,"message":"Loading block index..."},"id":"btc-staking"}"#;
        assert!(matches!(parse(body), Err(ClientError::Rpc { code: -28, .. })));
    }
}
