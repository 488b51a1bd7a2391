//! HTTP client for the Aleo explorer API.

use std::time::Duration;

use shadow_types::ChainNetwork;
use tracing::trace;

use crate::{Block, ChainError, ChainSource};

pub const DEFAULT_CHAIN_API_URL: &str = "https://api.explorer.provable.com/v2";

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Explorer client.
///
/// - `GET {base}/{network}/block/height/latest` -> bare integer
/// - `GET {base}/{network}/block/{height}` -> block JSON
#[derive(Clone, Debug)]
pub struct ChainClient {
    http_client: reqwest::Client,
    base_url: String,
    network: ChainNetwork,
}

impl ChainClient {
    pub fn new(
        base_url: &str,
        network: ChainNetwork,
        timeout: Duration,
    ) -> Result<Self, ChainError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| ChainError::Client(e.to_string()))?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            network,
        })
    }

    pub fn head_url(&self) -> String {
        format!("{}/{}/block/height/latest", self.base_url, self.network)
    }

    pub fn block_url(&self, height: u64) -> String {
        format!("{}/{}/block/{}", self.base_url, self.network, height)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ChainError> {
        trace!(url, "chain API request");
        let response = self.http_client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ChainError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

/// The head endpoint returns a bare JSON number; some deployments quote it.
fn parse_height(value: &serde_json::Value) -> Result<u64, ChainError> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| ChainError::InvalidResponse(format!("unexpected chain height {value}")))
}

impl ChainSource for ChainClient {
    async fn current_head(&self) -> Result<u64, ChainError> {
        let value: serde_json::Value = self.get_json(&self.head_url()).await?;
        parse_height(&value)
    }

    async fn get_block(&self, height: u64) -> Result<Block, ChainError> {
        self.get_json(&self.block_url(height)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn urls() {
        let client = ChainClient::new(
            "https://api.example.com/v2/",
            ChainNetwork::Testnet,
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(
            client.head_url(),
            "https://api.example.com/v2/testnet/block/height/latest"
        );
        assert_eq!(
            client.block_url(42),
            "https://api.example.com/v2/testnet/block/42"
        );
    }

    #[test]
    fn height_forms() {
        assert_eq!(parse_height(&json!(1234)).unwrap(), 1234);
        assert_eq!(parse_height(&json!("1234")).unwrap(), 1234);
        assert!(parse_height(&json!(-1)).is_err());
        assert!(parse_height(&json!({"height": 1})).is_err());
    }
}
