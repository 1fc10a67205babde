//! Block-explorer contract-source lookups.

use std::time::Duration;

use anyhow::{Context, Result};

const ETHERSCAN_API_URL: &str = "https://api.etherscan.io/api";

/// Timeout for explorer lookups; these are enrichment only and must not
/// stall a scan.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimal Etherscan client for the `getsourcecode` endpoint.
pub struct EtherscanClient {
    api_key: String,
    http_client: reqwest::Client,
}

impl EtherscanClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http_client: reqwest::Client::builder()
                .timeout(LOOKUP_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// The verified contract name for an address, or `None` when the
    /// source is not verified. Explorer errors (rate limits, malformed
    /// payloads) surface as `Err` and callers fall through.
    pub async fn contract_name(&self, address: &str) -> Result<Option<String>> {
        let response: serde_json::Value = self
            .http_client
            .get(ETHERSCAN_API_URL)
            .query(&[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", address),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("explorer request failed")?
            .json()
            .await
            .context("explorer response was not JSON")?;

        if response.get("status").and_then(|s| s.as_str()) != Some("1") {
            // Unverified addresses and rate limits both land here; the
            // result field carries a message string instead of an array
            return Ok(None);
        }

        let name = response
            .get("result")
            .and_then(|r| r.as_array())
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.get("ContractName"))
            .and_then(|n| n.as_str())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(name)
    }
}
