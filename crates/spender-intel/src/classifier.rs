//! Spender classification against a static protocol directory, with an
//! optional block-explorer verification fallback.

use tracing::debug;

use approval_core::chain::address;
use approval_core::types::SpenderMeta;

use crate::etherscan::EtherscanClient;

/// Well-known protocol contracts. Hits are verified without touching the
/// network.
const KNOWN_SPENDERS: &[(&str, &str)] = &[
    // Uniswap
    (
        "0x68b3465833fb72a70ecdf485e0e4c7bd8665fc45",
        "Uniswap: Universal Router",
    ),
    (
        "0xef1c6e67703c7bd7107eed8303fbe6ec2554bf6b",
        "Uniswap: Universal Router 2",
    ),
    (
        "0x3fc91a3afd70395cd496c647d5a6cc9d4b2b7fad",
        "Uniswap: Universal Router 3",
    ),
    (
        "0x7a250d5630b4cf539739df2c5dacb4c659f2488d",
        "Uniswap V2: Router 2",
    ),
    (
        "0xe592427a0aece92de3edee1f18e0157c05861564",
        "Uniswap V3: Router",
    ),
    (
        "0x000000000022d473030f116ddee9f6b43ac78ba3",
        "Uniswap: Permit2",
    ),
    // OpenSea
    (
        "0x1e0049783f008a0085193e00003d00cd54003c71",
        "OpenSea: Seaport 1.4",
    ),
    (
        "0x00000000000001ad428e4906ae43d8f9852d0dd6",
        "OpenSea: Seaport 1.5",
    ),
    (
        "0x00000000000000adc04c56bf30ac9d3c0aaf14dc",
        "OpenSea: Seaport 1.6",
    ),
    // Blur
    (
        "0x000000000000ad05ccc4f10045630fb830b95127",
        "Blur: Marketplace",
    ),
    (
        "0x29469395eaf6f95920e59f858042f0e28d98a20b",
        "Blur: Blend",
    ),
    // 1inch
    (
        "0x1111111254eeb25477b68fb85ed929f73a960582",
        "1inch: Aggregation Router V5",
    ),
    (
        "0x111111125421ca6dc452d289314280a0f8842a65",
        "1inch: Aggregation Router V6",
    ),
    // Aave
    (
        "0x7fc66500c84a76ad7e9c93437bfc5ac33e2ddae9",
        "Aave: AAVE Token",
    ),
    (
        "0x87870bca3f3fd6335c3f4ce8392d69350b4fa4e2",
        "Aave: Pool V3",
    ),
    // Compound
    (
        "0xc00e94cb662c3520282e6f5717214004a7f26888",
        "Compound: COMP Token",
    ),
];

/// Classifies spender addresses. The known-protocol directory is
/// immutable; explorer lookups are attempted only when a key is
/// configured, and their failures fall through to an unverified result.
pub struct SpenderClassifier {
    etherscan: Option<EtherscanClient>,
}

impl SpenderClassifier {
    /// Create a classifier; an Etherscan API key enables verification
    /// lookups for addresses outside the known directory.
    pub fn new(etherscan_api_key: Option<String>) -> Self {
        Self {
            etherscan: etherscan_api_key.map(EtherscanClient::new),
        }
    }

    /// Classify a spender. `is_contract` comes from the caller's
    /// `eth_getCode` probe and is authoritative for the EOA/contract
    /// distinction.
    pub async fn classify(&self, spender: &str, is_contract: bool) -> SpenderMeta {
        let canonical = address::normalize(spender);

        if let Some(name) = known_protocol_name(&canonical) {
            return SpenderMeta {
                address: canonical,
                is_contract: true,
                name: Some(name.to_string()),
                verified: true,
                source_available: true,
            };
        }

        if is_contract {
            if let Some(client) = &self.etherscan {
                match client.contract_name(&canonical).await {
                    Ok(Some(name)) => {
                        return SpenderMeta {
                            address: canonical,
                            is_contract: true,
                            name: Some(name),
                            verified: true,
                            source_available: true,
                        };
                    }
                    Ok(None) => {}
                    Err(e) => {
                        debug!(spender = %canonical, error = %e, "Explorer lookup failed");
                    }
                }
            }
        }

        SpenderMeta {
            address: canonical,
            is_contract,
            name: None,
            verified: false,
            source_available: false,
        }
    }

    /// Whether an address belongs to a known protocol.
    pub fn is_known_protocol(&self, spender: &str) -> bool {
        known_protocol_name(&address::normalize(spender)).is_some()
    }
}

fn known_protocol_name(canonical: &str) -> Option<&'static str> {
    KNOWN_SPENDERS
        .iter()
        .find(|(addr, _)| *addr == canonical)
        .map(|(_, name)| *name)
}
