//! Configuration management for the RevokeScan service.

use serde::Deserialize;
use std::env;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rpc: RpcConfig,
    pub api: ApiConfig,
    /// Optional Etherscan API key; enables contract-verification lookups.
    pub etherscan_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub eth_rpc_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Frontend origins allowed by CORS; empty means permissive.
    pub frontend_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            rpc: RpcConfig {
                eth_rpc_url: env::var("ETH_RPC_URL")
                    .unwrap_or_else(|_| "https://eth.llamarpc.com".to_string()),
            },
            api: ApiConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8000),
                frontend_origins: env::var("FRONTEND_ORIGINS")
                    .map(|v| {
                        v.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            etherscan_api_key: env::var("ETHERSCAN_API_KEY").ok(),
        }
    }

    /// Configuration for testing (no network, no explorer key).
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            rpc: RpcConfig {
                eth_rpc_url: "http://127.0.0.1:8545".to_string(),
            },
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                frontend_origins: Vec::new(),
            },
            etherscan_api_key: None,
        }
    }
}
