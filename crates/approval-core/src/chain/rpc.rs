//! JSON-RPC gateway for Ethereum-compatible endpoints.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::U256;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::{abi, parse_hex_u64};
use crate::types::{RawLog, TokenInfo};
use crate::{Error, Result};

/// Per-call deadline for RPC requests.
const RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Log filter for `eth_getLogs`. Topics are positional; `None` matches
/// any value at that position.
#[derive(Debug, Clone)]
pub struct LogFilter {
    pub topics: Vec<Option<String>>,
    pub from_block: u64,
    /// `None` means "latest".
    pub to_block: Option<u64>,
}

/// Read-only chain access used by the scanner.
///
/// `RpcGateway` is the HTTP implementation; orchestrator tests
/// substitute in-memory fakes.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Current head block number.
    async fn head_block(&self) -> Result<u64>;

    /// Timestamp of a block; 0 when the block has no timestamp field.
    async fn block_timestamp(&self, block: u64) -> Result<u64>;

    /// Event logs matching a positional topic filter.
    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<RawLog>>;

    /// Live ERC-20 allowance; 0 on empty results.
    async fn get_allowance(&self, token: &str, owner: &str, spender: &str) -> Result<U256>;

    /// Live ERC-721/1155 blanket-operator flag.
    async fn is_approved_for_all(&self, token: &str, owner: &str, operator: &str) -> Result<bool>;

    /// Deployed bytecode; `"0x"` means the address is an EOA.
    async fn get_code(&self, address: &str) -> Result<String>;

    /// Token metadata. Each probe is independently fault-tolerant and
    /// silently yields the default on failure.
    async fn get_token_info(&self, token: &str) -> Result<TokenInfo>;
}

/// HTTP JSON-RPC client. The gateway never retries; retry policy, if
/// any, lives in the layers above it.
pub struct RpcGateway {
    rpc_url: String,
    http_client: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcGateway {
    /// Create a gateway for an RPC endpoint URL.
    pub fn new(rpc_url: String) -> Self {
        Self {
            rpc_url,
            http_client: reqwest::Client::builder()
                .timeout(RPC_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            next_id: AtomicU64::new(1),
        }
    }

    async fn rpc_call_raw<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response: JsonRpcResponse<T> = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(Error::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        Ok(response.result)
    }

    async fn rpc_call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        self.rpc_call_raw(method, params)
            .await?
            .ok_or_else(|| Error::Decode(format!("{method}: empty result")))
    }

    /// `eth_call` against a contract at the latest block, returning the
    /// raw hex result.
    async fn eth_call(&self, to: &str, data: &str) -> Result<String> {
        self.rpc_call(
            "eth_call",
            serde_json::json!([{ "to": to, "data": data }, "latest"]),
        )
        .await
    }
}

#[async_trait]
impl ChainRpc for RpcGateway {
    async fn head_block(&self) -> Result<u64> {
        let block_hex: String = self.rpc_call("eth_blockNumber", serde_json::json!([])).await?;
        Ok(parse_hex_u64(&block_hex))
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64> {
        let result: Option<serde_json::Value> = self
            .rpc_call_raw(
                "eth_getBlockByNumber",
                serde_json::json!([format!("0x{block:x}"), false]),
            )
            .await?;

        Ok(result
            .as_ref()
            .and_then(|b| b.get("timestamp"))
            .and_then(|t| t.as_str())
            .map(parse_hex_u64)
            .unwrap_or(0))
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<RawLog>> {
        let to_block = filter
            .to_block
            .map(|b| format!("0x{b:x}"))
            .unwrap_or_else(|| "latest".to_string());
        let params = serde_json::json!([{
            "topics": filter.topics,
            "fromBlock": format!("0x{:x}", filter.from_block),
            "toBlock": to_block,
        }]);

        self.rpc_call("eth_getLogs", params).await
    }

    async fn get_allowance(&self, token: &str, owner: &str, spender: &str) -> Result<U256> {
        let data = abi::encode_call(abi::ALLOWANCE_SELECTOR, &[owner, spender]);
        let result = self.eth_call(token, &data).await?;
        Ok(abi::decode_u256(&result))
    }

    async fn is_approved_for_all(&self, token: &str, owner: &str, operator: &str) -> Result<bool> {
        let data = abi::encode_call(abi::IS_APPROVED_FOR_ALL_SELECTOR, &[owner, operator]);
        let result = self.eth_call(token, &data).await?;
        Ok(abi::decode_bool(&result))
    }

    async fn get_code(&self, address: &str) -> Result<String> {
        self.rpc_call("eth_getCode", serde_json::json!([address, "latest"]))
            .await
    }

    async fn get_token_info(&self, token: &str) -> Result<TokenInfo> {
        let symbol = match self.eth_call(token, abi::SYMBOL_SELECTOR).await {
            Ok(result) => abi::decode_string(&result),
            Err(e) => {
                debug!(token = %token, error = %e, "symbol() probe failed");
                None
            }
        };

        let name = match self.eth_call(token, abi::NAME_SELECTOR).await {
            Ok(result) => abi::decode_string(&result),
            Err(e) => {
                debug!(token = %token, error = %e, "name() probe failed");
                None
            }
        };

        let decimals = match self.eth_call(token, abi::DECIMALS_SELECTOR).await {
            Ok(result) if !result.trim_start_matches("0x").is_empty() => {
                u8::try_from(abi::decode_u256(&result)).unwrap_or(TokenInfo::DEFAULT_DECIMALS)
            }
            Ok(_) => TokenInfo::DEFAULT_DECIMALS,
            Err(e) => {
                debug!(token = %token, error = %e, "decimals() probe failed");
                TokenInfo::DEFAULT_DECIMALS
            }
        };

        Ok(TokenInfo {
            symbol,
            name,
            decimals,
        })
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}
