//! Core domain types for approval scanning.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Raw event log entry as returned by `eth_getLogs`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLog {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    #[serde(rename = "blockNumber", default)]
    pub block_number: String,
    #[serde(rename = "logIndex", default)]
    pub log_index: String,
    #[serde(rename = "transactionHash", default)]
    pub transaction_hash: String,
}

/// The approval shape a log encodes. ERC-20 and ERC-721 share the
/// `Approval` event signature; the parser disambiguates by topic arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalKind {
    Erc20,
    Erc721Single,
    Erc721All,
    Erc1155All,
}

impl ApprovalKind {
    /// The token standard this approval belongs to.
    pub fn standard(&self) -> TokenStandard {
        match self {
            ApprovalKind::Erc20 => TokenStandard::Erc20,
            ApprovalKind::Erc721Single | ApprovalKind::Erc721All => TokenStandard::Erc721,
            ApprovalKind::Erc1155All => TokenStandard::Erc1155,
        }
    }

    /// Whether this is a blanket operator approval.
    pub fn is_for_all(&self) -> bool {
        matches!(self, ApprovalKind::Erc721All | ApprovalKind::Erc1155All)
    }
}

/// Detected token standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenStandard {
    Erc20,
    Erc721,
    Erc1155,
}

/// A decoded approval event.
///
/// Invariants: `Erc20` carries `value` and no `token_id`; `Erc721Single`
/// carries `token_id` and no `value`; the `*All` kinds carry only the
/// `approved` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedApproval {
    pub token_address: String,
    pub owner: String,
    pub spender: String,
    pub kind: ApprovalKind,
    pub value: Option<U256>,
    pub token_id: Option<U256>,
    pub approved: bool,
    pub block_number: u64,
    pub log_index: u32,
    pub tx_hash: String,
}

impl ParsedApproval {
    /// The state key this event writes to. `token_id` participates only
    /// for single-token ERC-721 approvals.
    pub fn key(&self) -> ApprovalKey {
        ApprovalKey {
            token: self.token_address.clone(),
            spender: self.spender.clone(),
            token_id: match self.kind {
                ApprovalKind::Erc721Single => self.token_id,
                _ => None,
            },
        }
    }
}

/// Composite key the reconstructed approval state is indexed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApprovalKey {
    pub token: String,
    pub spender: String,
    pub token_id: Option<U256>,
}

/// Raw token metadata from the gateway's metadata probes.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: u8,
}

impl TokenInfo {
    pub const DEFAULT_DECIMALS: u8 = 18;
}

impl Default for TokenInfo {
    fn default() -> Self {
        Self {
            symbol: None,
            name: None,
            decimals: Self::DEFAULT_DECIMALS,
        }
    }
}

/// Enriched token metadata attached to a verified approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMeta {
    pub address: String,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: u8,
    #[serde(rename = "type")]
    pub standard: TokenStandard,
}

/// Spender classification attached to a verified approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpenderMeta {
    pub address: String,
    pub is_contract: bool,
    pub name: Option<String>,
    pub verified: bool,
    #[serde(skip)]
    pub source_available: bool,
}

/// An approval that survived live on-chain verification.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveApproval {
    pub token: TokenMeta,
    pub spender: SpenderMeta,
    #[serde(rename = "approval_type")]
    pub kind: ApprovalKind,
    /// Display form: "Unlimited", "All Tokens", or a scaled amount.
    pub allowance: String,
    /// Decimal string of the raw on-chain allowance.
    pub allowance_raw: String,
    pub is_unlimited: bool,
    pub block_number: u64,
    /// Origin block timestamp; 0 when only the block-count estimate was available.
    #[serde(skip)]
    pub timestamp: u64,
    pub age_days: u64,
    pub tx_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ApprovalKind::Erc20).unwrap(),
            "\"ERC20\""
        );
        assert_eq!(
            serde_json::to_string(&ApprovalKind::Erc721Single).unwrap(),
            "\"ERC721_SINGLE\""
        );
        assert_eq!(
            serde_json::to_string(&ApprovalKind::Erc1155All).unwrap(),
            "\"ERC1155_ALL\""
        );
    }

    #[test]
    fn test_kind_standard_mapping() {
        assert_eq!(ApprovalKind::Erc20.standard(), TokenStandard::Erc20);
        assert_eq!(ApprovalKind::Erc721All.standard(), TokenStandard::Erc721);
        assert_eq!(ApprovalKind::Erc1155All.standard(), TokenStandard::Erc1155);
        assert!(ApprovalKind::Erc721All.is_for_all());
        assert!(!ApprovalKind::Erc20.is_for_all());
    }

    #[test]
    fn test_key_ignores_token_id_for_erc20() {
        let approval = ParsedApproval {
            token_address: "0xaaa".to_string(),
            owner: "0xbbb".to_string(),
            spender: "0xccc".to_string(),
            kind: ApprovalKind::Erc20,
            value: Some(U256::from(1u64)),
            token_id: Some(U256::from(7u64)),
            approved: true,
            block_number: 1,
            log_index: 0,
            tx_hash: "0xdd".to_string(),
        };
        assert_eq!(approval.key().token_id, None);
    }

    #[test]
    fn test_raw_log_wire_shape() {
        let log: RawLog = serde_json::from_str(
            r#"{
                "address": "0xToken",
                "topics": ["0xabc"],
                "data": "0x",
                "blockNumber": "0x112a880",
                "logIndex": "0x1f",
                "transactionHash": "0xfeed"
            }"#,
        )
        .unwrap();
        assert_eq!(log.block_number, "0x112a880");
        assert_eq!(log.log_index, "0x1f");
        assert_eq!(log.transaction_hash, "0xfeed");
    }
}
