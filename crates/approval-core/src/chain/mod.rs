//! Chain access: JSON-RPC gateway, ABI codec, event-log parsing, and
//! approval-state reconstruction.

pub mod abi;
pub mod address;
pub mod logs;
pub mod rpc;
pub mod state;

/// keccak256("Approval(address,address,uint256)"), shared by ERC-20 and ERC-721.
pub const APPROVAL_TOPIC: &str =
    "0x8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925";

/// keccak256("ApprovalForAll(address,address,bool)") for ERC-721 and ERC-1155.
pub const APPROVAL_FOR_ALL_TOPIC: &str =
    "0x17307eab39ab6107e8899845ad3d59bd9653f200f220920489ca2b5937696c31";

/// Historical scan window in blocks: logs are fetched from
/// `max(0, head - SCAN_BLOCK_WINDOW)` to latest.
pub const SCAN_BLOCK_WINDOW: u64 = 5_000_000;

/// Post-Merge mainnet block time, used to estimate approval age when the
/// origin block's timestamp cannot be fetched.
pub const SECONDS_PER_BLOCK: u64 = 12;

/// Parse a `0x`-prefixed hex quantity, defaulting to 0 on malformed input.
pub fn parse_hex_u64(value: &str) -> u64 {
    u64::from_str_radix(value.trim_start_matches("0x"), 16).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_u64() {
        assert_eq!(parse_hex_u64("0x112a880"), 18_000_000);
        assert_eq!(parse_hex_u64("0x0"), 0);
        assert_eq!(parse_hex_u64(""), 0);
        assert_eq!(parse_hex_u64("0xzz"), 0);
    }
}
