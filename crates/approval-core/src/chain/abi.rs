//! Hand-rolled ABI encoding and decoding for the handful of view calls
//! and calldata shapes the scanner needs.

use alloy_primitives::U256;

/// ERC-20 `allowance(address,address)` selector.
pub const ALLOWANCE_SELECTOR: &str = "0xdd62ed3e";
/// ERC-20 `approve(address,uint256)` selector.
pub const APPROVE_SELECTOR: &str = "0x095ea7b3";
/// `isApprovedForAll(address,address)` selector (ERC-721 and ERC-1155).
pub const IS_APPROVED_FOR_ALL_SELECTOR: &str = "0xe985e9c5";
/// `setApprovalForAll(address,bool)` selector.
pub const SET_APPROVAL_FOR_ALL_SELECTOR: &str = "0xa22cb465";
/// ERC-20 `symbol()` selector.
pub const SYMBOL_SELECTOR: &str = "0x95d89b41";
/// ERC-20 `name()` selector.
pub const NAME_SELECTOR: &str = "0x06fdde03";
/// ERC-20 `decimals()` selector.
pub const DECIMALS_SELECTOR: &str = "0x313ce567";

/// Encode a call: selector followed by each argument left-padded to a
/// 32-byte word.
pub fn encode_call(selector: &str, args: &[&str]) -> String {
    let mut data = String::from(selector);
    for arg in args {
        let hex_part = arg.trim_start_matches("0x").to_ascii_lowercase();
        data.push_str(&format!("{:0>64}", hex_part));
    }
    data
}

/// Calldata for `approve(spender, 0)`, revoking an ERC-20 approval.
pub fn revoke_calldata(spender: &str) -> String {
    let mut data = encode_call(APPROVE_SELECTOR, &[spender]);
    data.push_str(&"0".repeat(64));
    data
}

/// Calldata for `setApprovalForAll(operator, false)`, revoking a
/// blanket operator approval.
pub fn revoke_all_calldata(operator: &str) -> String {
    let mut data = encode_call(SET_APPROVAL_FOR_ALL_SELECTOR, &[operator]);
    data.push_str(&"0".repeat(64));
    data
}

/// Decode a u256 return word. Empty or malformed results decode as zero.
pub fn decode_u256(result: &str) -> U256 {
    let hex_part = result.trim_start_matches("0x");
    if hex_part.is_empty() {
        return U256::ZERO;
    }
    U256::from_str_radix(hex_part, 16).unwrap_or(U256::ZERO)
}

/// Decode a bool return word (any non-zero word is true).
pub fn decode_bool(result: &str) -> bool {
    decode_u256(result) != U256::ZERO
}

/// Decode an ABI-encoded dynamic `string` return value.
///
/// Standard layout is an offset word, a length word, then UTF-8 bytes.
/// Some older tokens return a bare `bytes32` instead; the fallback
/// decodes the payload directly as UTF-8. Trailing NUL padding is
/// stripped either way.
pub fn decode_string(result: &str) -> Option<String> {
    let hex_part = result.trim_start_matches("0x");
    if hex_part.is_empty() {
        return None;
    }
    let bytes = hex::decode(hex_part).ok()?;

    if bytes.len() >= 64 {
        if let Some(decoded) = decode_dynamic_string(&bytes) {
            return non_empty(decoded);
        }
    }

    // Non-standard short-string return (e.g. bytes32 symbols)
    let trimmed: Vec<u8> = bytes.into_iter().take_while(|b| *b != 0).collect();
    non_empty(String::from_utf8(trimmed).ok()?)
}

fn decode_dynamic_string(bytes: &[u8]) -> Option<String> {
    let offset = word_to_usize(&bytes[0..32])?;
    let start = offset.checked_add(32)?;
    let len = word_to_usize(bytes.get(offset..start)?)?;
    let end = start.checked_add(len)?;
    let payload = bytes.get(start..end)?;
    String::from_utf8(payload.to_vec()).ok()
}

fn word_to_usize(word: &[u8]) -> Option<usize> {
    if word.len() != 32 || word[..24].iter().any(|b| *b != 0) {
        return None;
    }
    let mut value: u64 = 0;
    for b in &word[24..32] {
        value = (value << 8) | u64::from(*b);
    }
    usize::try_from(value).ok()
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim_end_matches('\0').trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Allowances at or above `floor(0.9 * (2^256 - 1))` are treated as
/// unlimited; this catches the various `MAX - n` patterns wallets
/// produce. Computed in 256-bit integer arithmetic: floats cannot
/// represent the threshold exactly.
pub fn unlimited_threshold() -> U256 {
    let max = U256::MAX;
    let nine = U256::from(9u8);
    let ten = U256::from(10u8);
    // floor(9 * MAX / 10) without overflow: 9*(MAX/10) + (9*(MAX%10))/10
    (max / ten) * nine + (max % ten) * nine / ten
}

/// Whether an allowance counts as an effectively infinite permission.
pub fn is_unlimited(value: U256) -> bool {
    value >= unlimited_threshold()
}

/// Human display form of an ERC-20 allowance.
pub fn format_allowance(value: U256, decimals: u8) -> String {
    if is_unlimited(value) {
        return "Unlimited".to_string();
    }

    let raw: f64 = value.to_string().parse().unwrap_or(f64::MAX);
    let scaled = raw / 10f64.powi(i32::from(decimals));
    if scaled >= 1e9 {
        format!("{:.2}B", scaled / 1e9)
    } else if scaled >= 1e6 {
        format!("{:.2}M", scaled / 1e6)
    } else if scaled >= 1e3 {
        format!("{:.2}K", scaled / 1e3)
    } else {
        format!("{:.4}", scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_call_pads_addresses() {
        let data = encode_call(
            ALLOWANCE_SELECTOR,
            &[
                "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D",
                "0x000000000022d473030f116ddee9f6b43ac78ba3",
            ],
        );
        assert_eq!(data.len(), 10 + 64 + 64);
        assert!(data.starts_with("0xdd62ed3e"));
        assert!(data.contains("0000000000000000000000007a250d5630b4cf539739df2c5dacb4c659f2488d"));
    }

    #[test]
    fn test_revoke_calldata_shapes() {
        let spender = "0x7a250d5630b4cf539739df2c5dacb4c659f2488d";
        let erc20 = revoke_calldata(spender);
        assert!(erc20.starts_with(APPROVE_SELECTOR));
        assert!(erc20.ends_with(&"0".repeat(64)));
        assert_eq!(erc20.len(), 10 + 128);

        let blanket = revoke_all_calldata(spender);
        assert!(blanket.starts_with(SET_APPROVAL_FOR_ALL_SELECTOR));
        assert_eq!(blanket.len(), 10 + 128);
    }

    #[test]
    fn test_decode_u256() {
        assert_eq!(decode_u256("0x"), U256::ZERO);
        assert_eq!(decode_u256(""), U256::ZERO);
        assert_eq!(decode_u256("0x100"), U256::from(256u64));
        assert_eq!(
            decode_u256(&format!("0x{}", "f".repeat(64))),
            U256::MAX
        );
    }

    #[test]
    fn test_decode_bool() {
        assert!(!decode_bool("0x"));
        assert!(!decode_bool(&format!("0x{}", "0".repeat(64))));
        assert!(decode_bool(&format!("0x{:0>64}", "1")));
    }

    #[test]
    fn test_decode_standard_string() {
        // offset 0x20, length 4, "USDC"
        let mut payload = String::from("0x");
        payload.push_str(&format!("{:0>64}", "20"));
        payload.push_str(&format!("{:0>64}", "4"));
        payload.push_str(&format!("{:0<64}", hex::encode("USDC")));
        assert_eq!(decode_string(&payload), Some("USDC".to_string()));
    }

    #[test]
    fn test_decode_bytes32_fallback() {
        // MKR-style bytes32 symbol: UTF-8 bytes NUL-padded to one word
        let payload = format!("0x{:0<64}", hex::encode("MKR"));
        assert_eq!(decode_string(&payload), Some("MKR".to_string()));
    }

    #[test]
    fn test_decode_string_rejects_garbage() {
        assert_eq!(decode_string("0x"), None);
        // Offset word pointing far past the payload falls back, then
        // fails UTF-8-or-empty checks
        let payload = format!("0x{:0>64}", "ffffffffffffffff");
        assert_eq!(decode_string(&payload), None);
    }

    #[test]
    fn test_unlimited_threshold_properties() {
        let threshold = unlimited_threshold();
        assert!(is_unlimited(U256::MAX));
        assert!(is_unlimited(threshold));
        assert!(!is_unlimited(threshold - U256::from(1u8)));
        assert!(!is_unlimited(U256::MAX / U256::from(2u8)));
        assert!(!is_unlimited(U256::ZERO));
        // 90% of MAX sits strictly between MAX/2 and MAX
        assert!(threshold > U256::MAX / U256::from(2u8));
        assert!(threshold < U256::MAX);
    }

    #[test]
    fn test_format_allowance() {
        assert_eq!(format_allowance(U256::MAX, 18), "Unlimited");
        // 1500 tokens at 18 decimals
        let value = U256::from(1500u64) * U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(format_allowance(value, 18), "1.50K");
        // 2_500_000 USDC at 6 decimals
        let value = U256::from(2_500_000u64) * U256::from(1_000_000u64);
        assert_eq!(format_allowance(value, 6), "2.50M");
        // 3 billion at 6 decimals
        let value = U256::from(3_000_000_000u64) * U256::from(1_000_000u64);
        assert_eq!(format_allowance(value, 6), "3.00B");
        // Small amount renders with four decimals
        let value = U256::from(500_000u64);
        assert_eq!(format_allowance(value, 6), "0.5000");
    }
}
