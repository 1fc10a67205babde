//! Address canonicalization, EIP-55 checksums, and topic padding.
//!
//! Addresses are handled as lowercase `0x`-prefixed 40-hex strings
//! throughout the system; mixed case appears only at the validation
//! boundary and in checksummed output.

use alloy_primitives::keccak256;

/// Canonical lowercase form of an address.
pub fn normalize(address: &str) -> String {
    address.to_ascii_lowercase()
}

/// `0x` followed by exactly 40 hex characters.
pub fn is_valid_format(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex_part) => hex_part.len() == 40 && hex_part.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// EIP-55 checksummed form of a well-formed address.
///
/// The checksum hash is Keccak-256 over the lowercase hex characters.
/// The upstream service hashed with SHA3-256, which produces checksums
/// no wallet accepts; Keccak is the EIP-55 definition.
pub fn to_checksum(address: &str) -> String {
    let lower = address.trim_start_matches("0x").to_ascii_lowercase();
    let hash_hex = hex::encode(keccak256(lower.as_bytes()));

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (ch, hash_ch) in lower.chars().zip(hash_hex.chars()) {
        let nibble = hash_ch.to_digit(16).unwrap_or(0);
        if ch.is_ascii_alphabetic() && nibble >= 8 {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Validate the EIP-55 checksum of an address. All-lowercase and
/// all-uppercase addresses carry no checksum and always pass.
pub fn validate_checksum(address: &str) -> bool {
    let hex_part = match address.strip_prefix("0x") {
        Some(h) => h,
        None => return false,
    };
    if hex_part == hex_part.to_ascii_lowercase() || hex_part == hex_part.to_ascii_uppercase() {
        return true;
    }
    address == to_checksum(address)
}

/// Left-pad an address to a 32-byte topic word.
pub fn pad_topic(address: &str) -> String {
    let hex_part = address.trim_start_matches("0x").to_ascii_lowercase();
    format!("0x{:0>64}", hex_part)
}

/// Extract the address from a 32-byte topic word (last 20 bytes).
/// Short or empty topics yield an empty string; callers drop the record.
pub fn unpad_topic(topic: &str) -> String {
    let hex_part = topic.trim_start_matches("0x");
    if hex_part.len() < 40 {
        return String::new();
    }
    format!("0x{}", hex_part[hex_part.len() - 40..].to_ascii_lowercase())
}

/// Abbreviated display form: `0x1234...abcd`.
pub fn short(address: &str) -> String {
    if address.len() < 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
