//! Decodes raw approval event logs into typed approval records.
//!
//! ERC-20 and ERC-721 emit `Approval` with the same topic0; the only
//! reliable discriminator for compliant contracts is topic arity (the
//! ERC-721 tokenId is indexed, the ERC-20 value is not). Malformed or
//! ambiguous logs are dropped rather than misclassified.

use alloy_primitives::U256;
use tracing::debug;

use crate::chain::{address, parse_hex_u64, APPROVAL_FOR_ALL_TOPIC, APPROVAL_TOPIC};
use crate::types::{ApprovalKind, ParsedApproval, RawLog};

/// Parse a batch of raw logs, dropping records that fail to decode.
pub fn parse_approval_logs(logs: &[RawLog]) -> Vec<ParsedApproval> {
    logs.iter().filter_map(parse_approval_log).collect()
}

/// Parse a single raw log. Returns `None` for events that are not
/// approvals or are malformed.
pub fn parse_approval_log(log: &RawLog) -> Option<ParsedApproval> {
    let topic0 = log.topics.first()?.to_ascii_lowercase();
    match topic0.as_str() {
        APPROVAL_TOPIC => parse_approval(log),
        APPROVAL_FOR_ALL_TOPIC => parse_approval_for_all(log),
        _ => None,
    }
}

fn parse_approval(log: &RawLog) -> Option<ParsedApproval> {
    let owner = address::unpad_topic(log.topics.get(1)?);
    let spender = address::unpad_topic(log.topics.get(2)?);
    if owner.is_empty() || spender.is_empty() {
        return None;
    }

    let (kind, value, token_id) = match log.topics.len() {
        // ERC-721: the tokenId is indexed and arrives as a fourth topic
        4 => {
            let token_id = parse_u256_hex(log.topics.get(3)?)?;
            (ApprovalKind::Erc721Single, None, Some(token_id))
        }
        // ERC-20: the value lives in the single-word data payload
        3 if data_byte_len(&log.data) == 32 => {
            let value = parse_u256_hex(&log.data)?;
            (ApprovalKind::Erc20, Some(value), None)
        }
        arity => {
            debug!(topics = arity, data = %log.data, "Skipping ambiguous Approval log");
            return None;
        }
    };

    Some(ParsedApproval {
        token_address: address::normalize(&log.address),
        owner,
        spender,
        kind,
        value,
        token_id,
        approved: true,
        block_number: parse_hex_u64(&log.block_number),
        log_index: parse_hex_u64(&log.log_index) as u32,
        tx_hash: log.transaction_hash.clone(),
    })
}

fn parse_approval_for_all(log: &RawLog) -> Option<ParsedApproval> {
    let owner = address::unpad_topic(log.topics.get(1)?);
    let operator = address::unpad_topic(log.topics.get(2)?);
    if owner.is_empty() || operator.is_empty() {
        return None;
    }

    // The boolean is the LSB of the single data word
    let approved = parse_u256_hex(&log.data).is_some_and(|v| v.bit(0));

    Some(ParsedApproval {
        token_address: address::normalize(&log.address),
        owner,
        spender: operator,
        // ApprovalForAll does not identify the standard; ERC-1155
        // operators share this signature and the verification path.
        kind: ApprovalKind::Erc721All,
        value: None,
        token_id: None,
        approved,
        block_number: parse_hex_u64(&log.block_number),
        log_index: parse_hex_u64(&log.log_index) as u32,
        tx_hash: log.transaction_hash.clone(),
    })
}

fn data_byte_len(data: &str) -> usize {
    data.trim_start_matches("0x").len() / 2
}

fn parse_u256_hex(value: &str) -> Option<U256> {
    let hex_part = value.trim_start_matches("0x");
    if hex_part.is_empty() {
        return None;
    }
    U256::from_str_radix(hex_part, 16).ok()
}
