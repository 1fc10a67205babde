//! Folds a stream of parsed approval events into the currently-effective
//! approval state.
//!
//! The reconstructed state is a best-effort view: the scan window may
//! exclude older events, `transferFrom` may consume allowances without a
//! fresh `Approval` emission, and non-standard contracts reset state
//! internally. Every surviving entry is therefore re-verified against
//! live chain reads downstream.

use std::collections::HashMap;

use alloy_primitives::U256;

use crate::types::{ApprovalKey, ApprovalKind, ParsedApproval};

/// The zero address; ERC-721 encodes "no approved spender" as an
/// approval to it.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Reconstruct the latest-write-wins approval state from an event stream.
///
/// Events are ordered by `(block_number, log_index)` ascending; ties keep
/// input order (stable sort), so reconstruction is deterministic for a
/// fixed input set.
pub fn reconstruct_state(
    mut events: Vec<ParsedApproval>,
) -> HashMap<ApprovalKey, ParsedApproval> {
    events.sort_by_key(|e| (e.block_number, e.log_index));

    let mut state: HashMap<ApprovalKey, ParsedApproval> = HashMap::new();
    for event in events {
        match event.kind {
            ApprovalKind::Erc20 => {
                let key = event.key();
                if event.value.unwrap_or(U256::ZERO) == U256::ZERO {
                    state.remove(&key);
                } else {
                    state.insert(key, event);
                }
            }
            ApprovalKind::Erc721All | ApprovalKind::Erc1155All => {
                let key = event.key();
                if event.approved {
                    state.insert(key, event);
                } else {
                    state.remove(&key);
                }
            }
            ApprovalKind::Erc721Single => {
                // Only one address can be approved per tokenId: a new
                // approval replaces any earlier one, and approving the
                // zero address clears it.
                state.retain(|key, existing| {
                    !(existing.kind == ApprovalKind::Erc721Single
                        && key.token == event.token_address
                        && key.token_id == event.token_id)
                });
                if event.spender != ZERO_ADDRESS {
                    state.insert(event.key(), event);
                }
            }
        }
    }
    state
}
