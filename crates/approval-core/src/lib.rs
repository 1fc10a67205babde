//! Approval Core
//!
//! Shared types, JSON-RPC gateway, and approval-state primitives for the
//! RevokeScan token-approval scanner:
//!
//! - [`chain::rpc`]: typed JSON-RPC gateway and the [`chain::rpc::ChainRpc`] seam
//! - [`chain::logs`]: raw-log decoding for the three approval standards
//! - [`chain::state`]: latest-write-wins approval-state reconstruction
//! - [`chain::abi`]: call-data encoding, return decoding, allowance semantics
//! - [`chain::address`]: canonical addresses and EIP-55 checksums

pub mod chain;
pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
