//! RevokeScan: token approval scanner and risk assessment for EVM wallets.
//!
//! This is the workspace root crate; it exists to host cross-crate
//! integration tests. For actual functionality, use the individual
//! crates directly:
//!
//! - `approval-core`: types, RPC gateway, log parsing, state reconstruction
//! - `spender-intel`: spender classification and verification lookups
//! - `risk-engine`: per-approval risk scoring and wallet hygiene
//! - `approval-scanner`: scan orchestration and report assembly
//! - `api-server`: REST API server

pub use approval_core as core;
pub use approval_scanner as scanner;
pub use risk_engine as risk;
