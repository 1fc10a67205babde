//! Spender Intel
//!
//! Classifies the addresses that hold approvals over a wallet: known
//! protocol contracts, Etherscan-verified contracts, unverified
//! contracts, and bare EOAs.

pub mod classifier;
pub mod etherscan;

pub use classifier::SpenderClassifier;
pub use etherscan::EtherscanClient;
