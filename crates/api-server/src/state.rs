//! Application state shared across handlers.

use std::sync::Arc;

use approval_core::chain::rpc::{ChainRpc, RpcGateway};
use approval_core::Config;
use approval_scanner::ApprovalScanner;
use spender_intel::SpenderClassifier;

/// Shared application state. The gateway and classifier live for the
/// process; scanners (and their caches) are created per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub rpc: Arc<dyn ChainRpc>,
    pub classifier: Arc<SpenderClassifier>,
}

impl AppState {
    /// Create application state from configuration.
    pub fn new(config: Config) -> Self {
        let rpc: Arc<dyn ChainRpc> = Arc::new(RpcGateway::new(config.rpc.eth_rpc_url.clone()));
        let classifier = Arc::new(SpenderClassifier::new(config.etherscan_api_key.clone()));
        Self {
            config,
            rpc,
            classifier,
        }
    }

    /// A fresh scanner for one request; its metadata caches are scoped
    /// to that scan and discarded with it.
    pub fn new_scanner(&self) -> ApprovalScanner {
        ApprovalScanner::new(self.rpc.clone(), self.classifier.clone())
    }

    /// Create an Arc-wrapped state.
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}
