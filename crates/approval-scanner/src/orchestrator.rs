//! Scan orchestration: log fetch, state reconstruction, live
//! verification, and metadata enrichment.
//!
//! A scan issues many independent RPC calls; every per-entry failure is
//! swallowed and the entry dropped, so one flaky token cannot poison the
//! report. The orchestrator never returns an error: degraded scans
//! produce fewer (possibly zero) results.

use std::sync::Arc;

use alloy_primitives::U256;
use chrono::Utc;
use dashmap::DashMap;
use futures_util::{stream, StreamExt};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use approval_core::chain::rpc::{ChainRpc, LogFilter};
use approval_core::chain::{
    abi, address, logs, state, APPROVAL_FOR_ALL_TOPIC, APPROVAL_TOPIC, SCAN_BLOCK_WINDOW,
    SECONDS_PER_BLOCK,
};
use approval_core::types::{
    ActiveApproval, ApprovalKind, ParsedApproval, RawLog, SpenderMeta, TokenInfo, TokenMeta,
};
use spender_intel::SpenderClassifier;

/// Upper bound on in-flight verification RPCs per scan; keeps public
/// endpoints from rate-limiting the scan.
const MAX_CONCURRENT_VERIFICATIONS: usize = 8;

const SECONDS_PER_DAY: u64 = 86_400;

/// One scan's worth of pipeline state. Caches are per-instance and die
/// with the scan.
pub struct ApprovalScanner {
    rpc: Arc<dyn ChainRpc>,
    spenders: Arc<SpenderClassifier>,
    token_cache: DashMap<String, Arc<OnceCell<TokenInfo>>>,
    spender_cache: DashMap<String, Arc<OnceCell<SpenderMeta>>>,
}

impl ApprovalScanner {
    pub fn new(rpc: Arc<dyn ChainRpc>, spenders: Arc<SpenderClassifier>) -> Self {
        Self {
            rpc,
            spenders,
            token_cache: DashMap::new(),
            spender_cache: DashMap::new(),
        }
    }

    /// Scan a wallet for currently-effective approvals.
    ///
    /// Returns unlimited approvals first; the presentation order seen by
    /// consumers is imposed later by report assembly.
    pub async fn scan(&self, owner: &str) -> Vec<ActiveApproval> {
        let owner = address::normalize(owner);

        let head = match self.rpc.head_block().await {
            Ok(head) => head,
            Err(e) => {
                warn!(error = %e, "head_block failed; scanning from genesis");
                0
            }
        };
        let from_block = head.saturating_sub(SCAN_BLOCK_WINDOW);
        let owner_topic = address::pad_topic(&owner);

        let approval_filter = LogFilter {
            topics: vec![
                Some(APPROVAL_TOPIC.to_string()),
                Some(owner_topic.clone()),
            ],
            from_block,
            to_block: None,
        };
        let for_all_filter = LogFilter {
            topics: vec![Some(APPROVAL_FOR_ALL_TOPIC.to_string()), Some(owner_topic)],
            from_block,
            to_block: None,
        };

        let (approval_logs, for_all_logs) = tokio::join!(
            self.fetch_log_family("Approval", &approval_filter),
            self.fetch_log_family("ApprovalForAll", &for_all_filter),
        );

        let mut events = logs::parse_approval_logs(&approval_logs);
        events.extend(logs::parse_approval_logs(&for_all_logs));

        let current = state::reconstruct_state(events);
        info!(
            wallet = %owner,
            entries = current.len(),
            head,
            from_block,
            "Reconstructed approval state"
        );

        let now = Utc::now().timestamp().max(0) as u64;
        let results: Vec<Option<ActiveApproval>> = stream::iter(current.into_values())
            .map(|entry| self.verify_and_enrich(&owner, entry, head, now))
            .buffer_unordered(MAX_CONCURRENT_VERIFICATIONS)
            .collect()
            .await;

        let mut verified: Vec<ActiveApproval> = results.into_iter().flatten().collect();
        verified.sort_by_key(|a| !a.is_unlimited);
        verified
    }

    async fn fetch_log_family(&self, family: &str, filter: &LogFilter) -> Vec<RawLog> {
        match self.rpc.get_logs(filter).await {
            Ok(logs) => {
                debug!(family, count = logs.len(), "Fetched log family");
                logs
            }
            Err(e) => {
                warn!(family, error = %e, "Log fetch failed; treating family as empty");
                Vec::new()
            }
        }
    }

    /// Confirm one reconstructed entry against live state and enrich it.
    /// Any RPC failure drops the entry.
    async fn verify_and_enrich(
        &self,
        owner: &str,
        entry: ParsedApproval,
        head: u64,
        now: u64,
    ) -> Option<ActiveApproval> {
        let (allowance_raw, is_unlimited) = match entry.kind {
            ApprovalKind::Erc20 => {
                let allowance = match self
                    .rpc
                    .get_allowance(&entry.token_address, owner, &entry.spender)
                    .await
                {
                    Ok(allowance) => allowance,
                    Err(e) => {
                        debug!(
                            token = %entry.token_address,
                            spender = %entry.spender,
                            error = %e,
                            "Allowance check failed; dropping entry"
                        );
                        return None;
                    }
                };
                if allowance == U256::ZERO {
                    return None;
                }
                (allowance, abi::is_unlimited(allowance))
            }
            ApprovalKind::Erc721All | ApprovalKind::Erc1155All => {
                let approved = match self
                    .rpc
                    .is_approved_for_all(&entry.token_address, owner, &entry.spender)
                    .await
                {
                    Ok(approved) => approved,
                    Err(e) => {
                        debug!(
                            token = %entry.token_address,
                            operator = %entry.spender,
                            error = %e,
                            "Operator check failed; dropping entry"
                        );
                        return None;
                    }
                };
                if !approved {
                    return None;
                }
                (U256::ZERO, true)
            }
            ApprovalKind::Erc721Single => {
                // Reporting these would need per-tokenId getApproved
                // enumeration; out of scope for now
                debug!(token = %entry.token_address, "Skipping single-token approval");
                return None;
            }
        };

        let token_info = self.token_info(&entry.token_address).await;
        let spender = self.spender_meta(&entry.spender).await?;

        let allowance = if entry.kind.is_for_all() {
            "All Tokens".to_string()
        } else {
            abi::format_allowance(allowance_raw, token_info.decimals)
        };

        let timestamp = self
            .rpc
            .block_timestamp(entry.block_number)
            .await
            .unwrap_or(0);
        let age_days = if timestamp > 0 && now >= timestamp {
            (now - timestamp) / SECONDS_PER_DAY
        } else {
            head.saturating_sub(entry.block_number) * SECONDS_PER_BLOCK / SECONDS_PER_DAY
        };

        Some(ActiveApproval {
            token: TokenMeta {
                address: entry.token_address.clone(),
                symbol: token_info.symbol,
                name: token_info.name,
                decimals: token_info.decimals,
                standard: entry.kind.standard(),
            },
            spender,
            kind: entry.kind,
            allowance,
            allowance_raw: allowance_raw.to_string(),
            is_unlimited,
            block_number: entry.block_number,
            timestamp,
            age_days,
            tx_hash: entry.tx_hash,
        })
    }

    /// Token metadata with in-flight deduplication: concurrent requests
    /// for the same token await the first probe instead of issuing
    /// duplicate RPCs.
    async fn token_info(&self, token: &str) -> TokenInfo {
        let cell = {
            let entry = self.token_cache.entry(token.to_string()).or_default();
            Arc::clone(entry.value())
        };
        cell.get_or_init(|| async {
            match self.rpc.get_token_info(token).await {
                Ok(info) => info,
                Err(e) => {
                    debug!(token, error = %e, "Token metadata probe failed; using defaults");
                    TokenInfo::default()
                }
            }
        })
        .await
        .clone()
    }

    /// Spender classification with the same in-flight dedup discipline.
    /// A failed `eth_getCode` probe leaves the cell empty for retry and
    /// drops the current entry.
    async fn spender_meta(&self, spender: &str) -> Option<SpenderMeta> {
        let cell = {
            let entry = self.spender_cache.entry(spender.to_string()).or_default();
            Arc::clone(entry.value())
        };
        let result = cell
            .get_or_try_init(|| async {
                let code = self.rpc.get_code(spender).await?;
                let is_contract = !code.is_empty() && code != "0x";
                Ok::<SpenderMeta, approval_core::Error>(
                    self.spenders.classify(spender, is_contract).await,
                )
            })
            .await;

        match result {
            Ok(meta) => Some(meta.clone()),
            Err(e) => {
                debug!(spender, error = %e, "Spender probe failed; dropping entry");
                None
            }
        }
    }
}
