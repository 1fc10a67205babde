//! Buckets scored approvals, attaches action URLs and revoke calldata,
//! and produces the final scan report plus the shareable summary card.

use serde::Serialize;

use approval_core::chain::{abi, address};
use approval_core::types::ActiveApproval;
use risk_engine::RiskCategory;

/// Chains the report layer knows how to link out to.
#[derive(Debug, Clone, Copy)]
pub struct ChainInfo {
    pub chain_id: u64,
    pub name: &'static str,
    pub explorer: &'static str,
}

pub const SUPPORTED_CHAINS: &[ChainInfo] = &[
    ChainInfo {
        chain_id: 1,
        name: "Ethereum",
        explorer: "https://etherscan.io",
    },
    ChainInfo {
        chain_id: 137,
        name: "Polygon",
        explorer: "https://polygonscan.com",
    },
    ChainInfo {
        chain_id: 42161,
        name: "Arbitrum",
        explorer: "https://arbiscan.io",
    },
    ChainInfo {
        chain_id: 10,
        name: "Optimism",
        explorer: "https://optimistic.etherscan.io",
    },
    ChainInfo {
        chain_id: 8453,
        name: "Base",
        explorer: "https://basescan.org",
    },
];

/// Look up a supported chain.
pub fn chain_info(chain_id: u64) -> Option<&'static ChainInfo> {
    SUPPORTED_CHAINS.iter().find(|c| c.chain_id == chain_id)
}

/// A verified approval with its risk assessment and action links.
#[derive(Debug, Clone, Serialize)]
pub struct CategorizedApproval {
    #[serde(flatten)]
    pub approval: ActiveApproval,
    pub risk_score: u32,
    pub category: RiskCategory,
    pub risk_reasons: Vec<String>,
    pub revoke_url: String,
    pub etherscan_url: String,
    /// Calldata a frontend can submit against the token contract to
    /// revoke this approval.
    pub revoke_calldata: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub total_approvals: usize,
    pub dangerous: usize,
    pub risky: usize,
    pub safe: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalBuckets {
    pub dangerous: Vec<CategorizedApproval>,
    pub risky: Vec<CategorizedApproval>,
    pub safe: Vec<CategorizedApproval>,
}

/// Complete categorized scan result.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub wallet: String,
    pub chain_id: u64,
    pub hygiene_score: u32,
    pub hygiene_label: &'static str,
    pub summary: ScanSummary,
    pub approvals: ApprovalBuckets,
}

/// Shareable summary card data.
#[derive(Debug, Clone, Serialize)]
pub struct ShareCard {
    pub hygiene_score: u32,
    pub hygiene_label: &'static str,
    pub total_approvals: usize,
    pub dangerous_count: usize,
    pub risky_count: usize,
    pub safe_count: usize,
    pub share_text: String,
    pub wallet_short: String,
}

/// Score, bucket, and link a set of verified approvals. Buckets are
/// ordered by score descending.
pub fn assemble(wallet: &str, chain_id: u64, approvals: Vec<ActiveApproval>) -> ScanResult {
    let chain = chain_info(chain_id).unwrap_or(&SUPPORTED_CHAINS[0]);
    let revoke_url = format!("https://revoke.cash/address/{wallet}?chainId={chain_id}");

    let mut dangerous = Vec::new();
    let mut risky = Vec::new();
    let mut safe = Vec::new();
    let mut assessments = Vec::new();

    for approval in approvals {
        let assessment = risk_engine::assess(&approval);
        let revoke_calldata = if approval.kind.is_for_all() {
            abi::revoke_all_calldata(&approval.spender.address)
        } else {
            abi::revoke_calldata(&approval.spender.address)
        };
        let entry = CategorizedApproval {
            risk_score: assessment.score,
            category: assessment.category,
            risk_reasons: assessment.reasons(),
            revoke_url: revoke_url.clone(),
            etherscan_url: format!("{}/address/{}", chain.explorer, approval.spender.address),
            revoke_calldata,
            approval,
        };
        match assessment.category {
            RiskCategory::Dangerous => dangerous.push(entry),
            RiskCategory::Risky => risky.push(entry),
            RiskCategory::Safe => safe.push(entry),
        }
        assessments.push(assessment);
    }

    for bucket in [&mut dangerous, &mut risky, &mut safe] {
        bucket.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    }

    let hygiene_score = risk_engine::hygiene_score(&assessments);

    ScanResult {
        wallet: wallet.to_string(),
        chain_id,
        hygiene_score,
        hygiene_label: risk_engine::hygiene_label(hygiene_score),
        summary: ScanSummary {
            total_approvals: assessments.len(),
            dangerous: dangerous.len(),
            risky: risky.len(),
            safe: safe.len(),
        },
        approvals: ApprovalBuckets {
            dangerous,
            risky,
            safe,
        },
    }
}

/// Social share line for a scan result.
pub fn share_text(result: &ScanResult) -> String {
    let score = result.hygiene_score;
    if result.summary.dangerous > 0 {
        format!(
            "🚨 My wallet has {} dangerous approval(s)! Hygiene score: {score}/100. Check yours at RevokeScan",
            result.summary.dangerous
        )
    } else if result.summary.risky > 0 {
        format!(
            "⚠️ Found {} risky approval(s) in my wallet. Score: {score}/100. Scan yours at RevokeScan",
            result.summary.risky
        )
    } else {
        format!("✅ My wallet is clean! Hygiene score: {score}/100. Check yours at RevokeScan")
    }
}

/// Data for the shareable summary card.
pub fn share_card(result: &ScanResult) -> ShareCard {
    ShareCard {
        hygiene_score: result.hygiene_score,
        hygiene_label: result.hygiene_label,
        total_approvals: result.summary.total_approvals,
        dangerous_count: result.summary.dangerous,
        risky_count: result.summary.risky,
        safe_count: result.summary.safe,
        share_text: share_text(result),
        wallet_short: address::short(&result.wallet),
    }
}
