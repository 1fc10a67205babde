//! Risk Engine
//!
//! Scores each verified approval with additive integer risk factors and
//! aggregates a wallet-level hygiene score over the full assessment list.

use serde::{Deserialize, Serialize};
use tracing::debug;

use approval_core::types::{ActiveApproval, ApprovalKind};

const WEIGHT_UNLIMITED_ALLOWANCE: u32 = 40;
const WEIGHT_APPROVAL_FOR_ALL: u32 = 25;
const WEIGHT_EOA_SPENDER: u32 = 35;
const WEIGHT_UNKNOWN_SPENDER: u32 = 20;
const WEIGHT_OLD_APPROVAL_6M: u32 = 15;
const WEIGHT_VERY_OLD_APPROVAL: u32 = 25;

/// Scores are capped here regardless of how many factors apply.
pub const MAX_SCORE: u32 = 100;

/// One applying risk factor.
#[derive(Debug, Clone, Serialize)]
pub struct RiskFactor {
    pub name: &'static str,
    pub weight: u32,
    pub reason: String,
}

/// Risk buckets, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    Safe,
    Risky,
    Dangerous,
}

/// Scoring result for a single approval.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub score: u32,
    pub category: RiskCategory,
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    /// Human-readable reasons, in factor order.
    pub fn reasons(&self) -> Vec<String> {
        self.factors.iter().map(|f| f.reason.clone()).collect()
    }
}

/// Score a verified approval.
///
/// At most one of the allowance factors applies (they key off the
/// approval kind), at most one of the age factors, and the spender
/// factors are mutually exclusive by construction.
pub fn assess(approval: &ActiveApproval) -> RiskAssessment {
    let mut factors = Vec::new();

    if approval.is_unlimited {
        match approval.kind {
            ApprovalKind::Erc20 => factors.push(RiskFactor {
                name: "unlimited_allowance",
                weight: WEIGHT_UNLIMITED_ALLOWANCE,
                reason: "Unlimited token allowance".to_string(),
            }),
            ApprovalKind::Erc721All | ApprovalKind::Erc1155All => factors.push(RiskFactor {
                name: "approval_for_all",
                weight: WEIGHT_APPROVAL_FOR_ALL,
                reason: "Operator can transfer every token in the collection".to_string(),
            }),
            ApprovalKind::Erc721Single => {}
        }
    }

    if !approval.spender.is_contract {
        factors.push(RiskFactor {
            name: "eoa_spender",
            weight: WEIGHT_EOA_SPENDER,
            reason: "Spender is an externally owned account, not a contract".to_string(),
        });
    } else if !approval.spender.verified {
        factors.push(RiskFactor {
            name: "unknown_spender",
            weight: WEIGHT_UNKNOWN_SPENDER,
            reason: "Spender contract source is not verified".to_string(),
        });
    }

    if approval.age_days > 365 {
        factors.push(RiskFactor {
            name: "very_old_approval",
            weight: WEIGHT_VERY_OLD_APPROVAL,
            reason: format!("Approval has been active for {} days", approval.age_days),
        });
    } else if approval.age_days > 180 {
        factors.push(RiskFactor {
            name: "old_approval_6m",
            weight: WEIGHT_OLD_APPROVAL_6M,
            reason: "Approval is more than six months old".to_string(),
        });
    }

    let score = factors.iter().map(|f| f.weight).sum::<u32>().min(MAX_SCORE);
    let category = categorize(score);
    debug!(
        token = %approval.token.address,
        spender = %approval.spender.address,
        score,
        ?category,
        "Assessed approval"
    );

    RiskAssessment {
        score,
        category,
        factors,
    }
}

/// Bucket a score: SAFE up to 30, RISKY up to 60, DANGEROUS above.
pub fn categorize(score: u32) -> RiskCategory {
    if score <= 30 {
        RiskCategory::Safe
    } else if score <= 60 {
        RiskCategory::Risky
    } else {
        RiskCategory::Dangerous
    }
}

/// Wallet hygiene over an assessment list:
/// `clamp(100 - 25*dangerous - 10*risky - 2*safe, 0, 100)`.
/// An empty list scores a clean 100.
pub fn hygiene_score(assessments: &[RiskAssessment]) -> u32 {
    let penalty: u32 = assessments
        .iter()
        .map(|a| match a.category {
            RiskCategory::Dangerous => 25,
            RiskCategory::Risky => 10,
            RiskCategory::Safe => 2,
        })
        .sum();
    100u32.saturating_sub(penalty)
}

/// Display label for a hygiene score.
pub fn hygiene_label(score: u32) -> &'static str {
    match score {
        90.. => "Excellent",
        70..=89 => "Good",
        50..=69 => "Fair",
        30..=49 => "Poor",
        _ => "Critical",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approval_core::types::{SpenderMeta, TokenMeta, TokenStandard};

    fn approval(
        kind: ApprovalKind,
        is_unlimited: bool,
        is_contract: bool,
        verified: bool,
        age_days: u64,
    ) -> ActiveApproval {
        ActiveApproval {
            token: TokenMeta {
                address: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
                symbol: Some("TKN".to_string()),
                name: Some("Token".to_string()),
                decimals: 18,
                standard: kind.standard(),
            },
            spender: SpenderMeta {
                address: "0x2222222222222222222222222222222222222222".to_string(),
                is_contract,
                name: verified.then(|| "Known Protocol".to_string()),
                verified,
                source_available: verified,
            },
            kind,
            allowance: "Unlimited".to_string(),
            allowance_raw: "0".to_string(),
            is_unlimited,
            block_number: 18_000_000,
            timestamp: 0,
            age_days,
            tx_hash: "0xcafe".to_string(),
        }
    }

    #[test]
    fn test_unlimited_erc20_to_known_router() {
        // Fresh unlimited approval to a verified contract: only the
        // allowance factor applies
        let assessment = assess(&approval(ApprovalKind::Erc20, true, true, true, 10));
        assert_eq!(assessment.score, 40);
        assert_eq!(assessment.category, RiskCategory::Risky);
        let names: Vec<_> = assessment.factors.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["unlimited_allowance"]);
    }

    #[test]
    fn test_approval_for_all_to_eoa_two_years_old() {
        let assessment = assess(&approval(ApprovalKind::Erc721All, true, false, false, 800));
        assert_eq!(assessment.score, 25 + 35 + 25);
        assert_eq!(assessment.category, RiskCategory::Dangerous);
        let names: Vec<_> = assessment.factors.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["approval_for_all", "eoa_spender", "very_old_approval"]
        );
    }

    #[test]
    fn test_unlimited_to_unverified_contract_200_days() {
        let assessment = assess(&approval(ApprovalKind::Erc20, true, true, false, 200));
        assert_eq!(assessment.score, 40 + 20 + 15);
        assert_eq!(assessment.category, RiskCategory::Dangerous);
        let names: Vec<_> = assessment.factors.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["unlimited_allowance", "unknown_spender", "old_approval_6m"]
        );
    }

    #[test]
    fn test_score_is_capped_at_100() {
        // Worst possible ERC-20 case sums to exactly the cap
        let assessment = assess(&approval(ApprovalKind::Erc20, true, false, false, 800));
        assert_eq!(assessment.score, 100);
        assert!(assessment.score <= MAX_SCORE);
    }

    #[test]
    fn test_age_factors_are_exclusive() {
        let six_months = assess(&approval(ApprovalKind::Erc20, false, true, true, 181));
        assert_eq!(six_months.factors.len(), 1);
        assert_eq!(six_months.factors[0].name, "old_approval_6m");

        let boundary = assess(&approval(ApprovalKind::Erc20, false, true, true, 365));
        assert_eq!(boundary.factors[0].name, "old_approval_6m");

        let very_old = assess(&approval(ApprovalKind::Erc20, false, true, true, 366));
        assert_eq!(very_old.factors[0].name, "very_old_approval");

        let fresh = assess(&approval(ApprovalKind::Erc20, false, true, true, 180));
        assert!(fresh.factors.is_empty());
    }

    #[test]
    fn test_spender_factors_are_exclusive() {
        let eoa = assess(&approval(ApprovalKind::Erc20, false, false, false, 0));
        assert_eq!(eoa.factors.len(), 1);
        assert_eq!(eoa.factors[0].name, "eoa_spender");

        let unverified = assess(&approval(ApprovalKind::Erc20, false, true, false, 0));
        assert_eq!(unverified.factors.len(), 1);
        assert_eq!(unverified.factors[0].name, "unknown_spender");
    }

    #[test]
    fn test_category_thresholds() {
        assert_eq!(categorize(0), RiskCategory::Safe);
        assert_eq!(categorize(30), RiskCategory::Safe);
        assert_eq!(categorize(31), RiskCategory::Risky);
        assert_eq!(categorize(60), RiskCategory::Risky);
        assert_eq!(categorize(61), RiskCategory::Dangerous);
        assert_eq!(categorize(100), RiskCategory::Dangerous);
    }

    #[test]
    fn test_category_ordering() {
        assert!(RiskCategory::Safe < RiskCategory::Risky);
        assert!(RiskCategory::Risky < RiskCategory::Dangerous);
    }

    #[test]
    fn test_monotonicity_under_factor_superset() {
        // B's factors are a subset of A's: score and category never decrease
        let b = assess(&approval(ApprovalKind::Erc20, true, true, true, 0));
        let a = assess(&approval(ApprovalKind::Erc20, true, true, false, 400));
        assert!(a.score >= b.score);
        assert!(a.category >= b.category);
    }

    #[test]
    fn test_hygiene_empty_is_perfect() {
        assert_eq!(hygiene_score(&[]), 100);
    }

    #[test]
    fn test_hygiene_penalties() {
        let dangerous = assess(&approval(ApprovalKind::Erc721All, true, false, false, 800));
        let risky = assess(&approval(ApprovalKind::Erc20, true, true, true, 0));
        let safe = assess(&approval(ApprovalKind::Erc20, false, true, true, 0));
        assert_eq!(dangerous.category, RiskCategory::Dangerous);
        assert_eq!(risky.category, RiskCategory::Risky);
        assert_eq!(safe.category, RiskCategory::Safe);

        assert_eq!(hygiene_score(std::slice::from_ref(&risky)), 90);
        assert_eq!(hygiene_score(std::slice::from_ref(&dangerous)), 75);
        assert_eq!(
            hygiene_score(&[dangerous.clone(), risky.clone(), safe.clone()]),
            100 - 25 - 10 - 2
        );

        // Heavy exposure clamps at zero
        let many: Vec<_> = (0..5).map(|_| dangerous.clone()).collect();
        assert_eq!(hygiene_score(&many), 0);
    }

    #[test]
    fn test_hygiene_labels() {
        assert_eq!(hygiene_label(100), "Excellent");
        assert_eq!(hygiene_label(90), "Excellent");
        assert_eq!(hygiene_label(89), "Good");
        assert_eq!(hygiene_label(70), "Good");
        assert_eq!(hygiene_label(69), "Fair");
        assert_eq!(hygiene_label(50), "Fair");
        assert_eq!(hygiene_label(49), "Poor");
        assert_eq!(hygiene_label(30), "Poor");
        assert_eq!(hygiene_label(29), "Critical");
        assert_eq!(hygiene_label(0), "Critical");
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(
            serde_json::to_string(&RiskCategory::Dangerous).unwrap(),
            "\"DANGEROUS\""
        );
        assert_eq!(serde_json::to_string(&RiskCategory::Safe).unwrap(), "\"SAFE\"");
    }
}
