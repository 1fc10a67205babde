//! Scan operation handlers.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use approval_core::chain::address;
use approval_scanner::report::{self, ScanResult, ShareCard};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request to scan a wallet for approvals.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Wallet address to scan.
    pub address: String,
    /// Chain to scan on (one chain per scan).
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

fn default_chain_id() -> u64 {
    1
}

/// Validate the request and return the canonical wallet address.
///
/// Mixed-case addresses must carry a valid EIP-55 checksum; uniform-case
/// addresses bypass the check.
pub(crate) fn validate_request(request: &ScanRequest) -> Result<String, ApiError> {
    let raw = request.address.trim();
    if !address::is_valid_format(raw) {
        return Err(ApiError::BadRequest(
            "Invalid address format. Must be 0x followed by 40 hex characters.".to_string(),
        ));
    }
    if !address::validate_checksum(raw) {
        return Err(ApiError::BadRequest(
            "Invalid checksum. Address may be mistyped.".to_string(),
        ));
    }
    if report::chain_info(request.chain_id).is_none() {
        return Err(ApiError::BadRequest(format!(
            "Chain ID {} is not supported",
            request.chain_id
        )));
    }
    Ok(address::normalize(raw))
}

/// Scan a wallet and return the categorized approval report.
#[utoipa::path(
    post,
    path = "/api/scan",
    tag = "scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Categorized approval report"),
        (status = 400, description = "Invalid address or unsupported chain")
    )
)]
pub async fn scan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScanRequest>,
) -> ApiResult<Json<ScanResult>> {
    let wallet = validate_request(&request)?;
    info!(wallet = %wallet, chain_id = request.chain_id, "Scan requested");

    let approvals = state.new_scanner().scan(&wallet).await;
    let result = report::assemble(&wallet, request.chain_id, approvals);

    info!(
        wallet = %wallet,
        total = result.summary.total_approvals,
        dangerous = result.summary.dangerous,
        hygiene = result.hygiene_score,
        "Scan complete"
    );
    Ok(Json(result))
}

/// Scan a wallet and return shareable summary-card data.
#[utoipa::path(
    post,
    path = "/api/share-card",
    tag = "scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Share card payload"),
        (status = 400, description = "Invalid address or unsupported chain")
    )
)]
pub async fn share_card(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScanRequest>,
) -> ApiResult<Json<ShareCard>> {
    let wallet = validate_request(&request)?;
    let approvals = state.new_scanner().scan(&wallet).await;
    let result = report::assemble(&wallet, request.chain_id, approvals);
    Ok(Json(report::share_card(&result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(address: &str, chain_id: u64) -> ScanRequest {
        ScanRequest {
            address: address.to_string(),
            chain_id,
        }
    }

    #[test]
    fn test_lowercase_address_accepted() {
        let wallet =
            validate_request(&request("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", 1)).unwrap();
        assert_eq!(wallet, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
    }

    #[test]
    fn test_checksummed_address_accepted_and_lowercased() {
        let wallet =
            validate_request(&request("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", 1)).unwrap();
        assert_eq!(wallet, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
    }

    #[test]
    fn test_bad_checksum_rejected() {
        // Lowercase the final letter of a checksummed address
        let err =
            validate_request(&request("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD", 1)).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_malformed_address_rejected() {
        for bad in ["", "0x123", "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", "0xzz"] {
            assert!(validate_request(&request(bad, 1)).is_err());
        }
    }

    #[test]
    fn test_unsupported_chain_rejected() {
        let err =
            validate_request(&request("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", 56)).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_default_chain_is_mainnet() {
        let request: ScanRequest =
            serde_json::from_str(r#"{"address": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"}"#)
                .unwrap();
        assert_eq!(request.chain_id, 1);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let wallet =
            validate_request(&request(" 0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed ", 1)).unwrap();
        assert_eq!(wallet, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
    }
}
