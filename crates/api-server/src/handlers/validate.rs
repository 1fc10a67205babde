//! Address and chain validation handlers.
//!
//! Fast endpoints frontends call while the user types; they never touch
//! the chain.

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use approval_core::chain::address;
use approval_scanner::report;

/// Request to validate an address.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateRequest {
    pub address: String,
}

/// Address validation result.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validate an Ethereum address and return its checksummed form.
#[utoipa::path(
    post,
    path = "/api/validate",
    tag = "validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Validation result", body = ValidateResponse)
    )
)]
pub async fn validate_address(Json(request): Json<ValidateRequest>) -> Json<ValidateResponse> {
    let raw = request.address.trim();

    if !address::is_valid_format(raw) {
        return Json(ValidateResponse {
            valid: false,
            checksum: None,
            error: Some("Invalid address format. Must be 0x followed by 40 hex characters.".to_string()),
        });
    }

    if !address::validate_checksum(raw) {
        return Json(ValidateResponse {
            valid: false,
            checksum: None,
            error: Some("Invalid checksum. Address may be mistyped.".to_string()),
        });
    }

    Json(ValidateResponse {
        valid: true,
        checksum: Some(address::to_checksum(raw)),
        error: None,
    })
}

/// Request to validate a chain id.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChainValidateRequest {
    pub chain_id: u64,
}

/// Chain validation result.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChainValidateResponse {
    pub supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validate that a chain is supported.
#[utoipa::path(
    post,
    path = "/api/validate-chain",
    tag = "validate",
    request_body = ChainValidateRequest,
    responses(
        (status = 200, description = "Chain support result", body = ChainValidateResponse)
    )
)]
pub async fn validate_chain(
    Json(request): Json<ChainValidateRequest>,
) -> Json<ChainValidateResponse> {
    match report::chain_info(request.chain_id) {
        Some(chain) => Json(ChainValidateResponse {
            supported: true,
            name: Some(chain.name),
            error: None,
        }),
        None => Json(ChainValidateResponse {
            supported: false,
            name: None,
            error: Some(format!("Chain ID {} is not supported", request.chain_id)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_valid_address_returns_checksum() {
        let response = validate_address(Json(ValidateRequest {
            address: "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".to_string(),
        }))
        .await;
        assert!(response.valid);
        assert_eq!(
            response.checksum.as_deref(),
            Some("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")
        );
    }

    #[tokio::test]
    async fn test_malformed_address_reports_error() {
        let response = validate_address(Json(ValidateRequest {
            address: "0x123".to_string(),
        }))
        .await;
        assert!(!response.valid);
        assert!(response.error.as_deref().unwrap().contains("format"));
    }

    #[tokio::test]
    async fn test_bad_checksum_reports_error() {
        let response = validate_address(Json(ValidateRequest {
            address: "0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string(),
        }))
        .await;
        assert!(!response.valid);
        assert!(response.error.as_deref().unwrap().contains("checksum"));
    }

    #[tokio::test]
    async fn test_chain_validation() {
        let supported = validate_chain(Json(ChainValidateRequest { chain_id: 1 })).await;
        assert!(supported.supported);
        assert_eq!(supported.name, Some("Ethereum"));

        let unsupported = validate_chain(Json(ChainValidateRequest { chain_id: 56 })).await;
        assert!(!unsupported.supported);
        assert!(unsupported.error.is_some());
    }
}
