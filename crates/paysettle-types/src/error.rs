//! Error types for the paysettle engine.
//!
//! All errors use the `PS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Funds and asset errors
//! - 2xx: Venue errors
//! - 3xx: Guard and access-control errors
//! - 4xx: Request errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, AssetId};

/// Central error enum for all paysettle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaysettleError {
    // =================================================================
    // Funds / Asset Errors (1xx)
    // =================================================================
    /// A declared or attached amount is not actually available, or cannot be
    /// delivered (balance or allowance too small).
    #[error("PS_ERR_100: Insufficient funds of {asset}: need {needed}, have {available}")]
    InsufficientFunds {
        asset: AssetId,
        needed: Decimal,
        available: Decimal,
    },

    /// The asset variant does not support the requested capability.
    #[error("PS_ERR_101: Operation `{operation}` is not supported by {asset}")]
    UnsupportedAssetOperation {
        asset: AssetId,
        operation: &'static str,
    },

    /// No token ledger is registered at this address.
    #[error("PS_ERR_102: Unknown token: {0}")]
    UnknownToken(Address),

    // =================================================================
    // Venue Errors (2xx)
    // =================================================================
    /// The venue call failed for a reason other than the rate floor.
    #[error("PS_ERR_200: Venue failure: {reason}")]
    VenueFailure { reason: String },

    /// The venue cannot meet the payer's minimum acceptable rate.
    #[error("PS_ERR_201: Rate floor unmet: offered {offered}, floor {floor}")]
    RateFloorUnmet { offered: Decimal, floor: Decimal },

    // =================================================================
    // Guard / Access Errors (3xx)
    // =================================================================
    /// The settlement entry point was re-entered while a call was in flight.
    #[error("PS_ERR_300: Reentrancy detected")]
    ReentrancyDetected,

    /// The caller lacks the identity required for a gated operation.
    #[error("PS_ERR_301: Unauthorized caller: {caller}")]
    Unauthorized { caller: Address },

    // =================================================================
    // Request Errors (4xx)
    // =================================================================
    /// The request is structurally invalid (negative amounts, zero address, etc.).
    #[error("PS_ERR_400: Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Native value was attached to a call whose source asset is a token.
    #[error("PS_ERR_401: Unexpected native value attached: {attached}")]
    UnexpectedNativeValue { attached: Decimal },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Amount arithmetic overflowed the decimal range.
    #[error("PS_ERR_900: Arithmetic overflow")]
    ArithmeticOverflow,

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("PS_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("PS_ERR_902: Serialization error: {0}")]
    Serialization(String),

    /// Unrecoverable internal error.
    #[error("PS_ERR_999: Internal error: {0}")]
    Internal(String),
}

impl PaysettleError {
    /// Shorthand for [`PaysettleError::VenueFailure`].
    pub fn venue(reason: impl Into<String>) -> Self {
        Self::VenueFailure {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`PaysettleError::InvalidRequest`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PaysettleError>;

impl From<serde_json::Error> for PaysettleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
