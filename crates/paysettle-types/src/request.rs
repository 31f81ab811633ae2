//! Payment request model.
//!
//! A [`PaymentRequest`] is built per call and never persisted. It names what
//! the payer spends, what the payee should receive, the cap on delivery, the
//! slippage floor, and the venue to convert through.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{amount, Address, AssetId, PaysettleError, Result};

/// Opaque parameters forwarded to the venue unmodified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingHints {
    /// Fee-sharing wallet identifier, if any.
    pub wallet_id: Option<Address>,
    /// Venue-specific trade hint bytes.
    pub hint: Vec<u8>,
}

/// A single settlement request from a payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Asset the payer spends.
    pub source_asset: AssetId,
    /// Declared amount of `source_asset` to spend. For the native asset this
    /// must equal the value attached to the call.
    pub source_amount: Decimal,
    /// Asset the payee receives.
    pub destination_asset: AssetId,
    /// Recipient of the converted funds.
    pub payee: Address,
    /// Upper bound on how much `destination_asset` the payee may receive.
    pub max_destination_amount: Decimal,
    /// Slippage floor in destination units per source unit. Zero accepts
    /// the venue's best rate unconditionally.
    pub min_conversion_rate: Decimal,
    /// Forwarded to the venue as-is.
    pub hints: RoutingHints,
    /// Carried verbatim into the settlement record.
    pub memo: Vec<u8>,
    /// Venue to convert through.
    pub venue: Address,
}

impl PaymentRequest {
    /// Structural validation, independent of any balance state.
    pub fn validate(&self) -> Result<()> {
        amount::ensure_non_negative("source_amount", self.source_amount)?;
        amount::ensure_non_negative("max_destination_amount", self.max_destination_amount)?;
        amount::ensure_non_negative("min_conversion_rate", self.min_conversion_rate)?;
        if self.payee.is_zero() {
            return Err(PaysettleError::invalid("payee must not be the zero address"));
        }
        Ok(())
    }

    /// Whether source and destination are the same asset (no venue involved).
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.source_asset == self.destination_asset
    }
}

/// Dummy request for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl PaymentRequest {
    /// Native-to-native request paying `amount` to `payee` with cap `amount`.
    pub fn dummy(payee: Address, amount: Decimal) -> Self {
        Self {
            source_asset: AssetId::Native,
            source_amount: amount,
            destination_asset: AssetId::Native,
            payee,
            max_destination_amount: amount,
            min_conversion_rate: Decimal::ZERO,
            hints: RoutingHints::default(),
            memo: b"ThisIsPaymentData".to_vec(),
            venue: Address::ZERO,
        }
    }
}
