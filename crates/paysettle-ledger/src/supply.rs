//! Supply conservation invariant checker.
//!
//! Invariant enforced across every settlement and withdrawal:
//! ```text
//! ∀ asset: Σ(balances) == Σ(minted)
//! ```
//!
//! Settlement and treasury operations only move value between holders, so a
//! mismatch means value was created or destroyed somewhere it must not be.

use std::collections::HashMap;

use paysettle_types::{AssetId, PaysettleError, Result};
use rust_decimal::Decimal;

/// Tracks per-asset issuance so actual balances can be checked against it.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    minted: HashMap<AssetId, Decimal>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record newly issued value.
    ///
    /// # Errors
    /// Returns [`PaysettleError::ArithmeticOverflow`] if the issued total no
    /// longer fits a decimal. Nothing is recorded in that case.
    pub fn record_mint(&mut self, asset: AssetId, amount: Decimal) -> Result<()> {
        let total = self
            .expected_supply(asset)
            .checked_add(amount)
            .ok_or(PaysettleError::ArithmeticOverflow)?;
        self.minted.insert(asset, total);
        Ok(())
    }

    /// Expected total supply for an asset.
    #[must_use]
    pub fn expected_supply(&self, asset: AssetId) -> Decimal {
        self.minted.get(&asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// Verify that the actual supply (sum of all balances) matches issuance.
    ///
    /// # Errors
    /// Returns [`PaysettleError::Internal`] if actual ≠ expected.
    pub fn verify(&self, asset: AssetId, actual_supply: Decimal) -> Result<()> {
        let expected = self.expected_supply(asset);
        if actual_supply != expected {
            return Err(PaysettleError::Internal(format!(
                "supply invariant violated for {asset}: actual {actual_supply} != expected {expected}"
            )));
        }
        Ok(())
    }
}
