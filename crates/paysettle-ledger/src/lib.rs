//! # paysettle-ledger
//!
//! The ledger substrate the settlement engine runs against, and the asset
//! abstraction that hides the native/token split from settlement logic.
//!
//! - [`Ledger`]: native balances, token ledgers, event log, checkpoints
//! - [`TokenLedger`]: balances and allowances for one fungible token
//! - [`AssetOps`]: uniform capability set, with [`NativeAsset`] and
//!   [`FungibleToken`] variants
//! - [`SupplyConservation`]: value is never created or destroyed by transfers

pub mod asset;
pub mod ledger;
pub mod supply;
pub mod token;

pub use asset::{asset_ops, AssetOps, FungibleToken, NativeAsset};
pub use ledger::{Checkpoint, Ledger};
pub use supply::SupplyConservation;
pub use token::TokenLedger;

use paysettle_types::{amount, PaysettleError, Result};
use rust_decimal::Decimal;

/// Validate an amount against an asset's precision.
pub(crate) fn check_amount(value: Decimal, decimals: u32) -> Result<()> {
    amount::ensure_non_negative("amount", value)?;
    if value.normalize().scale() > decimals {
        return Err(PaysettleError::invalid(format!(
            "amount {value} is finer than {decimals} decimals"
        )));
    }
    Ok(())
}
