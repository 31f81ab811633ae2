//! Asset abstraction.
//!
//! Settlement code talks to assets only through [`AssetOps`]. The two
//! variants differ in how value moves:
//!
//! - [`NativeAsset`]: value rides along with a call. There is no third-party
//!   transfer, so `transfer_from` is refused and allowances are always zero.
//! - [`FungibleToken`]: balances live in a separate [`TokenLedger`](crate::TokenLedger);
//!   every operation may fail (unknown token, short balance, short allowance).

use paysettle_types::{Address, AssetId, PaysettleError, Result};
use rust_decimal::Decimal;

use crate::ledger::Ledger;

/// Uniform capability set over native value and fungible tokens.
pub trait AssetOps: Send + Sync {
    fn id(&self) -> AssetId;

    /// Precision of amounts of this asset.
    fn decimals(&self, ledger: &Ledger) -> Result<u32>;

    fn balance_of(&self, ledger: &Ledger, holder: Address) -> Result<Decimal>;

    fn transfer(
        &self,
        ledger: &mut Ledger,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()>;

    /// `spender` moves `amount` from `owner` to `to` under a prior allowance.
    fn transfer_from(
        &self,
        ledger: &mut Ledger,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()>;

    /// Grant (or with zero, revoke) a spending right.
    fn approve(
        &self,
        ledger: &mut Ledger,
        owner: Address,
        spender: Address,
        amount: Decimal,
    ) -> Result<()>;

    fn allowance(&self, ledger: &Ledger, owner: Address, spender: Address) -> Result<Decimal>;

    /// Native value that must accompany a call that moves `amount` of this asset.
    fn call_value(&self, amount: Decimal) -> Decimal;

    /// Check the native value attached to a payer's call against the amount
    /// the payer declared.
    fn check_attached(&self, declared: Decimal, attached: Decimal) -> Result<()>;

    /// Bring `amount` from `payer` into `custodian`'s custody. Attached native
    /// value has already arrived with the call by the time this runs.
    fn collect(
        &self,
        ledger: &mut Ledger,
        custodian: Address,
        payer: Address,
        amount: Decimal,
    ) -> Result<()>;
}

/// Resolve the operations for an asset.
#[must_use]
pub fn asset_ops(asset: AssetId) -> Box<dyn AssetOps> {
    match asset {
        AssetId::Native => Box::new(NativeAsset),
        AssetId::Token(address) => Box::new(FungibleToken::new(address)),
    }
}

// ---------------------------------------------------------------------------
// NativeAsset
// ---------------------------------------------------------------------------

/// The ledger's intrinsic value-bearing asset.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeAsset;

impl AssetOps for NativeAsset {
    fn id(&self) -> AssetId {
        AssetId::Native
    }

    fn decimals(&self, ledger: &Ledger) -> Result<u32> {
        Ok(ledger.native_decimals())
    }

    fn balance_of(&self, ledger: &Ledger, holder: Address) -> Result<Decimal> {
        Ok(ledger.native_balance(holder))
    }

    fn transfer(
        &self,
        ledger: &mut Ledger,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()> {
        ledger.transfer_native(from, to, amount)
    }

    fn transfer_from(
        &self,
        _ledger: &mut Ledger,
        _spender: Address,
        _owner: Address,
        _to: Address,
        _amount: Decimal,
    ) -> Result<()> {
        Err(PaysettleError::UnsupportedAssetOperation {
            asset: AssetId::Native,
            operation: "transfer_from",
        })
    }

    fn approve(
        &self,
        _ledger: &mut Ledger,
        _owner: Address,
        _spender: Address,
        _amount: Decimal,
    ) -> Result<()> {
        // Native value is forwarded with the call; there is no spending right.
        Ok(())
    }

    fn allowance(&self, _ledger: &Ledger, _owner: Address, _spender: Address) -> Result<Decimal> {
        Ok(Decimal::ZERO)
    }

    fn call_value(&self, amount: Decimal) -> Decimal {
        amount
    }

    fn check_attached(&self, declared: Decimal, attached: Decimal) -> Result<()> {
        if attached != declared {
            return Err(PaysettleError::InsufficientFunds {
                asset: AssetId::Native,
                needed: declared,
                available: attached,
            });
        }
        Ok(())
    }

    fn collect(
        &self,
        _ledger: &mut Ledger,
        _custodian: Address,
        _payer: Address,
        _amount: Decimal,
    ) -> Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FungibleToken
// ---------------------------------------------------------------------------

/// A token whose balances live in an independent token ledger.
#[derive(Debug, Clone, Copy)]
pub struct FungibleToken {
    address: Address,
}

impl FungibleToken {
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl AssetOps for FungibleToken {
    fn id(&self) -> AssetId {
        AssetId::Token(self.address)
    }

    fn decimals(&self, ledger: &Ledger) -> Result<u32> {
        Ok(ledger.token(self.address)?.decimals())
    }

    fn balance_of(&self, ledger: &Ledger, holder: Address) -> Result<Decimal> {
        Ok(ledger.token(self.address)?.balance_of(holder))
    }

    fn transfer(
        &self,
        ledger: &mut Ledger,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()> {
        ledger.token_mut(self.address)?.transfer(from, to, amount)
    }

    fn transfer_from(
        &self,
        ledger: &mut Ledger,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()> {
        ledger
            .token_mut(self.address)?
            .transfer_from(spender, owner, to, amount)
    }

    fn approve(
        &self,
        ledger: &mut Ledger,
        owner: Address,
        spender: Address,
        amount: Decimal,
    ) -> Result<()> {
        ledger.token_mut(self.address)?.approve(owner, spender, amount)
    }

    fn allowance(&self, ledger: &Ledger, owner: Address, spender: Address) -> Result<Decimal> {
        Ok(ledger.token(self.address)?.allowance(owner, spender))
    }

    fn call_value(&self, _amount: Decimal) -> Decimal {
        Decimal::ZERO
    }

    fn check_attached(&self, _declared: Decimal, attached: Decimal) -> Result<()> {
        if !attached.is_zero() {
            return Err(PaysettleError::UnexpectedNativeValue { attached });
        }
        Ok(())
    }

    fn collect(
        &self,
        ledger: &mut Ledger,
        custodian: Address,
        payer: Address,
        amount: Decimal,
    ) -> Result<()> {
        self.transfer_from(ledger, custodian, payer, custodian, amount)
    }
}
