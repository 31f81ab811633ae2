//! Fungible token ledger.
//!
//! Tracks per-holder balances and per-(owner, spender) allowances for one
//! token. All mutations are atomic: either the full operation succeeds or
//! the ledger is unchanged.

use std::collections::HashMap;

use paysettle_types::{Address, AssetId, PaysettleError, Result};
use rust_decimal::Decimal;

use crate::check_amount;

/// Balances and allowances of a single fungible token.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    /// Address the token is deployed at.
    address: Address,
    symbol: String,
    decimals: u32,
    balances: HashMap<Address, Decimal>,
    /// Spending rights: (owner, spender) → remaining allowance.
    allowances: HashMap<(Address, Address), Decimal>,
}

impl TokenLedger {
    #[must_use]
    pub fn new(address: Address, symbol: &str, decimals: u32) -> Self {
        Self {
            address,
            symbol: symbol.to_string(),
            decimals,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    fn asset(&self) -> AssetId {
        AssetId::Token(self.address)
    }

    #[must_use]
    pub fn balance_of(&self, holder: Address) -> Decimal {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> Decimal {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Sum of all balances.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the sum does not fit a decimal.
    pub fn total_supply(&self) -> Result<Decimal> {
        self.balances
            .values()
            .try_fold(Decimal::ZERO, |acc, balance| acc.checked_add(*balance))
            .ok_or(PaysettleError::ArithmeticOverflow)
    }

    /// Create new tokens out of thin air (genesis / test funding).
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the resulting total supply would not
    /// fit a decimal. Nothing changes on failure.
    pub(crate) fn mint(&mut self, to: Address, amount: Decimal) -> Result<()> {
        check_amount(amount, self.decimals)?;
        self.total_supply()?
            .checked_add(amount)
            .ok_or(PaysettleError::ArithmeticOverflow)?;
        // bounded by the total supply checked above
        let balance = self.balance_of(to) + amount;
        self.balances.insert(to, balance);
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `from` holds less than `amount`.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Decimal) -> Result<()> {
        check_amount(amount, self.decimals)?;
        let available = self.balance_of(from);
        if available < amount {
            return Err(PaysettleError::InsufficientFunds {
                asset: self.asset(),
                needed: amount,
                available,
            });
        }
        self.balances.insert(from, available - amount);
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }

    /// Set the allowance of `spender` over `owner`'s balance. Overwrites any
    /// previous allowance; zero revokes it.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Decimal) -> Result<()> {
        check_amount(amount, self.decimals)?;
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
        Ok(())
    }

    /// `spender` moves `amount` from `owner` to `to`, consuming allowance.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if either the allowance or the owner's
    /// balance is below `amount`. Nothing changes on failure.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()> {
        check_amount(amount, self.decimals)?;
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(PaysettleError::InsufficientFunds {
                asset: self.asset(),
                needed: amount,
                available: allowed,
            });
        }
        self.transfer(owner, to, amount)?;
        self.approve(owner, spender, allowed - amount)
    }
}
