//! The ledger substrate settlement runs against.
//!
//! Holds native balances, every deployed token ledger, and the append-only
//! event log. Calls are serialized by `&mut` access; a [`Checkpoint`] taken
//! before a multi-step operation lets the caller undo every mutation made
//! since, which is how settlement gets its all-or-nothing semantics.

use std::collections::HashMap;

use paysettle_types::{
    constants, Address, AssetId, EngineEvent, LogEntry, PaysettleError, Result,
};
use rust_decimal::Decimal;

use crate::check_amount;
use crate::supply::SupplyConservation;
use crate::token::TokenLedger;

/// Saved ledger state. Restoring it discards everything that happened since.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    native: HashMap<Address, Decimal>,
    tokens: HashMap<Address, TokenLedger>,
    supply: SupplyConservation,
    event_count: usize,
}

/// In-memory ledger: native balances, token ledgers, and event log.
#[derive(Debug, Clone)]
pub struct Ledger {
    native_decimals: u32,
    native: HashMap<Address, Decimal>,
    tokens: HashMap<Address, TokenLedger>,
    supply: SupplyConservation,
    events: Vec<LogEntry>,
}

impl Ledger {
    /// Empty ledger with the default native precision.
    #[must_use]
    pub fn new() -> Self {
        Self {
            native_decimals: constants::NATIVE_DECIMALS,
            native: HashMap::new(),
            tokens: HashMap::new(),
            supply: SupplyConservation::new(),
            events: Vec::new(),
        }
    }

    /// Empty ledger with a custom native precision.
    pub fn with_native_decimals(decimals: u32) -> Result<Self> {
        check_decimals(decimals)?;
        Ok(Self {
            native_decimals: decimals,
            ..Self::new()
        })
    }

    #[must_use]
    pub fn native_decimals(&self) -> u32 {
        self.native_decimals
    }

    // ── native asset ────────────────────────────────────────────────

    #[must_use]
    pub fn native_balance(&self, holder: Address) -> Decimal {
        self.native.get(&holder).copied().unwrap_or_default()
    }

    /// Issue native value to `to` (genesis / test funding).
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the native supply would no longer fit
    /// a decimal. Nothing changes on failure.
    pub fn mint_native(&mut self, to: Address, amount: Decimal) -> Result<()> {
        check_amount(amount, self.native_decimals)?;
        let balance = self
            .native_balance(to)
            .checked_add(amount)
            .ok_or(PaysettleError::ArithmeticOverflow)?;
        self.supply.record_mint(AssetId::Native, amount)?;
        self.native.insert(to, balance);
        Ok(())
    }

    /// Move native value between holders.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `from` holds less than `amount`.
    pub fn transfer_native(&mut self, from: Address, to: Address, amount: Decimal) -> Result<()> {
        check_amount(amount, self.native_decimals)?;
        let available = self.native_balance(from);
        if available < amount {
            return Err(PaysettleError::InsufficientFunds {
                asset: AssetId::Native,
                needed: amount,
                available,
            });
        }
        self.native.insert(from, available - amount);
        *self.native.entry(to).or_default() += amount;
        Ok(())
    }

    // ── tokens ──────────────────────────────────────────────────────

    /// Deploy a new token ledger at `address`.
    pub fn deploy_token(&mut self, address: Address, symbol: &str, decimals: u32) -> Result<()> {
        check_decimals(decimals)?;
        if AssetId::from_address(address).is_native() || address.is_zero() {
            return Err(PaysettleError::invalid(format!(
                "address {address} is reserved"
            )));
        }
        if self.tokens.contains_key(&address) {
            return Err(PaysettleError::invalid(format!(
                "token already deployed at {address}"
            )));
        }
        self.tokens
            .insert(address, TokenLedger::new(address, symbol, decimals));
        tracing::debug!(token = %address, symbol, decimals, "Token deployed");
        Ok(())
    }

    pub fn token(&self, address: Address) -> Result<&TokenLedger> {
        self.tokens
            .get(&address)
            .ok_or(PaysettleError::UnknownToken(address))
    }

    pub fn token_mut(&mut self, address: Address) -> Result<&mut TokenLedger> {
        self.tokens
            .get_mut(&address)
            .ok_or(PaysettleError::UnknownToken(address))
    }

    /// Issue tokens to `to` (genesis / test funding).
    pub fn mint_token(&mut self, token: Address, to: Address, amount: Decimal) -> Result<()> {
        self.token_mut(token)?.mint(to, amount)?;
        self.supply.record_mint(AssetId::Token(token), amount)
    }

    // ── supply ──────────────────────────────────────────────────────

    /// Sum of all holders' balances of `asset`.
    pub fn total_supply(&self, asset: AssetId) -> Result<Decimal> {
        match asset {
            AssetId::Native => self
                .native
                .values()
                .try_fold(Decimal::ZERO, |acc, balance| acc.checked_add(*balance))
                .ok_or(PaysettleError::ArithmeticOverflow),
            AssetId::Token(addr) => self.token(addr)?.total_supply(),
        }
    }

    /// Check that no value of `asset` was created or destroyed.
    pub fn verify_supply(&self, asset: AssetId) -> Result<()> {
        self.supply.verify(asset, self.total_supply(asset)?)
    }

    // ── events ──────────────────────────────────────────────────────

    /// Append an event to the log and return its index.
    pub fn emit(&mut self, emitter: Address, event: EngineEvent) -> u64 {
        let index = self.events.len() as u64;
        tracing::debug!(index, emitter = %emitter, event = %event, "Event emitted");
        self.events.push(LogEntry {
            index,
            emitter,
            event,
        });
        index
    }

    #[must_use]
    pub fn events(&self) -> &[LogEntry] {
        &self.events
    }

    /// Events emitted by one contract, in order.
    pub fn events_from(&self, emitter: Address) -> impl Iterator<Item = &LogEntry> {
        self.events.iter().filter(move |e| e.emitter == emitter)
    }

    // ── atomicity ───────────────────────────────────────────────────

    /// Snapshot the current state.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            native: self.native.clone(),
            tokens: self.tokens.clone(),
            supply: self.supply.clone(),
            event_count: self.events.len(),
        }
    }

    /// Restore a snapshot, discarding every balance, allowance, and event
    /// change made after it was taken.
    pub fn revert(&mut self, checkpoint: Checkpoint) {
        self.native = checkpoint.native;
        self.tokens = checkpoint.tokens;
        self.supply = checkpoint.supply;
        self.events.truncate(checkpoint.event_count);
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

fn check_decimals(decimals: u32) -> Result<()> {
    if decimals > constants::MAX_ASSET_DECIMALS {
        return Err(PaysettleError::invalid(format!(
            "decimals {decimals} exceeds maximum {}",
            constants::MAX_ASSET_DECIMALS
        )));
    }
    Ok(())
}
