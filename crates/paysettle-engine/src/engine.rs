//! Atomic pay-with-conversion settlement.
//!
//! One `settle` call:
//! 1. Acquire the reentrancy guard
//! 2. Take the attached native value and pull the source into custody
//! 3. Identity path: deliver `min(amount, cap)`, refund the rest
//! 4. Conversion path: quote the full amount, shrink it to land on the cap
//!    if needed, convert through the venue, revoke the venue allowance
//! 5. Deliver to the payee, refund the payer, emit the settlement record
//!
//! Steps 2–5 run against a ledger checkpoint. Any failure reverts the
//! ledger to it, so a failed call leaves no balance, allowance, or event
//! behind.

use std::sync::Arc;

use paysettle_ledger::{asset_ops, AssetOps, Ledger};
use paysettle_types::{
    amount, Address, AdminConfig, EngineConfig, EngineEvent, PaymentRequest, PaysettleError,
    Result, SettlementRecord,
};
use paysettle_venue::{ConversionOrder, VenueDirectory};
use rust_decimal::Decimal;

use crate::reentrancy::ReentrancyGuard;
use crate::treasury::Treasury;

/// Source consumed and destination received by one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Outcome {
    consumed: Decimal,
    delivered: Decimal,
}

/// Settlement engine bound to one custody address.
///
/// All entry points take `&self`: a venue that holds a handle to the engine
/// can call back into it while a settlement is in flight, and the guard is
/// what refuses that nested call.
#[derive(Debug)]
pub struct SettlementEngine {
    config: EngineConfig,
    guard: ReentrancyGuard,
    treasury: Treasury,
    venues: Arc<VenueDirectory>,
}

impl SettlementEngine {
    /// Create an engine from a validated configuration.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` does not validate.
    pub fn new(config: EngineConfig, venues: Arc<VenueDirectory>) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            engine = %config.engine_address,
            admin = %config.admin,
            "Settlement engine created"
        );
        Ok(Self {
            treasury: Treasury::new(config.engine_address, config.admin),
            guard: ReentrancyGuard::new(),
            config,
            venues,
        })
    }

    /// Custody address of the engine.
    #[must_use]
    pub fn address(&self) -> Address {
        self.config.engine_address
    }

    /// Validated engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current administrator.
    #[must_use]
    pub fn admin(&self) -> Address {
        self.treasury.admin()
    }

    /// Snapshot of the administrator state, including any pending handover.
    #[must_use]
    pub fn admin_config(&self) -> AdminConfig {
        self.treasury.admin_config()
    }

    /// Venue directory conversions are routed through.
    #[must_use]
    pub fn venues(&self) -> &Arc<VenueDirectory> {
        &self.venues
    }

    /// Whether a settlement is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    /// Every settlement record this engine has emitted, oldest first.
    #[must_use]
    pub fn records<'a>(&self, ledger: &'a Ledger) -> Vec<&'a SettlementRecord> {
        ledger
            .events_from(self.address())
            .filter_map(|entry| entry.event.as_record())
            .collect()
    }

    /// Settle a payment from `payer`.
    ///
    /// `attached` is the native value that arrives with the call. For a
    /// native source it must equal `request.source_amount`; for a token
    /// source it must be zero.
    ///
    /// # Errors
    /// - `ReentrancyDetected` if a settlement is already in flight
    /// - `InvalidRequest` for negative amounts or a zero payee
    /// - `InsufficientFunds` if the attached value does not match, or the
    ///   source cannot be pulled in full
    /// - `UnexpectedNativeValue` if value is attached to a token source
    /// - `RateFloorUnmet` if the venue rate is below the request's floor
    /// - `VenueFailure` for an unknown venue or a failed conversion
    ///
    /// On error the ledger is exactly as it was before the call.
    pub fn settle(
        &self,
        ledger: &mut Ledger,
        payer: Address,
        request: &PaymentRequest,
        attached: Decimal,
    ) -> Result<SettlementRecord> {
        let _token = match self.guard.enter() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(
                    engine = %self.address(),
                    payer = %payer,
                    "Reentrant settle refused"
                );
                return Err(err);
            }
        };

        request.validate()?;
        amount::ensure_non_negative("attached", attached)?;

        tracing::debug!(
            engine = %self.address(),
            payer = %payer,
            payee = %request.payee,
            source = %request.source_asset,
            destination = %request.destination_asset,
            amount = %request.source_amount,
            cap = %request.max_destination_amount,
            "Settlement started"
        );

        let checkpoint = ledger.checkpoint();
        match self.execute(ledger, payer, request, attached) {
            Ok(record) => Ok(record),
            Err(err) => {
                ledger.revert(checkpoint);
                tracing::warn!(
                    engine = %self.address(),
                    payer = %payer,
                    error = %err,
                    "Settlement failed, ledger rolled back"
                );
                Err(err)
            }
        }
    }

    fn execute(
        &self,
        ledger: &mut Ledger,
        payer: Address,
        request: &PaymentRequest,
        attached: Decimal,
    ) -> Result<SettlementRecord> {
        let engine = self.address();
        let source = asset_ops(request.source_asset);
        let destination = asset_ops(request.destination_asset);

        source.check_attached(request.source_amount, attached)?;
        if !attached.is_zero() {
            ledger.transfer_native(payer, engine, attached)?;
        }
        source.collect(ledger, engine, payer, request.source_amount)?;

        let outcome = if request.is_identity() {
            let actual = request.source_amount.min(request.max_destination_amount);
            Outcome {
                consumed: actual,
                delivered: actual,
            }
        } else {
            self.convert(ledger, request, source.as_ref(), destination.as_ref())?
        };

        if !outcome.delivered.is_zero() {
            destination.transfer(ledger, engine, request.payee, outcome.delivered)?;
        }
        let refund = request.source_amount - outcome.consumed;
        if !refund.is_zero() {
            source.transfer(ledger, engine, payer, refund)?;
            tracing::debug!(
                engine = %engine,
                payer = %payer,
                %refund,
                "Unconverted source refunded"
            );
        }

        let record = SettlementRecord::new(
            payer,
            request.payee,
            request.destination_asset,
            outcome.delivered,
            request.memo.clone(),
        );
        ledger.emit(engine, EngineEvent::ProofOfPayment(record.clone()));

        tracing::info!(
            engine = %engine,
            settlement = %record.id,
            payer = %payer,
            payee = %request.payee,
            asset = %request.destination_asset,
            delivered = %outcome.delivered,
            consumed = %outcome.consumed,
            %refund,
            "Payment settled"
        );
        Ok(record)
    }

    /// Conversion path. Source is already in custody.
    fn convert(
        &self,
        ledger: &mut Ledger,
        request: &PaymentRequest,
        source: &dyn AssetOps,
        destination: &dyn AssetOps,
    ) -> Result<Outcome> {
        let engine = self.address();
        let venue = self.venues.get(request.venue)?;
        let venue_address = venue.address();

        let full_quote = venue.quote(
            ledger,
            request.source_asset,
            request.source_amount,
            request.destination_asset,
        )?;

        if !request.source_amount.is_zero() && !request.min_conversion_rate.is_zero() {
            let offered = amount::rate_of(request.source_amount, full_quote)?;
            if offered < request.min_conversion_rate {
                return Err(PaysettleError::RateFloorUnmet {
                    offered,
                    floor: request.min_conversion_rate,
                });
            }
        }

        let capped = full_quote > request.max_destination_amount;
        let to_convert = if capped {
            let decimals = source.decimals(ledger)?;
            amount::mul_div_floor(
                request.source_amount,
                request.max_destination_amount,
                full_quote,
                decimals,
            )?
        } else {
            request.source_amount
        };

        tracing::debug!(
            engine = %engine,
            venue = %venue_address,
            quote = %full_quote,
            %to_convert,
            capped,
            "Conversion sized"
        );

        if to_convert.is_zero() {
            return Ok(Outcome {
                consumed: Decimal::ZERO,
                delivered: Decimal::ZERO,
            });
        }

        source.approve(ledger, engine, venue_address, request.source_amount)?;

        let before = destination.balance_of(ledger, engine)?;
        let call_value = source.call_value(to_convert);
        if !call_value.is_zero() {
            ledger.transfer_native(engine, venue_address, call_value)?;
        }

        let order = ConversionOrder {
            trader: engine,
            source_asset: request.source_asset,
            source_amount: to_convert,
            destination_asset: request.destination_asset,
            recipient: engine,
            min_conversion_rate: request.min_conversion_rate,
            call_value,
            hints: request.hints.clone(),
        };
        let reported = venue.convert(ledger, &order)?;

        source.approve(ledger, engine, venue_address, Decimal::ZERO)?;

        let received = destination.balance_of(ledger, engine)? - before;
        if received != reported {
            return Err(PaysettleError::venue(format!(
                "venue reported {reported} but delivered {received}"
            )));
        }
        if received > request.max_destination_amount {
            return Err(PaysettleError::venue(format!(
                "venue delivered {received}, above cap {}",
                request.max_destination_amount
            )));
        }

        Ok(Outcome {
            consumed: to_convert,
            delivered: received,
        })
    }

    // ── treasury ────────────────────────────────────────────────────

    /// Administrator withdrawal of native funds held by the engine.
    pub fn withdraw_native(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount: Decimal,
        to: Address,
    ) -> Result<()> {
        self.treasury.withdraw_native(ledger, caller, amount, to)
    }

    /// Administrator withdrawal of `token` held by the engine.
    pub fn withdraw_token(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        token: Address,
        amount: Decimal,
        to: Address,
    ) -> Result<()> {
        self.treasury.withdraw_token(ledger, caller, token, amount, to)
    }

    pub fn transfer_admin(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        new_admin: Address,
    ) -> Result<()> {
        self.treasury.transfer_admin(ledger, caller, new_admin)
    }

    pub fn claim_admin(&self, ledger: &mut Ledger, caller: Address) -> Result<()> {
        self.treasury.claim_admin(ledger, caller)
    }

    pub fn transfer_admin_quickly(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        new_admin: Address,
    ) -> Result<()> {
        self.treasury.transfer_admin_quickly(ledger, caller, new_admin)
    }
}
