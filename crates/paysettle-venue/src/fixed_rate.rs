//! Fixed-rate reference venue.
//!
//! Quotes every configured pair at a constant rate and settles conversions
//! out of liquidity it holds at its own address in the ledger. Useful as a
//! stand-in for a real liquidity network in integration tests and demos.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use paysettle_ledger::{asset_ops, Ledger};
use paysettle_types::{amount, Address, AssetId, PaysettleError, Result};
use rust_decimal::Decimal;

use crate::traits::{ConversionOrder, ConversionVenue};

/// Venue with a static rate table.
pub struct FixedRateVenue {
    address: Address,
    /// (source, destination) → destination units per source unit.
    rates: RwLock<HashMap<(AssetId, AssetId), Decimal>>,
}

impl FixedRateVenue {
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            rates: RwLock::new(HashMap::new()),
        }
    }

    /// Builder form of [`set_rate`](Self::set_rate).
    #[must_use]
    pub fn with_rate(self, source: AssetId, destination: AssetId, rate: Decimal) -> Self {
        self.set_rate(source, destination, rate);
        self
    }

    /// Set the rate for one direction of a pair.
    pub fn set_rate(&self, source: AssetId, destination: AssetId, rate: Decimal) {
        self.rates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((source, destination), rate);
    }

    pub fn rate(&self, source: AssetId, destination: AssetId) -> Result<Decimal> {
        self.rates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(source, destination))
            .copied()
            .ok_or_else(|| {
                PaysettleError::venue(format!("no liquidity path {source} -> {destination}"))
            })
    }

    /// How much of `asset` the venue can currently pay out.
    pub fn liquidity(&self, ledger: &Ledger, asset: AssetId) -> Result<Decimal> {
        asset_ops(asset).balance_of(ledger, self.address)
    }

    fn receive_source(&self, ledger: &mut Ledger, order: &ConversionOrder) -> Result<()> {
        let source = asset_ops(order.source_asset);
        let expected_value = source.call_value(order.source_amount);
        if order.call_value != expected_value {
            return Err(PaysettleError::venue(format!(
                "call value {} does not match expected {expected_value}",
                order.call_value
            )));
        }
        if order.source_asset.is_native() {
            return Ok(());
        }
        source.transfer_from(
            ledger,
            self.address,
            order.trader,
            self.address,
            order.source_amount,
        )
    }
}

impl ConversionVenue for FixedRateVenue {
    fn address(&self) -> Address {
        self.address
    }

    fn quote(
        &self,
        ledger: &Ledger,
        source_asset: AssetId,
        source_amount: Decimal,
        destination_asset: AssetId,
    ) -> Result<Decimal> {
        let rate = self.rate(source_asset, destination_asset)?;
        let decimals = asset_ops(destination_asset).decimals(ledger)?;
        let raw = source_amount
            .checked_mul(rate)
            .ok_or(PaysettleError::ArithmeticOverflow)?;
        Ok(amount::floor_to(raw, decimals))
    }

    fn convert(&self, ledger: &mut Ledger, order: &ConversionOrder) -> Result<Decimal> {
        let rate = self.rate(order.source_asset, order.destination_asset)?;
        if !order.min_conversion_rate.is_zero() && rate < order.min_conversion_rate {
            return Err(PaysettleError::RateFloorUnmet {
                offered: rate,
                floor: order.min_conversion_rate,
            });
        }

        let output = self.quote(
            ledger,
            order.source_asset,
            order.source_amount,
            order.destination_asset,
        )?;

        self.receive_source(ledger, order)?;

        asset_ops(order.destination_asset)
            .transfer(ledger, self.address, order.recipient, output)
            .map_err(|err| match err {
                PaysettleError::InsufficientFunds {
                    needed, available, ..
                } => PaysettleError::venue(format!(
                    "insufficient liquidity: need {needed}, have {available}"
                )),
                other => other,
            })?;

        tracing::debug!(
            venue = %self.address,
            source = %order.source_asset,
            destination = %order.destination_asset,
            input = %order.source_amount,
            output = %output,
            %rate,
            "Conversion executed"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysettle_types::RoutingHints;

    struct Fixture {
        ledger: Ledger,
        venue: FixedRateVenue,
        tok1: Address,
        tok2: Address,
        trader: Address,
    }

    fn fixture() -> Fixture {
        let mut ledger = Ledger::new();
        let tok1 = Address::random();
        let tok2 = Address::random();
        let trader = Address::random();
        let venue_addr = Address::random();
        ledger.deploy_token(tok1, "TOK1", 18).unwrap();
        ledger.deploy_token(tok2, "TOK2", 18).unwrap();
        ledger.mint_token(tok1, trader, Decimal::new(10, 0)).unwrap();
        ledger.mint_token(tok2, venue_addr, Decimal::new(100, 0)).unwrap();
        let venue = FixedRateVenue::new(venue_addr).with_rate(
            AssetId::Token(tok1),
            AssetId::Token(tok2),
            Decimal::new(4, 0),
        );
        Fixture {
            ledger,
            venue,
            tok1,
            tok2,
            trader,
        }
    }

    fn order(f: &Fixture, amount: Decimal) -> ConversionOrder {
        ConversionOrder {
            trader: f.trader,
            source_asset: AssetId::Token(f.tok1),
            source_amount: amount,
            destination_asset: AssetId::Token(f.tok2),
            recipient: f.trader,
            min_conversion_rate: Decimal::ZERO,
            call_value: Decimal::ZERO,
            hints: RoutingHints::default(),
        }
    }

    #[test]
    fn quote_applies_rate() {
        let f = fixture();
        let q = f
            .venue
            .quote(
                &f.ledger,
                AssetId::Token(f.tok1),
                Decimal::new(612, 3),
                AssetId::Token(f.tok2),
            )
            .unwrap();
        assert_eq!(q, Decimal::new(2448, 3));
    }

    #[test]
    fn quote_without_path_fails() {
        let f = fixture();
        let err = f
            .venue
            .quote(&f.ledger, AssetId::Token(f.tok2), Decimal::ONE, AssetId::Native)
            .unwrap_err();
        assert!(matches!(err, PaysettleError::VenueFailure { .. }));
    }

    #[test]
    fn convert_pulls_source_under_allowance() {
        let mut f = fixture();
        let amount = Decimal::new(2, 0);
        f.ledger
            .token_mut(f.tok1)
            .unwrap()
            .approve(f.trader, f.venue.address(), amount)
            .unwrap();
        let o = order(&f, amount);
        let out = f.venue.convert(&mut f.ledger, &o).unwrap();
        assert_eq!(out, Decimal::new(8, 0));
        assert_eq!(
            f.ledger.token(f.tok2).unwrap().balance_of(f.trader),
            Decimal::new(8, 0)
        );
        assert_eq!(
            f.venue.liquidity(&f.ledger, AssetId::Token(f.tok1)).unwrap(),
            amount
        );
    }

    #[test]
    fn convert_without_allowance_fails() {
        let mut f = fixture();
        let o = order(&f, Decimal::ONE);
        let err = f.venue.convert(&mut f.ledger, &o).unwrap_err();
        assert!(matches!(err, PaysettleError::InsufficientFunds { .. }));
    }

    #[test]
    fn convert_enforces_rate_floor() {
        let mut f = fixture();
        let mut o = order(&f, Decimal::ONE);
        o.min_conversion_rate = Decimal::new(5, 0);
        let err = f.venue.convert(&mut f.ledger, &o).unwrap_err();
        assert_eq!(
            err,
            PaysettleError::RateFloorUnmet {
                offered: Decimal::new(4, 0),
                floor: Decimal::new(5, 0),
            }
        );
    }

    #[test]
    fn convert_short_liquidity_is_venue_failure() {
        let mut f = fixture();
        f.ledger.mint_token(f.tok1, f.trader, Decimal::new(90, 0)).unwrap();
        let amount = Decimal::new(30, 0);
        f.ledger
            .token_mut(f.tok1)
            .unwrap()
            .approve(f.trader, f.venue.address(), amount)
            .unwrap();
        let o = order(&f, amount);
        let err = f.venue.convert(&mut f.ledger, &o).unwrap_err();
        assert!(err.to_string().contains("insufficient liquidity"));
    }

    #[test]
    fn native_source_requires_matching_call_value() {
        let mut f = fixture();
        f.venue
            .set_rate(AssetId::Native, AssetId::Token(f.tok2), Decimal::new(4, 0));
        let mut o = order(&f, Decimal::ONE);
        o.source_asset = AssetId::Native;
        o.call_value = Decimal::new(5, 1);
        let err = f.venue.convert(&mut f.ledger, &o).unwrap_err();
        assert!(matches!(err, PaysettleError::VenueFailure { .. }));

        o.call_value = Decimal::ONE;
        let out = f.venue.convert(&mut f.ledger, &o).unwrap();
        assert_eq!(out, Decimal::new(4, 0));
    }
}
