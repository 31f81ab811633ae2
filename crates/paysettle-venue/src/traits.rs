use paysettle_ledger::Ledger;
use paysettle_types::{Address, AssetId, Result, RoutingHints};
use rust_decimal::Decimal;

/// One conversion the engine asks a venue to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOrder {
    /// Who is trading; source funds are taken from here.
    pub trader: Address,
    pub source_asset: AssetId,
    /// Exact amount of source to convert.
    pub source_amount: Decimal,
    pub destination_asset: AssetId,
    /// Where the venue delivers the destination funds.
    pub recipient: Address,
    /// Slippage floor (destination per source). Zero disables it.
    pub min_conversion_rate: Decimal,
    /// Native value that arrived at the venue with this call.
    pub call_value: Decimal,
    pub hints: RoutingHints,
}

/// Conversion venue interface.
///
/// Each implementation wraps a concrete liquidity source. Price discovery is
/// entirely the venue's business; the engine only asks for quotes and
/// conversions.
pub trait ConversionVenue: Send + Sync {
    /// Identity of the venue; also where it holds liquidity in the ledger.
    fn address(&self) -> Address;

    /// Destination amount obtainable for `source_amount` right now.
    /// Pure query; fails if no liquidity path exists.
    fn quote(
        &self,
        ledger: &Ledger,
        source_asset: AssetId,
        source_amount: Decimal,
        destination_asset: AssetId,
    ) -> Result<Decimal>;

    /// Execute a conversion and return the destination amount delivered to
    /// `order.recipient`. Token sources are pulled from `order.trader` under
    /// an allowance; native sources arrive as `order.call_value`.
    fn convert(&self, ledger: &mut Ledger, order: &ConversionOrder) -> Result<Decimal>;
}
