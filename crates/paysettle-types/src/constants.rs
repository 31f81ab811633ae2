//! System-wide constants for the paysettle engine.

/// Decimal precision of the native asset.
pub const NATIVE_DECIMALS: u32 = 18;

/// Highest decimal precision any asset may declare.
///
/// `rust_decimal` holds at most 28 significant digits in total (a 96-bit
/// mantissa). Capping the fractional part at 18 keeps ten of them for the
/// integer part of an amount.
pub const MAX_ASSET_DECIMALS: u32 = 18;

/// Reserved address that stands for the native asset wherever an asset is
/// referenced by address.
pub const NATIVE_ASSET_SENTINEL: [u8; 20] = [0xee; 20];

/// Domain separator for settlement record digests.
pub const RECORD_DIGEST_DOMAIN: &[u8] = b"paysettle:record:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "paysettle";
