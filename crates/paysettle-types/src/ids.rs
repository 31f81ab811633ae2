//! Identifiers used throughout paysettle.
//!
//! Parties, token ledgers, venues, and the engine itself are all named by a
//! 20-byte [`Address`]. Assets are named by [`AssetId`], which separates the
//! native value-bearing asset from fungible tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::constants::NATIVE_ASSET_SENTINEL;
use crate::PaysettleError;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account / contract identity, rendered as `0x`-prefixed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address. Never a valid recipient.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// First four bytes in hex, for compact log fields.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = PaysettleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits)
            .map_err(|e| PaysettleError::invalid(format!("bad address {s:?}: {e}")))?;
        let bytes: [u8; 20] = raw.try_into().map_err(|raw: Vec<u8>| {
            PaysettleError::invalid(format!("address must be 20 bytes, got {}", raw.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    /// Random address for tests. **Never use in production.**
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random::<[u8; 20]>())
    }
}

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Identifies an asset: the native value-bearing asset, or a fungible token
/// by the address of its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetId {
    /// The ledger's intrinsic asset, moved by attaching value to a call.
    Native,
    /// A token whose balances live in an independent ledger.
    Token(Address),
}

impl AssetId {
    /// Interpret an address as an asset reference. The reserved sentinel
    /// address denotes the native asset.
    #[must_use]
    pub fn from_address(address: Address) -> Self {
        if address.0 == NATIVE_ASSET_SENTINEL {
            Self::Native
        } else {
            Self::Token(address)
        }
    }

    /// The address form of this asset (the sentinel for native).
    #[must_use]
    pub fn address(&self) -> Address {
        match self {
            Self::Native => Address(NATIVE_ASSET_SENTINEL),
            Self::Token(addr) => *addr,
        }
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "NATIVE"),
            Self::Token(addr) => write!(f, "token:{}", addr.short()),
        }
    }
}

// ---------------------------------------------------------------------------
// SettlementId
// ---------------------------------------------------------------------------

/// Unique identifier for a settlement record. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SettlementId(pub Uuid);

impl SettlementId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SettlementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stl:{}", self.0)
    }
}
