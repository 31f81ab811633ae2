//! Settlement record: the audit artifact of a successful settlement.
//!
//! Exactly one record is emitted per successful `settle` call and none for a
//! failed one. Records form an append-only trail in the ledger event log;
//! each carries a SHA-256 [`digest`](SettlementRecord::digest) over its
//! canonical encoding so monitors can verify it without engine internals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::RECORD_DIGEST_DOMAIN;
use crate::{Address, AssetId, SettlementId};

/// Proof that a payment was settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Unique record identifier.
    pub id: SettlementId,
    /// Who paid.
    pub payer: Address,
    /// Who received the delivered funds.
    pub payee: Address,
    /// Asset the payee received.
    pub delivered_asset: AssetId,
    /// Amount the payee received.
    pub delivered_amount: Decimal,
    /// Opaque payer/payee reference bytes, verbatim from the request.
    pub memo: Vec<u8>,
    /// When the settlement completed.
    pub settled_at: DateTime<Utc>,
}

impl SettlementRecord {
    /// Build a record stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(
        payer: Address,
        payee: Address,
        delivered_asset: AssetId,
        delivered_amount: Decimal,
        memo: Vec<u8>,
    ) -> Self {
        Self {
            id: SettlementId::new(),
            payer,
            payee,
            delivered_asset,
            delivered_amount,
            memo,
            settled_at: Utc::now(),
        }
    }

    /// Canonical digest:
    /// `SHA-256(domain || id || payer || payee || asset || amount || memo_len || memo)`.
    ///
    /// The amount is hashed in its normalized string form so `7` and `7.00`
    /// digest identically.
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(RECORD_DIGEST_DOMAIN);
        hasher.update(self.id.0.as_bytes());
        hasher.update(self.payer.as_bytes());
        hasher.update(self.payee.as_bytes());
        hasher.update(self.delivered_asset.address().as_bytes());
        hasher.update(self.delivered_amount.normalize().to_string().as_bytes());
        hasher.update((self.memo.len() as u64).to_be_bytes());
        hasher.update(&self.memo);
        hasher.finalize().into()
    }

    /// Hex form of [`digest`](Self::digest).
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}
