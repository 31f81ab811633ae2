//! Engine events appended to the ledger event log.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, SettlementRecord};

/// Something the engine published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A settlement completed.
    ProofOfPayment(SettlementRecord),
    /// The administrator moved native funds out of engine custody.
    NativeWithdraw { amount: Decimal, to: Address },
    /// The administrator moved token funds out of engine custody.
    TokenWithdraw {
        token: Address,
        amount: Decimal,
        to: Address,
    },
    /// The administrator nominated a successor.
    AdminTransferRequested { pending_admin: Address },
    /// A new administrator took over.
    AdminClaimed {
        new_admin: Address,
        previous_admin: Address,
    },
}

impl EngineEvent {
    /// Event name as it appears in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProofOfPayment(_) => "PROOF_OF_PAYMENT",
            Self::NativeWithdraw { .. } => "NATIVE_WITHDRAW",
            Self::TokenWithdraw { .. } => "TOKEN_WITHDRAW",
            Self::AdminTransferRequested { .. } => "ADMIN_TRANSFER_REQUESTED",
            Self::AdminClaimed { .. } => "ADMIN_CLAIMED",
        }
    }

    /// The settlement record carried by this event, if any.
    #[must_use]
    pub fn as_record(&self) -> Option<&SettlementRecord> {
        match self {
            Self::ProofOfPayment(record) => Some(record),
            _ => None,
        }
    }
}

impl std::fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry in the ledger's append-only event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the log (0-based, gap-free).
    pub index: u64,
    /// The contract that emitted the event.
    pub emitter: Address,
    pub event: EngineEvent,
}
