//! # paysettle-engine
//!
//! Atomic multi-asset payment settlement.
//!
//! A payer spends one asset, the payee receives another. The engine pulls
//! the source into its custody, converts as much as the payee's cap allows
//! through an external venue, delivers the result, refunds whatever was not
//! converted, and emits a single [`SettlementRecord`](paysettle_types::SettlementRecord).
//! Either all of that happens or none of it does.
//!
//! ## Components
//!
//! - [`SettlementEngine`]: the `settle` entry point and the treasury surface
//! - [`ReentrancyGuard`]: single-flight lock held for the whole settlement
//! - [`Treasury`]: administrator-only withdrawals and admin handover
//!
//! The ledger substrate and asset abstraction live in `paysettle-ledger`;
//! the venue interface lives in `paysettle-venue`.

pub mod engine;
pub mod reentrancy;
pub mod treasury;

pub use engine::SettlementEngine;
pub use reentrancy::{GuardToken, ReentrancyGuard};
pub use treasury::Treasury;
