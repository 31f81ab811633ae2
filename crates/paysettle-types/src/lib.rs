//! # paysettle-types
//!
//! Shared types, errors, and configuration for the **paysettle** engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`AssetId`], [`SettlementId`]
//! - **Amount arithmetic**: [`amount`] helpers for precision-aware rounding
//! - **Request model**: [`PaymentRequest`], [`RoutingHints`]
//! - **Audit model**: [`SettlementRecord`], [`EngineEvent`], [`LogEntry`]
//! - **Configuration**: [`EngineConfig`], [`AdminConfig`]
//! - **Errors**: [`PaysettleError`] with `PS_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod amount;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod record;
pub mod request;

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use record::*;
pub use request::*;

// `amount` and `constants` are accessed by module path
// (not re-exported to avoid name collisions).
