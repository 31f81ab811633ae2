//! # paysettle-venue
//!
//! The conversion adapter the settlement engine depends on. A venue quotes
//! destination amounts and executes conversions; the engine treats it as an
//! opaque, possibly hostile, external service.
//!
//! - [`ConversionVenue`]: quote / convert interface
//! - [`VenueDirectory`]: address → venue resolution
//! - [`FixedRateVenue`]: reference venue with a static rate table

pub mod directory;
pub mod fixed_rate;
pub mod traits;

pub use directory::VenueDirectory;
pub use fixed_rate::FixedRateVenue;
pub use traits::{ConversionOrder, ConversionVenue};
