//! Venue directory: resolves a venue reference (an address) to an
//! implementation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use paysettle_types::{Address, PaysettleError, Result};

use crate::traits::ConversionVenue;

/// Registered venues, keyed by their address.
///
/// Registration takes `&self` so venues can be added after the directory is
/// shared with an engine.
#[derive(Default)]
pub struct VenueDirectory {
    venues: RwLock<HashMap<Address, Arc<dyn ConversionVenue>>>,
}

impl VenueDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a venue under its own address, replacing any previous one.
    pub fn register(&self, venue: Arc<dyn ConversionVenue>) {
        let address = venue.address();
        tracing::info!(venue = %address, "Registering conversion venue");
        self.venues
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address, venue);
    }

    /// Remove a venue.
    pub fn unregister(&self, address: Address) -> Option<Arc<dyn ConversionVenue>> {
        self.venues
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&address)
    }

    /// Look up a venue by address.
    ///
    /// # Errors
    /// Returns `VenueFailure` if nothing is registered at `address`.
    pub fn get(&self, address: Address) -> Result<Arc<dyn ConversionVenue>> {
        self.venues
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&address)
            .cloned()
            .ok_or_else(|| PaysettleError::venue(format!("no venue registered at {address}")))
    }

    #[must_use]
    pub fn addresses(&self) -> Vec<Address> {
        self.venues
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }
}

impl std::fmt::Debug for VenueDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VenueDirectory")
            .field("venues", &self.addresses())
            .finish()
    }
}
