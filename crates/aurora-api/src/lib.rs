//! auroras.live client for Aurora Watch
//!
//! Provides the snapshot types, the geolocation seam with its fixed
//! fallback, and the HTTP data fetcher.

pub mod location;
pub mod provider;
pub mod time;
pub mod types;

pub use location::{resolve_position, ConfiguredGeolocator, Geolocator, PositionSource, ResolvedPosition};
pub use provider::AuroraProvider;
pub use types::*;
