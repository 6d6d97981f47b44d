//! Geolocation seam and the fixed-fallback policy.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{Coordinates, LocationError};

/// One-shot position query.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Reports the position from configuration, or `ServiceUnavailable` when
/// none is configured.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredGeolocator {
    position: Option<Coordinates>,
}

impl ConfiguredGeolocator {
    pub fn new(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        let position = match (latitude, longitude) {
            (Some(lat), Some(long)) => Some(Coordinates::new(lat, long)),
            _ => None,
        };
        Self { position }
    }

    pub fn fixed(position: Coordinates) -> Self {
        Self {
            position: Some(position),
        }
    }
}

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.position.ok_or(LocationError::ServiceUnavailable)
    }
}

/// Where the coordinates of a refresh cycle came from
#[derive(Debug, Clone)]
pub enum PositionSource {
    Located,
    Fallback(LocationError),
}

#[derive(Debug, Clone)]
pub struct ResolvedPosition {
    pub coordinates: Coordinates,
    pub source: PositionSource,
}

impl ResolvedPosition {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, PositionSource::Fallback(_))
    }
}

/// Query the geolocator once; any failure, including running past
/// `timeout`, substitutes `fallback`. Never retried.
pub async fn resolve_position(
    geolocator: &dyn Geolocator,
    fallback: Coordinates,
    timeout: Duration,
) -> ResolvedPosition {
    let result = match tokio::time::timeout(timeout, geolocator.current_position()).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout),
    };

    match result {
        Ok(coordinates) => {
            tracing::debug!("Coordinates received: {}", coordinates);
            ResolvedPosition {
                coordinates,
                source: PositionSource::Located,
            }
        }
        Err(e) => {
            tracing::info!("Error getting location ({}). Using fallback {}", e, fallback);
            ResolvedPosition {
                coordinates: fallback,
                source: PositionSource::Fallback(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Denied;

    #[async_trait]
    impl Geolocator for Denied {
        async fn current_position(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    struct Stalled;

    #[async_trait]
    impl Geolocator for Stalled {
        async fn current_position(&self) -> Result<Coordinates, LocationError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_located_position_is_used() {
        let fairbanks = Coordinates::new(64.8378, -147.7164);
        let geo = ConfiguredGeolocator::fixed(fairbanks);

        let resolved =
            resolve_position(&geo, Coordinates::FALLBACK, Duration::from_secs(1)).await;

        assert!(!resolved.is_fallback());
        assert_eq!(resolved.coordinates, fairbanks);
    }

    #[tokio::test]
    async fn test_unconfigured_falls_back() {
        let geo = ConfiguredGeolocator::new(Some(10.0), None);

        let resolved =
            resolve_position(&geo, Coordinates::FALLBACK, Duration::from_secs(1)).await;

        assert!(resolved.is_fallback());
        assert_eq!(resolved.coordinates, Coordinates::FALLBACK);
    }

    #[tokio::test]
    async fn test_denied_falls_back() {
        let resolved =
            resolve_position(&Denied, Coordinates::FALLBACK, Duration::from_secs(1)).await;

        assert!(matches!(
            resolved.source,
            PositionSource::Fallback(LocationError::PermissionDenied)
        ));
        assert_eq!(resolved.coordinates, Coordinates::FALLBACK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_query_times_out_to_fallback() {
        let resolved =
            resolve_position(&Stalled, Coordinates::FALLBACK, Duration::from_secs(30)).await;

        assert!(matches!(
            resolved.source,
            PositionSource::Fallback(LocationError::Timeout)
        ));
        assert_eq!(resolved.coordinates, Coordinates::FALLBACK);
    }
}
