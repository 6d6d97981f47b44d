//! Refresh state machine.
//!
//! The controller owns everything the screen is drawn from: the element
//! registry, the last snapshot and the coordinates it was fetched for. The
//! network half of a cycle ([`run_cycle`]) borrows nothing from it, so it can
//! run on a spawned task while the controller stays on the event loop.

use std::time::Duration;

use aurora_api::{
    resolve_position, AuroraProvider, Coordinates, DataSnapshot, Geolocator, PositionSource,
    ResolvedPosition,
};
use aurora_core::{AppError, FeedError};
use chrono::FixedOffset;

use crate::error::RefreshError;
use crate::error_mapping::guard;
use crate::menu::{self, MenuAction, MenuOutcome};
use crate::registry::ViewRegistry;
use crate::screens::{self, ScreenLayout};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// What started a refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Startup,
    Timer,
    Manual,
}

/// Result of the location + fetch half of a cycle
#[derive(Debug)]
pub struct RefreshOutcome {
    pub trigger: RefreshTrigger,
    pub position: ResolvedPosition,
    pub result: Result<DataSnapshot, RefreshError>,
}

/// What applying an outcome did to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshReport {
    Updated {
        coordinates: Coordinates,
        fallback: bool,
    },
    Failed {
        message: String,
        /// Whether the next timer tick is likely to succeed
        transient: bool,
    },
}

impl RefreshReport {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Resolve a position (falling back on any location failure) and fetch the
/// snapshot for it.
pub async fn run_cycle(
    trigger: RefreshTrigger,
    geolocator: &dyn Geolocator,
    provider: &AuroraProvider,
    fallback: Coordinates,
    location_timeout: Duration,
) -> RefreshOutcome {
    tracing::debug!("Refresh started ({:?})", trigger);

    let position = resolve_position(geolocator, fallback, location_timeout).await;
    let result = provider
        .fetch(&position.coordinates)
        .await
        .map_err(RefreshError::from);

    RefreshOutcome {
        trigger,
        position,
        result,
    }
}

#[derive(Debug)]
pub struct RefreshController {
    state: RefreshState,
    registry: ViewRegistry,
    snapshot: Option<DataSnapshot>,
    coordinates: Option<Coordinates>,
    zone: FixedOffset,
    layout: ScreenLayout,
    fallback: Coordinates,
    location_timeout: Duration,
}

impl RefreshController {
    pub fn new(
        zone: FixedOffset,
        layout: ScreenLayout,
        fallback: Coordinates,
        location_timeout: Duration,
    ) -> Self {
        Self {
            state: RefreshState::Idle,
            registry: ViewRegistry::new(),
            snapshot: None,
            coordinates: None,
            zone,
            layout,
            fallback,
            location_timeout,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn is_refreshing(&self) -> bool {
        self.state == RefreshState::Refreshing
    }

    pub fn snapshot(&self) -> Option<&DataSnapshot> {
        self.snapshot.as_ref()
    }

    /// Coordinates of the last successful fetch
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn zone(&self) -> &FixedOffset {
        &self.zone
    }

    pub fn fallback(&self) -> Coordinates {
        self.fallback
    }

    pub fn location_timeout(&self) -> Duration {
        self.location_timeout
    }

    pub fn show_splash<S>(&mut self, surface: &mut S)
    where
        S: Surface + ?Sized,
    {
        guard(
            "splash",
            screens::show_splash(&mut self.registry, surface, &self.layout),
        );
    }

    /// Move to Refreshing. Returns `false`, leaving the state alone, when a
    /// cycle is already running.
    pub fn begin(&mut self, trigger: RefreshTrigger) -> bool {
        if self.is_refreshing() {
            tracing::debug!("Refresh already running, dropping {:?} trigger", trigger);
            return false;
        }
        self.state = RefreshState::Refreshing;
        true
    }

    /// Apply a finished cycle and return to Idle.
    ///
    /// A failed fetch leaves the snapshot, coordinates and screen untouched.
    pub fn complete<S>(&mut self, outcome: RefreshOutcome, surface: &mut S) -> RefreshReport
    where
        S: Surface + ?Sized,
    {
        self.state = RefreshState::Idle;

        let RefreshOutcome {
            trigger,
            position,
            result,
        } = outcome;

        if let PositionSource::Fallback(e) = &position.source {
            let err = AppError::from(FeedError::LocationUnavailable(e.to_string()));
            tracing::warn!("{} ({})", err.user_message(), err);
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let transient = e.is_transient();
                let err = AppError::from(e);
                if err.is_recoverable() {
                    tracing::warn!("Failed to fetch data ({:?}): {}", trigger, err);
                } else {
                    tracing::error!("Failed to fetch data ({:?}): {}", trigger, err);
                }
                return RefreshReport::Failed {
                    message: err.user_message().to_string(),
                    transient,
                };
            }
        };

        tracing::info!("Data fetched for {}", position.coordinates);

        guard("splash", screens::clear_splash(&mut self.registry, surface));

        let snapshot = self.snapshot.insert(snapshot);
        self.coordinates = Some(position.coordinates);

        guard(
            "main",
            screens::render_main_screen(
                &mut self.registry,
                surface,
                snapshot,
                &self.layout,
                &self.zone,
            ),
        );

        RefreshReport::Updated {
            coordinates: position.coordinates,
            fallback: position.is_fallback(),
        }
    }

    /// Run a whole cycle inline. Returns `None` when one is already running.
    pub async fn refresh<S>(
        &mut self,
        trigger: RefreshTrigger,
        geolocator: &dyn Geolocator,
        provider: &AuroraProvider,
        surface: &mut S,
    ) -> Option<RefreshReport>
    where
        S: Surface + ?Sized,
    {
        if !self.begin(trigger) {
            return None;
        }
        let outcome = run_cycle(
            trigger,
            geolocator,
            provider,
            self.fallback,
            self.location_timeout,
        )
        .await;
        Some(self.complete(outcome, surface))
    }

    pub fn open_menu<S>(&self, surface: &mut S)
    where
        S: Surface + ?Sized,
    {
        menu::open_main_menu(surface);
    }

    /// Handle a menu selection against the current snapshot.
    pub fn select<S>(&self, action: MenuAction, surface: &mut S) -> MenuOutcome
    where
        S: Surface + ?Sized,
    {
        menu::dispatch(action, self.snapshot.as_ref(), &self.zone, surface)
    }
}
