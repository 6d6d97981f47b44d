//! Application event loop.
//!
//! One `select!` loop owns the controller and the surface. Timer ticks and
//! commands start refresh cycles on a spawned task; the task reports back
//! through an mpsc channel and the loop applies the outcome.

use std::sync::Arc;

use aurora_api::time::{local_offset, tz_offset_minutes};
use aurora_api::{
    AuroraProvider, Coordinates, Geolocator, LocationError, PositionSource, ResolvedPosition,
};
use aurora_core::{AppError, Config};
use chrono::FixedOffset;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

use crate::controller::{run_cycle, RefreshController, RefreshOutcome, RefreshReport, RefreshTrigger};
use crate::error::RefreshError;
use crate::menu::{MenuAction, MenuOutcome};
use crate::screens::ScreenLayout;
use crate::surface::Surface;

/// Input from whatever stands in for the watch buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    OpenMenu,
    Select(MenuAction),
    Reload,
    Shutdown,
}

/// Notifications for observers of the loop
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    RefreshStarted(RefreshTrigger),
    /// A trigger arrived while a cycle was already running
    RefreshDropped(RefreshTrigger),
    Refreshed(RefreshReport),
    Menu(MenuAction, MenuOutcome),
    Stopped,
}

const EVENT_CAPACITY: usize = 32;

pub struct App<S> {
    config: Arc<Config>,
    provider: Arc<AuroraProvider>,
    geolocator: Arc<dyn Geolocator>,
    controller: RefreshController,
    surface: S,
    shutdown: CancellationToken,
    events: broadcast::Sender<AppEvent>,
}

impl<S: Surface> App<S> {
    /// Build the app for the device's current UTC offset.
    pub fn new(config: Config, geolocator: Arc<dyn Geolocator>, surface: S) -> Result<Self, AppError> {
        Self::with_zone(config, geolocator, surface, local_offset())
    }

    /// Build the app for a fixed zone. The `tz` request parameter is derived
    /// from it once and never recomputed.
    pub fn with_zone(
        config: Config,
        geolocator: Arc<dyn Geolocator>,
        surface: S,
        zone: FixedOffset,
    ) -> Result<Self, AppError> {
        let tz = tz_offset_minutes(&zone);
        tracing::info!("Timezone offset is {}", tz);

        let provider = AuroraProvider::new(
            &config.api.base_url,
            &config.api.source,
            config.api.timeout(),
            tz,
        )
        .map_err(|e| AppError::from(RefreshError::from(e)))?;

        let fallback = Coordinates::new(
            config.location.fallback_latitude,
            config.location.fallback_longitude,
        );
        let controller = RefreshController::new(
            zone,
            ScreenLayout::new(config.display.width, config.display.height),
            fallback,
            config.refresh.location_timeout(),
        );
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            config: Arc::new(config),
            provider: Arc::new(provider),
            geolocator,
            controller,
            surface,
            shutdown: CancellationToken::new(),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }

    /// Cancelling this token stops [`App::run`].
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn controller(&self) -> &RefreshController {
        &self.controller
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Show the splash, then refresh immediately and every configured
    /// interval until shutdown. Commands are handled between cycles and while
    /// one is in flight.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<AppCommand>) -> Result<(), AppError> {
        let (outcome_tx, mut outcomes) = mpsc::channel::<RefreshOutcome>(1);
        let mut in_flight: Option<JoinHandle<()>> = None;

        let mut ticker = tokio::time::interval(self.config.refresh.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut started = false;

        self.controller.show_splash(&mut self.surface);
        tracing::info!(
            "Refreshing every {}s from {}",
            self.config.refresh.interval_secs,
            self.config.api.base_url
        );

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    tracing::info!("Shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    let trigger = if started {
                        RefreshTrigger::Timer
                    } else {
                        started = true;
                        RefreshTrigger::Startup
                    };
                    if let Some(handle) = self.start_refresh(trigger, &outcome_tx) {
                        in_flight = Some(handle);
                    }
                }
                Some(outcome) = outcomes.recv() => {
                    in_flight = None;
                    let report = self.controller.complete(outcome, &mut self.surface);
                    self.emit(AppEvent::Refreshed(report));
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        tracing::debug!("Command channel closed");
                        break;
                    };
                    if command == AppCommand::Shutdown {
                        break;
                    }
                    if let Some(handle) = self.handle_command(command, &outcome_tx) {
                        in_flight = Some(handle);
                    }
                }
            }
        }

        if let Some(handle) = in_flight.take() {
            tracing::debug!("Aborting in-flight refresh");
            handle.abort();
        }
        self.emit(AppEvent::Stopped);
        Ok(())
    }

    fn handle_command(
        &mut self,
        command: AppCommand,
        outcome_tx: &mpsc::Sender<RefreshOutcome>,
    ) -> Option<JoinHandle<()>> {
        match command {
            AppCommand::OpenMenu => {
                self.controller.open_menu(&mut self.surface);
                None
            }
            AppCommand::Select(action) => {
                let outcome = self.controller.select(action, &mut self.surface);
                self.emit(AppEvent::Menu(action, outcome));
                if outcome == MenuOutcome::ReloadRequested {
                    self.start_refresh(RefreshTrigger::Manual, outcome_tx)
                } else {
                    None
                }
            }
            AppCommand::Reload => self.start_refresh(RefreshTrigger::Manual, outcome_tx),
            AppCommand::Shutdown => None,
        }
    }

    /// Spawn a cycle unless one is already running.
    fn start_refresh(
        &mut self,
        trigger: RefreshTrigger,
        outcome_tx: &mpsc::Sender<RefreshOutcome>,
    ) -> Option<JoinHandle<()>> {
        if !self.controller.begin(trigger) {
            self.emit(AppEvent::RefreshDropped(trigger));
            return None;
        }
        self.emit(AppEvent::RefreshStarted(trigger));

        let geolocator = self.geolocator.clone();
        let provider = self.provider.clone();
        let fallback = self.controller.fallback();
        let location_timeout = self.controller.location_timeout();
        let tx = outcome_tx.clone();

        Some(tokio::spawn(async move {
            // Aborting this task aborts the cycle with it.
            let work = AbortOnDropHandle::new(tokio::spawn(async move {
                run_cycle(trigger, geolocator.as_ref(), &provider, fallback, location_timeout).await
            }));

            let outcome = match work.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Refresh task failed: {}", e);
                    RefreshOutcome {
                        trigger,
                        position: ResolvedPosition {
                            coordinates: fallback,
                            source: PositionSource::Fallback(LocationError::Other(e.to_string())),
                        },
                        result: Err(RefreshError::Aborted),
                    }
                }
            };

            if tx.send(outcome).await.is_err() {
                tracing::debug!("Event loop gone, dropping refresh outcome");
            }
        }))
    }

    fn emit(&self, event: AppEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
