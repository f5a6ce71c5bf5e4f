//! Engine — wires cache, scheduler, sequencer, and registry per cycle.
//!
//! All robot state lives behind one `&mut self`; concurrency is expressed
//! only through cooperative suspension (gateway calls, the settle delay,
//! timers), never through parallel execution of robot logic. Timer tasks
//! do nothing but send the robot's serial back into the engine's tick
//! channel; the engine task performs the actual cycle.
//!
//! A cycle is always: refresh (debounced) → notify fan-out → reschedule.
//! Control requests refresh, dispatch exactly one remote operation, and
//! let the next cycle observe whatever the robot did with it.

use tokio::sync::mpsc;
use tokio::time::Duration;

use robovac_domain::error::RobovacError;
use robovac_domain::event::{Event, EventType};
use robovac_domain::id::{BoundaryId, Serial};
use robovac_domain::intent::Intent;
use robovac_domain::robot::NavigationMode;

use crate::cache::StateCache;
use crate::ports::{EventPublisher, RobotGateway};
use crate::registry::Registry;
use crate::representation::{MainToggles, RoomToggles};
use crate::scheduler::{AUTO_REFRESH_SECS, RefreshMode, RefreshScheduler};
use crate::sequencer::{ActionSequencer, DispatchOutcome};

/// How long the find-me switch stays on before reverting locally,
/// independent of the remote call completing.
pub const FIND_ME_RESET_DELAY: Duration = Duration::from_secs(1);

/// The state-sync and control engine for all discovered robots.
pub struct Engine<G, P> {
    gateway: G,
    registry: Registry,
    cache: StateCache,
    scheduler: RefreshScheduler,
    sequencer: ActionSequencer,
    publisher: P,
    tick_tx: mpsc::UnboundedSender<Serial>,
    tick_rx: mpsc::UnboundedReceiver<Serial>,
}

impl<G, P> Engine<G, P>
where
    G: RobotGateway,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    /// Create an engine over a discovered registry.
    #[must_use]
    pub fn new(gateway: G, registry: Registry, mode: RefreshMode, publisher: P) -> Self {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            registry,
            cache: StateCache::default(),
            scheduler: RefreshScheduler::new(mode),
            sequencer: ActionSequencer::default(),
            publisher,
            tick_tx,
            tick_rx,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[cfg(test)]
    pub(crate) fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Run forever: one initial cycle per robot, then one cycle per timer
    /// tick. Dropped timers (aborted on re-arm) never reach the channel.
    pub async fn run(&mut self) {
        for serial in self.registry.serials() {
            self.update_cycle(&serial).await;
        }
        while let Some(serial) = self.tick_rx.recv().await {
            self.update_cycle(&serial).await;
        }
    }

    /// One full background cycle: refresh, fan out, reschedule.
    pub async fn update_cycle(&mut self, serial: &Serial) {
        let Some(unit) = self.registry.get_mut(serial) else {
            return;
        };
        self.cache.refresh(&self.gateway, unit).await;

        self.notify(serial).await;

        if let Some(unit) = self.registry.get_mut(serial) {
            self.scheduler.schedule(unit, &self.tick_tx);
        }
    }

    /// Handle one control request.
    ///
    /// The snapshot is refreshed (debounced) before the decision, the
    /// sequencer issues at most one remote operation, and in `auto` mode a
    /// fresh cleaning start re-arms background polling.
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::UnknownRobot`] for unregistered serials and
    /// [`RobovacError::RemoteOperation`] when the chosen operation fails.
    #[tracing::instrument(skip_all, fields(robot = %serial, intent = intent.name()))]
    pub async fn control(
        &mut self,
        serial: &Serial,
        intent: Intent,
    ) -> Result<DispatchOutcome, RobovacError> {
        let unit = self
            .registry
            .get_mut(serial)
            .ok_or_else(|| RobovacError::UnknownRobot(serial.clone()))?;
        self.cache.refresh(&self.gateway, unit).await;

        if matches!(intent, Intent::FindMe) {
            // The switch reverts on a local timer whether or not the
            // remote chirp goes through.
            self.spawn_find_me_reset(serial);
        }

        let unit = self
            .registry
            .get_mut(serial)
            .ok_or_else(|| RobovacError::UnknownRobot(serial.clone()))?;
        let outcome = self.sequencer.dispatch(&self.gateway, unit, intent).await?;

        if outcome == DispatchOutcome::Started && self.scheduler.mode() == RefreshMode::Auto {
            // Auto polling only runs while cleaning; kick it off so the
            // run just started gets observed.
            if let Some(unit) = self.registry.get_mut(serial) {
                self.scheduler
                    .arm(unit, Duration::from_secs(AUTO_REFRESH_SECS), &self.tick_tx);
            }
        }

        Ok(outcome)
    }

    /// Fan out one robot's state to its representations: publish the main
    /// update, start a queued room if the robot is home, then publish the
    /// room updates.
    async fn notify(&mut self, serial: &Serial) {
        let Some(outcome) = self.registry.notify(serial) else {
            return;
        };

        self.publish(outcome.main).await;

        if let Some(region) = outcome.queued {
            tracing::debug!(robot = %serial, %region, "starting cleaning of next room");
            if let Some(unit) = self.registry.get_mut(serial) {
                let intent = Intent::Start {
                    region: Some(region),
                };
                if let Err(err) = self.sequencer.dispatch(&self.gateway, unit, intent).await {
                    tracing::error!(robot = %serial, %err, "queued room clean failed");
                }
            }
        }

        for event in outcome.rooms {
            self.publish(event).await;
        }
    }

    async fn publish(&self, event: Event) {
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(%err, "failed to publish representation update");
        }
    }

    fn spawn_find_me_reset(&self, serial: &Serial) {
        let publisher = self.publisher.clone();
        let serial = serial.clone();
        tokio::spawn(async move {
            tokio::time::sleep(FIND_ME_RESET_DELAY).await;
            let event = Event::new(
                EventType::FindMeReset,
                serial,
                serde_json::json!({ "find_me": false }),
            );
            if let Err(err) = publisher.publish(event).await {
                tracing::warn!(%err, "failed to publish find-me reset");
            }
        });
    }

    /// Read the main toggle surface, refreshing the snapshot first.
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::UnknownRobot`] for unregistered serials.
    /// A failed refresh is not an error; values derive from the cached
    /// snapshot.
    pub async fn main_toggles(&mut self, serial: &Serial) -> Result<MainToggles, RobovacError> {
        let unit = self
            .registry
            .get_mut(serial)
            .ok_or_else(|| RobovacError::UnknownRobot(serial.clone()))?;
        self.cache.refresh(&self.gateway, unit).await;
        Ok(unit
            .main
            .derive(&unit.robot, &unit.snapshot, unit.dock_requested))
    }

    /// Read one room's toggle surface, refreshing the snapshot first.
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::UnknownRobot`] or
    /// [`RobovacError::UnknownRegion`] when the address does not resolve.
    pub async fn room_toggles(
        &mut self,
        serial: &Serial,
        region: &BoundaryId,
    ) -> Result<RoomToggles, RobovacError> {
        let unit = self
            .registry
            .get_mut(serial)
            .ok_or_else(|| RobovacError::UnknownRobot(serial.clone()))?;
        self.cache.refresh(&self.gateway, unit).await;
        let room = unit
            .rooms
            .iter()
            .find(|room| room.region.id == *region)
            .ok_or_else(|| RobovacError::UnknownRegion(region.clone()))?;
        Ok(room.derive(&unit.snapshot))
    }

    /// Set the eco toggle. Local only; picked up by the next clean-start.
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::UnknownRobot`] for unregistered serials.
    pub fn set_eco(&mut self, serial: &Serial, on: bool) -> Result<(), RobovacError> {
        let unit = self.unit_mut(serial)?;
        unit.snapshot.eco = on;
        tracing::debug!(robot = %unit.robot.name, on, "eco mode set");
        Ok(())
    }

    /// Set the no-go-lines toggle. Local only.
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::UnknownRobot`] for unregistered serials.
    pub fn set_no_go_lines(&mut self, serial: &Serial, on: bool) -> Result<(), RobovacError> {
        let unit = self.unit_mut(serial)?;
        unit.snapshot.no_go_lines = on;
        tracing::debug!(robot = %unit.robot.name, on, "no-go lines set");
        Ok(())
    }

    /// Set the extra-care navigation toggle. Local only.
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::UnknownRobot`] for unregistered serials.
    pub fn set_extra_care(&mut self, serial: &Serial, on: bool) -> Result<(), RobovacError> {
        let unit = self.unit_mut(serial)?;
        unit.snapshot.navigation_mode = if on {
            NavigationMode::ExtraCare
        } else {
            NavigationMode::Normal
        };
        tracing::debug!(robot = %unit.robot.name, on, "extra care navigation set");
        Ok(())
    }

    /// Set the spot width in centimeters. Local only.
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::UnknownRobot`] for unregistered serials.
    pub fn set_spot_width(&mut self, serial: &Serial, width: u16) -> Result<(), RobovacError> {
        let unit = self.unit_mut(serial)?;
        unit.snapshot.spot_width = width;
        tracing::debug!(robot = %unit.robot.name, width, "spot width set");
        Ok(())
    }

    /// Set the spot height in centimeters. Local only.
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::UnknownRobot`] for unregistered serials.
    pub fn set_spot_height(&mut self, serial: &Serial, height: u16) -> Result<(), RobovacError> {
        let unit = self.unit_mut(serial)?;
        unit.snapshot.spot_height = height;
        tracing::debug!(robot = %unit.robot.name, height, "spot height set");
        Ok(())
    }

    /// Set the spot repeat flag. Local only.
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::UnknownRobot`] for unregistered serials.
    pub fn set_spot_repeat(&mut self, serial: &Serial, on: bool) -> Result<(), RobovacError> {
        let unit = self.unit_mut(serial)?;
        unit.snapshot.spot_repeat = on;
        tracing::debug!(robot = %unit.robot.name, on, "spot repeat set");
        Ok(())
    }

    fn unit_mut(
        &mut self,
        serial: &Serial,
    ) -> Result<&mut crate::registry::RobotUnit, RobovacError> {
        self.registry
            .get_mut(serial)
            .ok_or_else(|| RobovacError::UnknownRobot(serial.clone()))
    }
}
