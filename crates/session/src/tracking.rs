//! Looking up shipments and following them live.

use crate::context::SessionContext;
use crate::error::Result;
use chrono::Utc;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use swiftify_tracking::demo::demo_record;
use swiftify_tracking::{
    ParcelSimulator, PositionUpdate, ShipmentRecord, SimulationHandle, SimulatorPhase, TrackingId,
};
use tracing::{debug, info, warn};

/// Where a tracked record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Backend,
    /// Local store, typically a shipment scheduled while offline
    Local,
    /// Synthesized because no source knew the ID
    Demo,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Provenance::Backend => "backend",
            Provenance::Local => "local",
            Provenance::Demo => "demo",
        })
    }
}

/// Result of [`TrackingSession::lookup`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingLookup {
    pub record: ShipmentRecord,
    pub provenance: Provenance,
    /// Search history after this lookup, most recent first
    pub search_history: Vec<TrackingId>,
}

/// The tracking workflow
#[derive(Debug, Clone)]
pub struct TrackingSession {
    ctx: SessionContext,
}

impl TrackingSession {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// Find a shipment by ID: backend first, then the local store, then a
    /// demo record.
    ///
    /// # Errors
    /// Only a malformed ID is an error, and it is rejected before any lookup.
    pub async fn lookup(&self, raw_id: &str) -> Result<TrackingLookup> {
        let id = TrackingId::parse(raw_id)?;
        let (record, provenance) = self.find(&id).await;

        let search_history = match self.ctx.store().record_search(&id, self.ctx.history_limit()) {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Could not update search history");
                vec![id.clone()]
            }
        };

        info!(id = %id, provenance = %provenance, status = %record.status, "Shipment located");
        Ok(TrackingLookup {
            record,
            provenance,
            search_history,
        })
    }

    async fn find(&self, id: &TrackingId) -> (ShipmentRecord, Provenance) {
        if let Some(backend) = self.ctx.backend() {
            match backend.track(id).await {
                Ok(record) => return (record, Provenance::Backend),
                Err(e) if e.is_not_found() => debug!(id = %id, "Backend does not know this ID"),
                Err(e) => warn!(id = %id, error = %e, "Backend lookup failed"),
            }
        }

        match self.ctx.store().load(id) {
            Ok(Some(record)) => return (record, Provenance::Local),
            Ok(None) => {}
            Err(e) => warn!(id = %id, error = %e, "Local store lookup failed"),
        }

        (demo_record(id, Utc::now()), Provenance::Demo)
    }

    /// Tracked IDs, most recent first
    pub fn search_history(&self) -> Result<Vec<TrackingId>> {
        self.ctx.store().search_history()
    }

    pub fn clear_search_history(&self) -> Result<()> {
        self.ctx.store().clear_search_history()
    }

    /// Follow a looked-up shipment, simulating movement when it is eligible
    ///
    /// Eligible records (auto mode, in transit, routable) are advanced from
    /// their stored progress at the context's simulation interval. Each
    /// update is folded into the record before `on_update` sees it; records
    /// from the local store are saved back as they move.
    ///
    /// # Errors
    /// Fails only when called outside a tokio runtime.
    pub fn follow<F>(&self, lookup: TrackingLookup, mut on_update: F) -> Result<LiveTracking>
    where
        F: FnMut(&ShipmentRecord) + Send + 'static,
    {
        let eligible = lookup.record.is_simulation_eligible();
        let route = lookup.record.route();
        let start_index = lookup.record.resume_index();
        let record = Arc::new(Mutex::new(lookup.record));

        if !eligible {
            debug!("Shipment not eligible for simulated movement");
            return Ok(LiveTracking {
                record,
                simulator: None,
            });
        }

        let store = (lookup.provenance == Provenance::Local).then(|| Arc::clone(self.ctx.store()));
        let shared = Arc::clone(&record);
        let mut simulator = ParcelSimulator::resuming(route, start_index, move |update: PositionUpdate| {
            let snapshot = {
                let mut current = shared.lock().unwrap_or_else(PoisonError::into_inner);
                current.apply_position(&update);
                current.clone()
            };
            if let Some(store) = &store {
                if let Err(e) = store.save(&snapshot) {
                    warn!(id = %snapshot.id, error = %e, "Could not persist simulated position");
                }
            }
            on_update(&snapshot);
        });
        simulator.start(self.ctx.simulation_interval())?;

        Ok(LiveTracking {
            record,
            simulator: Some(simulator),
        })
    }
}

/// A shipment being followed; dropping it stops any simulation
pub struct LiveTracking {
    record: Arc<Mutex<ShipmentRecord>>,
    simulator: Option<ParcelSimulator>,
}

impl LiveTracking {
    /// Current state of the record
    pub fn snapshot(&self) -> ShipmentRecord {
        self.record.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_simulating(&self) -> bool {
        self.simulator
            .as_ref()
            .is_some_and(|s| s.phase() == SimulatorPhase::Running)
    }

    pub fn handle(&self) -> Option<SimulationHandle> {
        self.simulator.as_ref().map(ParcelSimulator::handle)
    }

    pub fn stop(&self) {
        if let Some(simulator) = &self.simulator {
            simulator.stop();
        }
    }

    /// Waits for the simulation to reach the destination or be stopped.
    /// Returns immediately when nothing is simulated.
    pub async fn finished(&mut self) {
        if let Some(simulator) = self.simulator.as_mut() {
            simulator.finished().await;
        }
    }
}

impl std::fmt::Debug for LiveTracking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveTracking")
            .field("simulator", &self.simulator)
            .finish_non_exhaustive()
    }
}
