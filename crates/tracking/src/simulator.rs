//! Time-driven parcel movement along a route.
//!
//! [`SimulationState`] is the pure state machine: `Idle -> Running -> Stopped`,
//! with no way back to `Running`. [`ParcelSimulator`] drives it from a tokio
//! interval and reports every advance to a callback.
//!
//! Ticks for one simulator never overlap and the index only grows. A tick that
//! fires after [`ParcelSimulator::stop`] applies nothing.

use crate::{Result, TrackingError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use swiftify_geo::{Coordinate, Route};
use swiftify_telemetry::metrics;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Default cadence between position updates.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest accepted tick interval.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Lifecycle phase of a simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorPhase {
    Idle,
    Running,
    Stopped,
}

/// One step of simulated movement.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    /// Route index the parcel moved to
    pub index: usize,
    pub position: Coordinate,
    /// Percentage of the route covered, 0 to 100
    pub progress: f64,
}

/// Route position and lifecycle of a single simulated parcel.
#[derive(Debug, Clone)]
pub struct SimulationState {
    route: Route,
    current_index: usize,
    phase: SimulatorPhase,
}

impl SimulationState {
    pub fn new(route: Route) -> Self {
        Self::resuming(route, 0)
    }

    /// State positioned at `start_index`, clamped to the last route index.
    pub fn resuming(route: Route, start_index: usize) -> Self {
        let current_index = start_index.min(route.len().saturating_sub(1));
        Self {
            route,
            current_index,
            phase: SimulatorPhase::Idle,
        }
    }

    /// `Idle -> Running`. Returns true if the transition happened.
    ///
    /// Degenerate routes and routes already at their final index go
    /// straight to `Stopped`.
    pub fn start(&mut self) -> bool {
        if self.phase != SimulatorPhase::Idle {
            return false;
        }
        if !self.route.is_valid() || self.current_index >= self.last_index() {
            self.phase = SimulatorPhase::Stopped;
            return false;
        }
        self.phase = SimulatorPhase::Running;
        true
    }

    /// Moves one point along the route while running.
    ///
    /// Reaching the final point stops the state in the same step, so the
    /// update carrying 100% progress is the last one.
    pub fn advance(&mut self) -> Option<PositionUpdate> {
        if self.phase != SimulatorPhase::Running {
            return None;
        }
        if self.current_index >= self.last_index() {
            self.phase = SimulatorPhase::Stopped;
            return None;
        }

        self.current_index += 1;
        if self.current_index == self.last_index() {
            self.phase = SimulatorPhase::Stopped;
        }

        let position = *self.route.get(self.current_index)?;
        Some(PositionUpdate {
            index: self.current_index,
            position,
            progress: self.progress(),
        })
    }

    /// Any phase to `Stopped`. Returns true if the phase changed.
    pub fn stop(&mut self) -> bool {
        let changed = self.phase != SimulatorPhase::Stopped;
        self.phase = SimulatorPhase::Stopped;
        changed
    }

    pub fn phase(&self) -> SimulatorPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_position(&self) -> Option<Coordinate> {
        self.route.get(self.current_index).copied()
    }

    /// Percentage of the route covered. A single-point route counts as complete.
    pub fn progress(&self) -> f64 {
        match self.route.len() {
            0 => 0.0,
            1 => 100.0,
            len => self.current_index as f64 / (len - 1) as f64 * 100.0,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    fn last_index(&self) -> usize {
        self.route.len().saturating_sub(1)
    }
}

struct Shared {
    state: Mutex<SimulationState>,
    stopped: Notify,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SimulationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stop(&self) {
        if self.lock().stop() {
            debug!("Parcel simulator stopped");
        }
        self.stopped.notify_one();
    }
}

type UpdateCallback = Box<dyn FnMut(PositionUpdate) + Send + 'static>;

/// Drives a [`SimulationState`] on a fixed cadence.
///
/// Dropping the simulator stops it.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use swiftify_geo::{Coordinate, Route};
/// use swiftify_tracking::ParcelSimulator;
///
/// # async fn run() -> swiftify_tracking::Result<()> {
/// let route = Route::straight_line(Coordinate::new(37.77, -122.42), Coordinate::new(34.05, -118.24), 5);
/// let mut simulator = ParcelSimulator::new(route, |update| {
///     println!("{} ({:.0}%)", update.position, update.progress);
/// });
/// simulator.start(Duration::from_secs(10))?;
/// simulator.finished().await;
/// # Ok(())
/// # }
/// ```
pub struct ParcelSimulator {
    shared: Arc<Shared>,
    on_update: Option<UpdateCallback>,
    task: Option<JoinHandle<()>>,
}

impl ParcelSimulator {
    pub fn new<F>(route: Route, on_update: F) -> Self
    where
        F: FnMut(PositionUpdate) + Send + 'static,
    {
        Self::from_state(SimulationState::new(route), on_update)
    }

    /// Simulator that continues from `start_index` instead of the origin.
    pub fn resuming<F>(route: Route, start_index: usize, on_update: F) -> Self
    where
        F: FnMut(PositionUpdate) + Send + 'static,
    {
        Self::from_state(SimulationState::resuming(route, start_index), on_update)
    }

    fn from_state<F>(state: SimulationState, on_update: F) -> Self
    where
        F: FnMut(PositionUpdate) + Send + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                stopped: Notify::new(),
            }),
            on_update: Some(Box::new(on_update)),
            task: None,
        }
    }

    /// Begins ticking every `interval`. The first tick fires one interval
    /// after the call.
    ///
    /// A no-op unless the simulator is idle. Degenerate routes stop
    /// immediately without any callback.
    ///
    /// # Errors
    /// Returns [`TrackingError::NoRuntime`] when called outside a tokio runtime.
    pub fn start(&mut self, interval: Duration) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| TrackingError::NoRuntime)?;

        if !self.shared.lock().start() {
            debug!(phase = ?self.phase(), "Parcel simulator start ignored");
            return Ok(());
        }
        let Some(on_update) = self.on_update.take() else {
            return Ok(());
        };

        let period = interval.max(MIN_INTERVAL);
        info!(period_ms = period.as_millis() as u64, "Parcel simulator started");
        self.task = Some(runtime.spawn(run(Arc::clone(&self.shared), period, on_update)));
        Ok(())
    }

    /// Stops ticking. Safe to call in any phase and more than once.
    pub fn stop(&self) {
        self.shared.stop();
    }

    pub fn phase(&self) -> SimulatorPhase {
        self.shared.lock().phase()
    }

    pub fn progress(&self) -> f64 {
        self.shared.lock().progress()
    }

    pub fn current_position(&self) -> Option<Coordinate> {
        self.shared.lock().current_position()
    }

    /// A cloneable handle for stopping or inspecting the simulator elsewhere,
    /// including from inside the update callback.
    pub fn handle(&self) -> SimulationHandle {
        SimulationHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Waits until the tick task has ended. Returns immediately if never started.
    pub async fn finished(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                debug!(error = %err, "Parcel simulator task ended abnormally");
            }
        }
    }
}

impl Drop for ParcelSimulator {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

impl std::fmt::Debug for ParcelSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParcelSimulator")
            .field("phase", &self.phase())
            .field("progress", &self.progress())
            .finish_non_exhaustive()
    }
}

/// Shared control over a running [`ParcelSimulator`].
#[derive(Clone)]
pub struct SimulationHandle {
    shared: Arc<Shared>,
}

impl SimulationHandle {
    pub fn stop(&self) {
        self.shared.stop();
    }

    pub fn phase(&self) -> SimulatorPhase {
        self.shared.lock().phase()
    }

    pub fn progress(&self) -> f64 {
        self.shared.lock().progress()
    }
}

async fn run(shared: Arc<Shared>, period: Duration, mut on_update: UpdateCallback) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = shared.stopped.notified() => break,
            _ = ticker.tick() => {
                // Release the lock before the callback so it may call stop()
                let (update, finished) = {
                    let mut state = shared.lock();
                    let update = state.advance();
                    (update, state.phase() == SimulatorPhase::Stopped)
                };

                if let Some(update) = update {
                    metrics().increment("simulator.ticks");
                    debug!(index = update.index, progress = update.progress, "Parcel advanced");
                    on_update(update);
                }
                if finished {
                    break;
                }
            }
        }
    }

    debug!("Parcel simulator tick loop ended");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn route(points: usize) -> Route {
        (0..points)
            .map(|i| Coordinate::new(i as f64, i as f64 * 2.0))
            .collect()
    }

    fn recorder() -> (Arc<Mutex<Vec<PositionUpdate>>>, impl FnMut(PositionUpdate) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |update| sink.lock().unwrap().push(update))
    }

    const TICK: Duration = Duration::from_millis(100);

    #[test]
    fn test_state_walks_route_and_stops_at_end() {
        let mut state = SimulationState::new(route(5));
        assert!(state.start());

        let progress: Vec<f64> = std::iter::from_fn(|| state.advance()).map(|u| u.progress).collect();
        assert_eq!(progress, vec![25.0, 50.0, 75.0, 100.0]);
        assert_eq!(state.phase(), SimulatorPhase::Stopped);
        assert_eq!(state.current_index(), 4);
        assert!(state.advance().is_none());
    }

    #[test]
    fn test_state_degenerate_route_stops_on_start() {
        for points in [0, 1] {
            let mut state = SimulationState::new(route(points));
            assert!(!state.start());
            assert_eq!(state.phase(), SimulatorPhase::Stopped);
            assert!(state.advance().is_none());
        }
    }

    #[test]
    fn test_state_cannot_restart() {
        let mut state = SimulationState::new(route(3));
        assert!(state.start());
        assert!(state.stop());
        assert!(!state.stop());
        assert!(!state.start());
        assert_eq!(state.phase(), SimulatorPhase::Stopped);
    }

    #[test]
    fn test_state_resume_clamps_index() {
        let state = SimulationState::resuming(route(4), 99);
        assert_eq!(state.current_index(), 3);
        assert_eq!(state.progress(), 100.0);

        let mut state = SimulationState::resuming(route(4), 3);
        assert!(!state.start());
        assert_eq!(state.phase(), SimulatorPhase::Stopped);
    }

    #[test]
    fn test_state_advance_idle_is_noop() {
        let mut state = SimulationState::new(route(3));
        assert!(state.advance().is_none());
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.phase(), SimulatorPhase::Idle);
    }

    #[test]
    fn test_start_outside_runtime() {
        let mut simulator = ParcelSimulator::new(route(3), |_| {});
        let err = simulator.start(TICK).unwrap_err();
        assert_eq!(err.code(), crate::TrackingErrorCode::NoRuntime);
        assert_eq!(simulator.phase(), SimulatorPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_point_route_completes_after_four_ticks() {
        let (seen, sink) = recorder();
        let mut simulator = ParcelSimulator::new(route(5), sink);
        simulator.start(TICK).unwrap();
        assert_eq!(simulator.phase(), SimulatorPhase::Running);

        time::sleep(TICK * 4 + Duration::from_millis(1)).await;
        assert_eq!(simulator.phase(), SimulatorPhase::Stopped);
        assert_eq!(simulator.progress(), 100.0);

        time::sleep(TICK * 5).await;
        simulator.finished().await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen.last().unwrap().progress, 100.0);
        assert_eq!(seen.last().unwrap().position, Coordinate::new(4.0, 8.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_callback_before_first_interval() {
        let (seen, sink) = recorder();
        let mut simulator = ParcelSimulator::new(route(3), sink);
        simulator.start(TICK).unwrap();

        time::sleep(TICK / 2).await;
        assert!(seen.lock().unwrap().is_empty());

        time::sleep(TICK).await;
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_point_route_fires_nothing() {
        let (seen, sink) = recorder();
        let mut simulator = ParcelSimulator::new(route(1), sink);
        simulator.start(TICK).unwrap();
        assert_eq!(simulator.phase(), SimulatorPhase::Stopped);

        time::sleep(TICK * 10).await;
        simulator.finished().await;
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_twice_is_noop() {
        let (seen, sink) = recorder();
        let mut simulator = ParcelSimulator::new(route(5), sink);
        simulator.start(TICK).unwrap();

        time::sleep(TICK + Duration::from_millis(1)).await;
        simulator.stop();
        simulator.stop();
        assert_eq!(simulator.phase(), SimulatorPhase::Stopped);

        time::sleep(TICK * 10).await;
        simulator.finished().await;
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_from_idle_prevents_start() {
        let (seen, sink) = recorder();
        let mut simulator = ParcelSimulator::new(route(5), sink);
        simulator.stop();
        simulator.start(TICK).unwrap();
        assert_eq!(simulator.phase(), SimulatorPhase::Stopped);

        time::sleep(TICK * 10).await;
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_is_ignored() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut simulator = ParcelSimulator::new(route(3), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        simulator.start(TICK).unwrap();
        simulator.start(Duration::from_millis(1)).unwrap();

        time::sleep(TICK * 10).await;
        simulator.finished().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_from_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut simulator = ParcelSimulator::new(route(10), |_| {});
        let handle = simulator.handle();
        simulator.on_update = Some(Box::new(move |update: PositionUpdate| {
            counter.fetch_add(1, Ordering::SeqCst);
            if update.index == 2 {
                handle.stop();
            }
        }));

        simulator.start(TICK).unwrap();
        time::sleep(TICK * 20).await;
        simulator.finished().await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(simulator.phase(), SimulatorPhase::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_continues_from_index() {
        let (seen, sink) = recorder();
        let mut simulator = ParcelSimulator::resuming(route(5), 2, sink);
        simulator.start(TICK).unwrap();

        time::sleep(TICK * 10).await;
        simulator.finished().await;

        let indices: Vec<usize> = seen.lock().unwrap().iter().map(|u| u.index).collect();
        assert_eq!(indices, vec![3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticking() {
        let (seen, sink) = recorder();
        let mut simulator = ParcelSimulator::new(route(10), sink);
        simulator.start(TICK).unwrap();
        let handle = simulator.handle();

        time::sleep(TICK + Duration::from_millis(1)).await;
        drop(simulator);
        assert_eq!(handle.phase(), SimulatorPhase::Stopped);

        time::sleep(TICK * 10).await;
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
