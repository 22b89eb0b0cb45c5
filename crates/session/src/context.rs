//! The collaborators shared by every workflow in one process.

use crate::admin::AdminSession;
use crate::backend::ShipmentBackend;
use crate::error::{Result, SessionError};
use crate::scheduling::SchedulingSession;
use crate::store::{FileStore, MemoryStore, ShipmentStore, DEFAULT_HISTORY_LIMIT};
use crate::tracking::TrackingSession;
use std::sync::Arc;
use std::time::Duration;
use swiftify_core::config::ConfigSchema;
use swiftify_maps::{GeocodeProvider, RouteProvider};
use swiftify_tracking::simulator::DEFAULT_INTERVAL;
use swiftify_tracking::CostEstimator;
use tracing::info;

/// Providers, store and backend handed to the scheduling, tracking and admin
/// sessions.
///
/// Built once at the top of a command and passed down; cloning is cheap.
#[derive(Clone)]
pub struct SessionContext {
    routes: RouteProvider,
    geocoder: GeocodeProvider,
    estimator: CostEstimator,
    store: Arc<dyn ShipmentStore>,
    backend: Option<Arc<dyn ShipmentBackend>>,
    simulation_interval: Duration,
    history_limit: usize,
}

impl SessionContext {
    /// Offline context over `store`: straight-line routes, no geocoding
    /// backends, no remote service.
    pub fn new(store: Arc<dyn ShipmentStore>) -> Self {
        Self {
            routes: RouteProvider::offline(),
            geocoder: GeocodeProvider::new(Vec::new()),
            estimator: CostEstimator::default(),
            store,
            backend: None,
            simulation_interval: DEFAULT_INTERVAL,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Offline context with an in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Context wired from `swiftify.toml`, storing records under
    /// `[storage].data_dir`
    pub fn from_config(
        config: &ConfigSchema,
        backend: Option<Arc<dyn ShipmentBackend>>,
    ) -> Result<Self> {
        let store = FileStore::new(&config.storage.data_dir)?;
        info!(
            data_dir = %config.storage.data_dir.display(),
            backend = backend.is_some(),
            "Session context ready"
        );

        Ok(Self {
            routes: RouteProvider::from_config(&config.routing),
            geocoder: GeocodeProvider::from_config(&config.geocoding),
            estimator: CostEstimator::from_config(&config.pricing),
            store: Arc::new(store),
            backend,
            simulation_interval: config.simulation.interval(),
            history_limit: config.storage.history_limit,
        })
    }

    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn ShipmentBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_routes(mut self, routes: RouteProvider) -> Self {
        self.routes = routes;
        self
    }

    #[must_use]
    pub fn with_geocoder(mut self, geocoder: GeocodeProvider) -> Self {
        self.geocoder = geocoder;
        self
    }

    #[must_use]
    pub fn with_estimator(mut self, estimator: CostEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    #[must_use]
    pub fn with_simulation_interval(mut self, interval: Duration) -> Self {
        self.simulation_interval = interval;
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn routes(&self) -> &RouteProvider {
        &self.routes
    }

    pub fn geocoder(&self) -> &GeocodeProvider {
        &self.geocoder
    }

    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    pub fn store(&self) -> &Arc<dyn ShipmentStore> {
        &self.store
    }

    pub fn backend(&self) -> Option<&Arc<dyn ShipmentBackend>> {
        self.backend.as_ref()
    }

    pub fn simulation_interval(&self) -> Duration {
        self.simulation_interval
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn scheduling(&self) -> SchedulingSession {
        SchedulingSession::new(self.clone())
    }

    pub fn tracking(&self) -> TrackingSession {
        TrackingSession::new(self.clone())
    }

    /// Log in as an operator. Requires a backend; the key is checked remotely.
    pub async fn admin_login(&self, key: &str) -> Result<AdminSession> {
        let backend = self.backend.clone().ok_or(SessionError::BackendRequired)?;
        let token = backend.login(key).await?;
        info!("Admin session opened");
        Ok(AdminSession::new(self.clone(), backend, token))
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("routes", &self.routes)
            .field("geocoder", &self.geocoder)
            .field("estimator", &self.estimator)
            .field("backend", &self.backend.is_some())
            .field("simulation_interval", &self.simulation_interval)
            .field("history_limit", &self.history_limit)
            .finish_non_exhaustive()
    }
}
