pub mod flake;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::AppConfig, dao::event_store::EventStore, error::ServiceError,
    services::notifier::FlakeNotifier,
};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state holding the installed store, the notification
/// collaborator, and the immutable runtime configuration.
pub struct AppState {
    event_store: RwLock<Option<Arc<dyn EventStore>>>,
    notifier: Arc<dyn FlakeNotifier>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application is degraded until a store backend is installed.
    pub fn new(config: AppConfig, notifier: Arc<dyn FlakeNotifier>) -> SharedState {
        Arc::new(Self {
            event_store: RwLock::new(None),
            notifier,
            config,
        })
    }

    /// Install a store backend and leave degraded mode.
    pub async fn install_event_store(&self, store: Arc<dyn EventStore>) {
        let mut guard = self.event_store.write().await;
        *guard = Some(store);
    }

    /// Obtain the installed store, or fail with the degraded-mode error.
    pub async fn require_event_store(&self) -> Result<Arc<dyn EventStore>, ServiceError> {
        let guard = self.event_store.read().await;
        guard.as_ref().cloned().ok_or(ServiceError::Degraded)
    }

    /// Whether the application currently runs without a store.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.event_store.read().await;
        guard.is_none()
    }

    /// Notification collaborator invoked on creation and flake edges.
    pub fn notifier(&self) -> Arc<dyn FlakeNotifier> {
        self.notifier.clone()
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
