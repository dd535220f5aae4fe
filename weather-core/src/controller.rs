//! The load/refresh state machine behind the weather screen.
//!
//! Every trigger (mount, debounced search, units change, manual reload) ends
//! in [`WeatherLoadController::reload`], which walks permission → position →
//! target selection → fetch and publishes the outcome as a [`ViewState`].

use std::{
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::{
    config::{Config, DEFAULT_DEBOUNCE},
    debounce::Debouncer,
    error::LoadError,
    location::LocationService,
    model::{UnitsSystem, ViewState, WeatherPayload, WeatherTarget},
    provider::WeatherProvider,
};

/// Startup settings for a controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadSettings {
    pub units: UnitsSystem,
    pub debounce: Duration,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self { units: UnitsSystem::default(), debounce: DEFAULT_DEBOUNCE }
    }
}

impl From<&Config> for LoadSettings {
    fn from(config: &Config) -> Self {
        Self { units: config.units(), debounce: config.debounce() }
    }
}

/// Cheap to clone; clones share the same state.
#[derive(Debug, Clone)]
pub struct WeatherLoadController {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    provider: Arc<dyn WeatherProvider>,
    location: Arc<dyn LocationService>,
    units: Mutex<UnitsSystem>,
    query: Mutex<String>,
    /// Number of the most recently started load.
    generation: AtomicU64,
    state: watch::Sender<ViewState>,
    debouncer: Debouncer,
}

impl WeatherLoadController {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        location: Arc<dyn LocationService>,
        settings: LoadSettings,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);

        Self {
            inner: Arc::new(Inner {
                provider,
                location,
                units: Mutex::new(settings.units),
                query: Mutex::new(String::new()),
                generation: AtomicU64::new(0),
                state,
                debouncer: Debouncer::new(settings.debounce),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn view_state(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    pub fn query_text(&self) -> String {
        self.inner.query.lock().clone()
    }

    pub fn units_system(&self) -> UnitsSystem {
        *self.inner.units.lock()
    }

    /// Whether a debounced search is still waiting to fire. A search whose
    /// load has already started no longer counts.
    pub fn has_pending_search(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// First load when the screen appears.
    pub async fn mount(&self) {
        self.reload().await;
    }

    /// Store the search text and reload once typing has settled.
    ///
    /// Each call restarts the debounce window. Must be called from inside a
    /// Tokio runtime.
    pub fn set_query_text(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::trace!(query = %text, "Query text changed");
        *self.inner.query.lock() = text;

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(async move {
            if let Some(inner) = weak.upgrade() {
                WeatherLoadController { inner }.reload().await;
            }
        });
    }

    /// Back to device location, debounced like any other edit.
    pub fn clear_query(&self) {
        self.set_query_text(String::new());
    }

    /// Search now: store the text, drop any pending debounced search, reload.
    pub async fn submit_query(&self, text: impl Into<String>) {
        self.inner.debouncer.cancel();
        *self.inner.query.lock() = text.into();
        self.reload().await;
    }

    /// Switch units and reload right away.
    pub async fn set_units_system(&self, units: UnitsSystem) {
        *self.inner.units.lock() = units;
        tracing::debug!(%units, "Units system changed");
        self.reload().await;
    }

    /// Run one full load cycle.
    ///
    /// Loads may overlap. A result is published only if no newer load was
    /// started in the meantime; older results are dropped.
    pub async fn reload(&self) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_replace(ViewState::Loading);

        let query = self.query_text();
        let units = self.units_system();
        tracing::debug!(generation, query = %query, %units, "Loading weather");

        let next = match self.load(&query, units).await {
            Ok(weather) => {
                tracing::info!(generation, "Weather loaded");
                ViewState::Success { weather, units }
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Weather load failed");
                ViewState::Error { message: e.to_string() }
            }
        };

        let committed = self.inner.state.send_if_modified(|current| {
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = next;
            true
        });

        if !committed {
            tracing::debug!(generation, "Discarding result of superseded load");
        }
    }

    async fn load(&self, query: &str, units: UnitsSystem) -> Result<WeatherPayload, LoadError> {
        let permission = self.inner.location.request_foreground_permission().await?;
        if !permission.is_granted() {
            return Err(LoadError::PermissionDenied);
        }

        let position = self.inner.location.current_position().await?;
        let target = WeatherTarget::select(query, position);

        self.inner.provider.fetch(&target, units).await
    }
}
