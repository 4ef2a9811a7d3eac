//! The weather screen: cached render on launch, then
//! location → fetch → persist → render on every refresh.
//!
//! State is never held behind shared mutable fields. Callers pass the
//! current [`AppState`] in and get a fresh one back.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    error::{ErrorKind, FetchError, LocationError, PipelineError},
    location::LocationProvider,
    model::{DisplayModel, WeatherRecord},
    presentation::{RenderContext, render},
    provider::WeatherClient,
    store::PreferenceStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenPhase {
    #[default]
    Idle,
    RenderingCached,
    AcquiringLocation,
    FetchingWeather,
    RenderingFresh,
    ShowingError,
}

/// System settings page a notice should lead the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTarget {
    LocationSource,
    AppDetails,
}

/// User-visible reaction to a failed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LocationDisabled,
    PermissionDenied,
    NoConnectivity,
    FetchFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::LocationDisabled => "Your location provider is turned off. Please turn it on.",
            Notice::PermissionDenied => "You have denied location permissions.",
            Notice::NoConnectivity => "No internet connection available.",
            Notice::FetchFailed => "Unable to fetch the current weather.",
        }
    }

    /// Explanation shown alongside a link to the app's settings page.
    pub fn rationale(&self) -> Option<&'static str> {
        match self {
            Notice::PermissionDenied => Some(
                "It looks like you have turned off permissions required for this feature. \
                 It can be enabled under Application Settings",
            ),
            _ => None,
        }
    }

    pub fn settings_target(&self) -> Option<SettingsTarget> {
        match self {
            Notice::LocationDisabled => Some(SettingsTarget::LocationSource),
            Notice::PermissionDenied => Some(SettingsTarget::AppDetails),
            Notice::NoConnectivity | Notice::FetchFailed => None,
        }
    }

    fn for_error(err: &PipelineError) -> Option<Self> {
        match err {
            PipelineError::Location(LocationError::LocationDisabled) => Some(Notice::LocationDisabled),
            PipelineError::Location(LocationError::PermissionDenied) => Some(Notice::PermissionDenied),
            PipelineError::Fetch(FetchError::NoConnectivity) => Some(Notice::NoConnectivity),
            PipelineError::Location(LocationError::ProviderTimeout) | PipelineError::Fetch(_) => {
                Some(Notice::FetchFailed)
            }
            PipelineError::Location(LocationError::Cancelled) | PipelineError::Cancelled => None,
        }
    }
}

/// UI surface driven by the screen.
pub trait DisplaySink: Send + Sync {
    fn render(&self, model: &DisplayModel);

    fn notify(&self, notice: Notice);

    fn phase_changed(&self, _phase: ScreenPhase) {}

    fn progress(&self, _visible: bool) {}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub phase: ScreenPhase,
    /// What the screen currently shows; survives failed refreshes.
    pub display: Option<DisplayModel>,
    pub last_error: Option<ErrorKind>,
}

pub struct WeatherScreen {
    location: LocationProvider,
    client: Arc<dyn WeatherClient>,
    store: Arc<dyn PreferenceStore>,
    sink: Arc<dyn DisplaySink>,
    ctx: RenderContext,
    in_flight: Mutex<()>,
}

impl WeatherScreen {
    pub fn new(
        location: LocationProvider,
        client: Arc<dyn WeatherClient>,
        store: Arc<dyn PreferenceStore>,
        sink: Arc<dyn DisplaySink>,
        ctx: RenderContext,
    ) -> Self {
        Self {
            location,
            client,
            store,
            sink,
            ctx,
            in_flight: Mutex::new(()),
        }
    }

    /// Render the cached payload, if any.
    pub fn launch(&self) -> AppState {
        self.enter(ScreenPhase::RenderingCached);
        let display = self.render_cached();
        self.enter(ScreenPhase::Idle);

        AppState {
            phase: ScreenPhase::Idle,
            display,
            last_error: None,
        }
    }

    /// Run the whole pipeline once. Never retries; a refresh requested while
    /// another is in flight returns `state` untouched.
    pub async fn refresh(&self, state: AppState, cancel: &CancellationToken) -> AppState {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("refresh already in progress");
            return state;
        };

        match self.run(cancel).await {
            Ok(model) => {
                self.enter(ScreenPhase::Idle);
                AppState {
                    phase: ScreenPhase::Idle,
                    display: Some(model),
                    last_error: None,
                }
            }
            Err(err) if err.kind() == ErrorKind::Cancelled => {
                warn!("refresh cancelled, dropping result");
                AppState {
                    phase: ScreenPhase::Idle,
                    ..state
                }
            }
            Err(err) => {
                self.enter(ScreenPhase::ShowingError);
                match &err {
                    // Logged by the client where the response was seen.
                    PipelineError::Fetch(
                        FetchError::Http(_) | FetchError::Transport(_) | FetchError::Deserialization(_),
                    ) => {}
                    _ => warn!(category = err.log_category(), "{err}"),
                }
                if let Some(notice) = Notice::for_error(&err) {
                    self.sink.notify(notice);
                }
                self.enter(ScreenPhase::Idle);

                AppState {
                    phase: ScreenPhase::Idle,
                    display: state.display,
                    last_error: Some(err.kind()),
                }
            }
        }
    }

    async fn run(&self, cancel: &CancellationToken) -> Result<DisplayModel, PipelineError> {
        self.enter(ScreenPhase::AcquiringLocation);
        let coords = self.location.acquire_fix(cancel).await?;

        self.enter(ScreenPhase::FetchingWeather);
        self.sink.progress(true);
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            fetched = self.client.fetch(coords) => fetched,
        };
        self.sink.progress(false);
        let record = fetched?;

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        self.enter(ScreenPhase::RenderingFresh);
        self.persist(&record);
        let model = render(&record, &self.ctx);
        self.sink.render(&model);

        Ok(model)
    }

    fn persist(&self, record: &WeatherRecord) {
        let saved = record
            .to_payload()
            .map_err(crate::error::StoreError::from)
            .and_then(|payload| self.store.save(&payload));

        match saved {
            Ok(()) => info!(location = %record.location_name, "weather payload cached"),
            Err(err) => error!(category = "store", "failed to cache weather payload: {err}"),
        }
    }

    fn render_cached(&self) -> Option<DisplayModel> {
        let payload = match self.store.load() {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                error!(category = "store", "failed to read cached payload: {err}");
                return None;
            }
        };

        match WeatherRecord::from_payload(&payload) {
            Ok(record) => {
                let model = render(&record, &self.ctx);
                self.sink.render(&model);
                Some(model)
            }
            Err(err) => {
                warn!(category = "store", "ignoring unreadable cached payload: {err}");
                None
            }
        }
    }

    fn enter(&self, phase: ScreenPhase) {
        self.sink.phase_changed(phase);
    }
}
