//! Error taxonomy for the fetch pipeline.
//!
//! Every failure is handled where it happens (logged, turned into a notice)
//! and never retried, so each type carries a stable `log_category` used as the
//! structured `category` field in logs.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Your location provider is turned off")]
    LocationDisabled,

    #[error("Location permissions were denied")]
    PermissionDenied,

    #[error("Location provider did not deliver a fix")]
    ProviderTimeout,

    #[error("Location request was cancelled")]
    Cancelled,
}

impl LocationError {
    pub fn log_category(&self) -> &'static str {
        match self {
            LocationError::LocationDisabled => "location_disabled",
            LocationError::PermissionDenied => "permission_denied",
            LocationError::ProviderTimeout => "provider_timeout",
            LocationError::Cancelled => "cancelled",
        }
    }
}

/// Coarse classification of a non-2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    BadRequest,
    NotFound,
    Other(u16),
}

impl HttpError {
    pub fn from_status(code: u16) -> Self {
        match code {
            400 => HttpError::BadRequest,
            404 => HttpError::NotFound,
            other => HttpError::Other(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            HttpError::BadRequest => 400,
            HttpError::NotFound => 404,
            HttpError::Other(code) => *code,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            HttpError::BadRequest => "Bad connection",
            HttpError::NotFound => "Not Found",
            HttpError::Other(_) => "Generic Error",
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {}: {}", self.code(), self.describe())
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No internet connection available")]
    NoConnectivity,

    #[error("{0}")]
    Http(HttpError),

    #[error("Request failed without a response: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to decode weather response: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl FetchError {
    pub fn log_category(&self) -> &'static str {
        match self {
            FetchError::NoConnectivity => "no_connectivity",
            FetchError::Http(HttpError::BadRequest) => "http_bad_request",
            FetchError::Http(HttpError::NotFound) => "http_not_found",
            FetchError::Http(HttpError::Other(_)) => "http_generic",
            FetchError::Transport(_) => "transport",
            FetchError::Deserialization(_) => "deserialization",
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Preference store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference store is corrupt: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Weather request was cancelled")]
    Cancelled,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Location(LocationError::LocationDisabled) => ErrorKind::LocationDisabled,
            PipelineError::Location(LocationError::PermissionDenied) => ErrorKind::PermissionDenied,
            PipelineError::Location(LocationError::ProviderTimeout) => ErrorKind::ProviderTimeout,
            PipelineError::Location(LocationError::Cancelled) | PipelineError::Cancelled => {
                ErrorKind::Cancelled
            }
            PipelineError::Fetch(FetchError::NoConnectivity) => ErrorKind::NoConnectivity,
            PipelineError::Fetch(FetchError::Http(http)) => ErrorKind::Http(*http),
            PipelineError::Fetch(FetchError::Transport(_)) => ErrorKind::Transport,
            PipelineError::Fetch(FetchError::Deserialization(_)) => ErrorKind::Deserialization,
        }
    }

    pub fn log_category(&self) -> &'static str {
        match self {
            PipelineError::Location(err) => err.log_category(),
            PipelineError::Fetch(err) => err.log_category(),
            PipelineError::Cancelled => "cancelled",
        }
    }
}

/// Copyable summary of the last failure, kept in the screen state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LocationDisabled,
    PermissionDenied,
    ProviderTimeout,
    NoConnectivity,
    Http(HttpError),
    Transport,
    Deserialization,
    Cancelled,
}
