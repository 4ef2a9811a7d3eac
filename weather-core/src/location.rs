//! Location provider adapter.
//!
//! Wraps the host's location services: checks that a provider is enabled,
//! asks for coarse and fine location grants, then waits for exactly one
//! high-accuracy fix.

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{error::LocationError, model::Coordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gps,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    CoarseLocation,
    FineLocation,
}

impl Permission {
    pub const fn required() -> &'static [Permission] {
        &[Permission::CoarseLocation, Permission::FineLocation]
    }
}

/// Outcome of a permission request as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionReport {
    pub granted: Vec<Permission>,
    pub permanently_denied: Vec<Permission>,
}

impl PermissionReport {
    pub fn all_granted() -> Self {
        Self {
            granted: Permission::required().to_vec(),
            permanently_denied: Vec::new(),
        }
    }

    pub fn are_all_granted(&self, required: &[Permission]) -> bool {
        required.iter().all(|p| self.granted.contains(p))
    }

    pub fn is_any_permanently_denied(&self) -> bool {
        !self.permanently_denied.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    HighAccuracy,
    Balanced,
}

/// Parameters for a location subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixRequest {
    pub priority: Priority,
    pub interval_ms: u64,
    pub max_updates: u32,
}

impl FixRequest {
    /// One high-accuracy update, then the subscription ends.
    pub const fn single_high_accuracy() -> Self {
        Self {
            priority: Priority::HighAccuracy,
            interval_ms: 1,
            max_updates: 1,
        }
    }
}

/// A fix as delivered by the host; fields may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawFix {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Host location services.
#[async_trait]
pub trait LocationPlatform: Send + Sync + Debug {
    fn is_provider_enabled(&self, provider: ProviderKind) -> bool;

    async fn request_permissions(&self, permissions: &[Permission]) -> PermissionReport;

    /// Deliver one fix for `request`. Errors other than `ProviderTimeout` are
    /// not expected from hosts.
    async fn request_fix(&self, request: FixRequest) -> Result<RawFix, LocationError>;
}

#[derive(Debug, Clone)]
pub struct LocationProvider {
    platform: Arc<dyn LocationPlatform>,
}

impl LocationProvider {
    pub fn new(platform: Arc<dyn LocationPlatform>) -> Self {
        Self { platform }
    }

    pub fn is_location_enabled(&self) -> bool {
        self.platform.is_provider_enabled(ProviderKind::Gps)
            || self.platform.is_provider_enabled(ProviderKind::Network)
    }

    pub async fn acquire_fix(&self, cancel: &CancellationToken) -> Result<Coordinates, LocationError> {
        if !self.is_location_enabled() {
            return Err(LocationError::LocationDisabled);
        }

        let required = Permission::required();
        let report = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(LocationError::Cancelled),
            report = self.platform.request_permissions(required) => report,
        };

        if report.is_any_permanently_denied() || !report.are_all_granted(required) {
            warn!(?report, "location permissions not granted");
            return Err(LocationError::PermissionDenied);
        }

        let fix = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(LocationError::Cancelled),
            fix = self.platform.request_fix(FixRequest::single_high_accuracy()) => fix?,
        };

        let latitude = fix.latitude.unwrap_or(0.0);
        let longitude = fix.longitude.unwrap_or(0.0);
        info!(latitude, longitude, "current location");

        Ok(Coordinates::new(latitude, longitude))
    }
}
