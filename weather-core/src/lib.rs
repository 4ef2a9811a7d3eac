//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Location acquisition over host location services
//! - The OpenWeather current-weather client
//! - A local preference store caching the last successful response
//! - Mapping of weather records to display-ready fields
//! - The screen pipeline tying them together
//!
//! Host specifics (permissions, network status, rendering) are traits, so the
//! same pipeline runs behind the CLI, in tests, or inside another shell.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod network;
pub mod presentation;
pub mod provider;
pub mod screen;
pub mod store;

pub use config::Config;
pub use error::{ErrorKind, FetchError, HttpError, LocationError, PipelineError, StoreError};
pub use location::{LocationPlatform, LocationProvider};
pub use model::{Coordinates, DisplayModel, IconCategory, TemperatureSymbol, WeatherRecord};
pub use network::{NetworkStatus, Transport};
pub use presentation::{RenderContext, render};
pub use provider::{OpenWeatherClient, WeatherClient};
pub use screen::{AppState, DisplaySink, Notice, ScreenPhase, WeatherScreen};
pub use store::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
