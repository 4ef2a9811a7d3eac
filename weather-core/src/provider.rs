use async_trait::async_trait;
use std::fmt::Debug;

use crate::{FetchError, config::Config, model::Coordinates, model::WeatherRecord};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Unit system requested from the API. Fixed: every temperature in a
/// [`WeatherRecord`] is Celsius.
pub const METRIC_UNIT: &str = "metric";

#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// One request for current weather at `coords`; never retried.
    async fn fetch(&self, coords: Coordinates) -> Result<WeatherRecord, FetchError>;
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(
    config: &Config,
    network: std::sync::Arc<dyn crate::network::NetworkStatus>,
) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
                 Hint: run `weather configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    OpenWeatherClient::new(config.base_url(), api_key, network)
}
