use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    error::{FetchError, HttpError},
    model::{Coordinates, WeatherRecord},
    network::{NetworkStatus, is_network_available},
};

use super::{METRIC_UNIT, WeatherClient};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/";
const WEATHER_PATH: &str = "2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    weather_url: String,
    api_key: String,
    http: Client,
    network: Arc<dyn NetworkStatus>,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        network: Arc<dyn NetworkStatus>,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("weather-core/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            weather_url: format!("{}/{}", base_url.trim_end_matches('/'), WEATHER_PATH),
            api_key: api_key.to_owned(),
            http,
            network,
        })
    }

    pub fn weather_url(&self) -> &str {
        &self.weather_url
    }

    async fn fetch_current(&self, coords: Coordinates) -> Result<WeatherRecord, FetchError> {
        let res = self
            .http
            .get(&self.weather_url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("units", METRIC_UNIT.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::Transport)?;

        if !status.is_success() {
            let http = HttpError::from_status(status.as_u16());
            error!(
                category = FetchError::Http(http).log_category(),
                status = status.as_u16(),
                body = %truncate_body(&body),
                "{}",
                http
            );
            return Err(FetchError::Http(http));
        }

        let record = parse_record(&body)?;
        info!(
            location = %record.location_name,
            country = %record.sys.country_code,
            "weather response received"
        );

        Ok(record)
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch(&self, coords: Coordinates) -> Result<WeatherRecord, FetchError> {
        if !is_network_available(self.network.as_ref()) {
            return Err(FetchError::NoConnectivity);
        }

        let result = self.fetch_current(coords).await;

        match &result {
            Err(err @ FetchError::Transport(_)) => {
                error!(category = err.log_category(), "Failure: {err}");
            }
            Err(err @ FetchError::Deserialization(_)) => {
                error!(category = err.log_category(), "{err}");
            }
            _ => {}
        }

        result
    }
}

/// Decode a response body, rejecting records without any condition.
fn parse_record(body: &str) -> Result<WeatherRecord, FetchError> {
    let record = WeatherRecord::from_payload(body)?;

    if record.conditions.is_empty() {
        return Err(FetchError::Deserialization(serde::de::Error::custom(
            "response contains no weather conditions",
        )));
    }

    Ok(record)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
