use serde::{Deserialize, Serialize};

/// A single resolved location reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// One weather classification entry, e.g. "Rain" with icon code "10d".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: Option<i64>,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Temperature block of the response. Values are Celsius because requests
/// always ask for the metric unit system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    pub temp_min: f64,
    pub temp_max: f64,
    #[serde(default)]
    pub pressure: Option<i32>,
    pub humidity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    #[serde(rename = "country")]
    pub country_code: String,
    /// Unix epoch seconds.
    pub sunrise: i64,
    /// Unix epoch seconds.
    pub sunset: i64,
}

/// Current weather for a location, shaped after the `/weather` JSON body so
/// the cached payload and the wire format are the same document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    #[serde(default)]
    pub coord: Option<Coordinates>,

    /// Never empty for a record produced by a successful fetch.
    #[serde(rename = "weather")]
    pub conditions: Vec<Condition>,

    #[serde(rename = "main")]
    pub readings: MainReadings,

    pub wind: Wind,

    #[serde(default)]
    pub clouds: Option<Clouds>,

    #[serde(default)]
    pub visibility: Option<i32>,

    /// Observation time, unix epoch seconds.
    #[serde(default)]
    pub dt: Option<i64>,

    pub sys: Sys,

    /// Shift in seconds from UTC at the location.
    #[serde(default)]
    pub timezone: Option<i32>,

    #[serde(rename = "name")]
    pub location_name: String,
}

impl WeatherRecord {
    pub fn to_payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_payload(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }
}

/// The five icon categories the screen knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    Clear,
    Rain,
    Storm,
    Snow,
    #[default]
    Cloud,
}

impl IconCategory {
    pub const fn all() -> &'static [IconCategory] {
        &[
            IconCategory::Clear,
            IconCategory::Rain,
            IconCategory::Storm,
            IconCategory::Snow,
            IconCategory::Cloud,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconCategory::Clear => "sunny",
            IconCategory::Rain => "rain",
            IconCategory::Storm => "storm",
            IconCategory::Snow => "snowflake",
            IconCategory::Cloud => "cloud",
        }
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Degree symbol appended to temperatures. Selecting it never converts the
/// number, which stays in Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureSymbol {
    Celsius,
    Fahrenheit,
}

impl TemperatureSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureSymbol::Celsius => "°C",
            TemperatureSymbol::Fahrenheit => "°F",
        }
    }
}

/// Display-ready fields derived from a [`WeatherRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    pub main: String,
    pub description: String,
    pub temperature: String,
    pub humidity: String,
    pub temp_min: String,
    pub temp_max: String,
    pub wind_speed: String,
    pub location_name: String,
    pub country_code: String,
    pub sunrise: String,
    pub sunset: String,
    pub icon: IconCategory,
}
