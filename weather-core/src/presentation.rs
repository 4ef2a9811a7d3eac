//! Maps a [`WeatherRecord`] to display-ready strings.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::model::{DisplayModel, IconCategory, TemperatureSymbol, WeatherRecord};

/// Region codes whose users get the Fahrenheit symbol.
const FAHRENHEIT_LOCALES: [&str; 3] = ["US", "LR", "MM"];

/// Device facts that influence rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub locale: String,
    pub offset: FixedOffset,
}

impl RenderContext {
    pub fn new(locale: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            locale: locale.into(),
            offset,
        }
    }

    pub fn utc(locale: impl Into<String>) -> Self {
        Self::new(locale, Utc.fix())
    }
}

pub fn temperature_symbol(locale: &str) -> TemperatureSymbol {
    if FAHRENHEIT_LOCALES.contains(&locale) {
        TemperatureSymbol::Fahrenheit
    } else {
        TemperatureSymbol::Celsius
    }
}

pub fn icon_for_code(code: &str) -> IconCategory {
    match code {
        "01d" | "01n" => IconCategory::Clear,
        "09d" | "09n" | "10d" | "10n" => IconCategory::Rain,
        "11d" | "11n" => IconCategory::Storm,
        "13d" | "13n" => IconCategory::Snow,
        _ => IconCategory::Cloud,
    }
}

/// `HH:mm` in 24-hour time at `offset`; empty for out-of-range timestamps.
pub fn format_unix_time(secs: i64, offset: &FixedOffset) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.with_timezone(offset).format("%H:%M").to_string())
        .unwrap_or_default()
}

fn format_temperature(value: f64, symbol: TemperatureSymbol) -> String {
    format!("{value:.1}{}", symbol.as_str())
}

/// Whole values keep one decimal place: `4.0`, `3.6`.
fn format_speed(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

pub fn render(record: &WeatherRecord, ctx: &RenderContext) -> DisplayModel {
    // The number stays Celsius whichever symbol is chosen.
    let symbol = temperature_symbol(&ctx.locale);

    let mut main = String::new();
    let mut description = String::new();
    let mut icon = IconCategory::default();

    // Each entry overwrites the previous one; the last condition is shown.
    for condition in &record.conditions {
        main.clone_from(&condition.main);
        description.clone_from(&condition.description);
        icon = icon_for_code(&condition.icon);
    }

    DisplayModel {
        main,
        description,
        temperature: format_temperature(record.readings.temp, symbol),
        humidity: format!("{}%", record.readings.humidity),
        temp_min: format_temperature(record.readings.temp_min, symbol),
        temp_max: format_temperature(record.readings.temp_max, symbol),
        wind_speed: format_speed(record.wind.speed),
        location_name: record.location_name.clone(),
        country_code: record.sys.country_code.clone(),
        sunrise: format_unix_time(record.sys.sunrise, &ctx.offset),
        sunset: format_unix_time(record.sys.sunset, &ctx.offset),
        icon,
    }
}
