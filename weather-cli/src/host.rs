//! Terminal stand-ins for the platform services the pipeline consumes.

use async_trait::async_trait;
use weather_core::{
    Coordinates, DisplayModel, DisplaySink, LocationError, LocationPlatform, Notice,
    location::{FixRequest, Permission, PermissionReport, ProviderKind, RawFix},
    screen::SettingsTarget,
};

/// Location services backed by coordinates from flags or config.
/// Without coordinates every provider reports disabled.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredLocation {
    coords: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl LocationPlatform for ConfiguredLocation {
    fn is_provider_enabled(&self, provider: ProviderKind) -> bool {
        provider == ProviderKind::Network && self.coords.is_some()
    }

    async fn request_permissions(&self, _permissions: &[Permission]) -> PermissionReport {
        PermissionReport::all_granted()
    }

    async fn request_fix(&self, _request: FixRequest) -> Result<RawFix, LocationError> {
        let coords = self.coords.ok_or(LocationError::ProviderTimeout)?;
        Ok(RawFix {
            latitude: Some(coords.latitude),
            longitude: Some(coords.longitude),
        })
    }
}

/// Prints renders and notices to the terminal.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl DisplaySink for TerminalSink {
    fn render(&self, model: &DisplayModel) {
        println!("{}", format_display(model));
    }

    fn notify(&self, notice: Notice) {
        eprintln!("{}", notice.message());
        if let Some(rationale) = notice.rationale() {
            eprintln!("{rationale}");
        }
        match notice.settings_target() {
            Some(SettingsTarget::LocationSource) => {
                eprintln!("Hint: pass --lat/--lon or run `weather configure` to set a location.")
            }
            Some(SettingsTarget::AppDetails) => {
                eprintln!("Hint: run `weather configure` to review the app settings.")
            }
            None => {}
        }
    }

    fn progress(&self, visible: bool) {
        if visible {
            eprintln!("Fetching current weather...");
        }
    }
}

pub fn format_display(model: &DisplayModel) -> String {
    format!(
        "{name}, {country}\n\
         {main} ({description}) [{icon}]\n\
         Temperature: {temp} (min {min}, max {max})\n\
         Humidity:    {humidity}\n\
         Wind speed:  {wind}\n\
         Sunrise:     {sunrise}\n\
         Sunset:      {sunset}",
        name = model.location_name,
        country = model.country_code,
        main = model.main,
        description = model.description,
        icon = model.icon,
        temp = model.temperature,
        min = model.temp_min,
        max = model.temp_max,
        humidity = model.humidity,
        wind = model.wind_speed,
        sunrise = model.sunrise,
        sunset = model.sunset,
    )
}

/// Region part of a POSIX locale: `en_US.UTF-8` → `US`.
pub fn region_from_lang(lang: &str) -> Option<String> {
    let base = lang.split(['.', '@']).next()?;
    let (_, region) = base.split_once(['_', '-'])?;
    if region.is_empty() {
        None
    } else {
        Some(region.to_string())
    }
}
