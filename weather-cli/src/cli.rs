use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Password, Text};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use weather_core::{
    Config, Coordinates, DisplayModel, DisplaySink, FilePreferenceStore, LocationProvider,
    OpenWeatherClient, PreferenceStore, RenderContext, Transport, WeatherRecord, WeatherScreen,
    network::StaticNetwork, provider::client_from_config, render, store::PREFERENCE_NAME,
};

use crate::host::{ConfiguredLocation, TerminalSink, region_from_lang};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for your location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key, default location and locale.
    Configure,

    /// Show cached weather, then refresh it for the current location.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        display: DisplayArgs,

        /// Behave as if no network transport were active.
        #[arg(long)]
        offline: bool,
    },

    /// Show the last cached weather without touching the network.
    Cached {
        #[command(flatten)]
        display: DisplayArgs,
    },
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Latitude of the location fix; overrides the configured location.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the location fix; overrides the configured location.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.lat?, self.lon?))
    }
}

#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// Region code used for the temperature symbol, e.g. "US".
    #[arg(long)]
    pub locale: Option<String>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                location,
                display,
                offline,
            } => {
                let config = Config::load()?;
                let store = Arc::new(open_store()?);
                let ctx = render_context(&config, &display);
                let transport = if offline { None } else { Some(Transport::Ethernet) };

                let client =
                    client_or_cached(&config, transport, store.as_ref(), &ctx, &TerminalSink)?;
                let coords = location.coordinates().or(config.location);
                let screen = WeatherScreen::new(
                    LocationProvider::new(Arc::new(ConfiguredLocation::new(coords))),
                    Arc::new(client),
                    store,
                    Arc::new(TerminalSink),
                    ctx,
                );

                let state = screen.launch();

                let cancel = CancellationToken::new();
                let on_interrupt = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        on_interrupt.cancel();
                    }
                });

                let state = screen.refresh(state, &cancel).await;
                if let Some(kind) = state.last_error {
                    info!(?kind, "refresh finished without fresh data");
                }
                Ok(())
            }
            Command::Cached { display } => {
                let config = Config::load()?;
                let store = open_store()?;

                match cached_model(&store, &render_context(&config, &display))? {
                    Some(model) => TerminalSink.render(&model),
                    None => println!("No cached weather yet. Run `weather show` first."),
                }
                Ok(())
            }
        }
    }
}

fn open_store() -> anyhow::Result<FilePreferenceStore> {
    Ok(FilePreferenceStore::new(&Config::data_dir()?, PREFERENCE_NAME))
}

fn cached_model(
    store: &dyn PreferenceStore,
    ctx: &RenderContext,
) -> anyhow::Result<Option<DisplayModel>> {
    let Some(payload) = store.load()? else {
        return Ok(None);
    };
    let record =
        WeatherRecord::from_payload(&payload).context("Cached weather payload is unreadable")?;
    Ok(Some(render(&record, ctx)))
}

/// Builds the weather client. Without a usable API key the cached weather
/// is rendered before the configuration error is returned.
fn client_or_cached(
    config: &Config,
    transport: Option<Transport>,
    store: &dyn PreferenceStore,
    ctx: &RenderContext,
    sink: &dyn DisplaySink,
) -> anyhow::Result<OpenWeatherClient> {
    client_from_config(config, Arc::new(StaticNetwork(transport))).inspect_err(|_| {
        match cached_model(store, ctx) {
            Ok(Some(model)) => sink.render(&model),
            Ok(None) => {}
            Err(err) => warn!(category = "store", "ignoring cached weather: {err:#}"),
        }
    })
}

fn render_context(config: &Config, display: &DisplayArgs) -> RenderContext {
    let locale = display
        .locale
        .clone()
        .or_else(|| config.locale.clone())
        .or_else(|| std::env::var("LANG").ok().as_deref().and_then(region_from_lang))
        .unwrap_or_default();

    RenderContext::new(locale, *Local::now().offset())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let latitude = CustomType::<f64>::new("Default latitude (Esc to skip):")
        .prompt_skippable()
        .context("Failed to read latitude")?;
    if let Some(latitude) = latitude {
        let longitude = CustomType::<f64>::new("Default longitude:")
            .prompt()
            .context("Failed to read longitude")?;
        config.location = Some(Coordinates::new(latitude, longitude));
    }

    let locale = Text::new("Locale region, e.g. US (Esc to skip):")
        .prompt_skippable()
        .context("Failed to read locale")?;
    if let Some(locale) = locale.filter(|l| !l.trim().is_empty()) {
        config.locale = Some(locale.trim().to_string());
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use weather_core::{MemoryPreferenceStore, Notice};

    const CACHED_JSON: &str = r#"{
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 20.0, "temp_min": 18.0, "temp_max": 22.5, "humidity": 40},
        "wind": {"speed": 3.0},
        "sys": {"country": "PT", "sunrise": 1700000000, "sunset": 1700032000},
        "name": "Lisbon"
    }"#;

    #[derive(Default)]
    struct CollectingSink {
        renders: Mutex<Vec<DisplayModel>>,
    }

    impl DisplaySink for CollectingSink {
        fn render(&self, model: &DisplayModel) {
            self.renders.lock().unwrap().push(model.clone());
        }

        fn notify(&self, _notice: Notice) {}
    }

    #[test]
    fn parses_show_with_coordinates() {
        let cli = Cli::try_parse_from(["weather", "show", "--lat", "59.3", "--lon", "-18.1"]).unwrap();

        match cli.command {
            Command::Show { location, offline, .. } => {
                assert_eq!(location.coordinates(), Some(Coordinates::new(59.3, -18.1)));
                assert!(!offline);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["weather", "show", "--lat", "1.0"]).is_err());
    }

    #[test]
    fn locale_flag_wins_over_config() {
        let config = Config {
            locale: Some("GB".into()),
            ..Config::default()
        };
        let display = DisplayArgs {
            locale: Some("US".into()),
        };

        assert_eq!(render_context(&config, &display).locale, "US");
    }

    #[test]
    fn config_locale_used_without_flag() {
        let config = Config {
            locale: Some("LR".into()),
            ..Config::default()
        };

        assert_eq!(render_context(&config, &DisplayArgs { locale: None }).locale, "LR");
    }

    #[test]
    fn missing_api_key_still_renders_cache() {
        let store = MemoryPreferenceStore::default();
        store.save(CACHED_JSON).unwrap();
        let sink = CollectingSink::default();

        let err = client_or_cached(
            &Config::default(),
            Some(Transport::Wifi),
            &store,
            &RenderContext::utc("PT"),
            &sink,
        )
        .unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        let renders = sink.renders.lock().unwrap();
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0].location_name, "Lisbon");
    }

    #[test]
    fn configured_key_skips_cache_render() {
        let store = MemoryPreferenceStore::default();
        store.save(CACHED_JSON).unwrap();
        let sink = CollectingSink::default();
        let mut config = Config::default();
        config.set_api_key("KEY".into());

        let client = client_or_cached(&config, None, &store, &RenderContext::utc("PT"), &sink);

        assert!(client.is_ok());
        assert!(sink.renders.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_store_has_no_cached_model() {
        let store = MemoryPreferenceStore::default();

        assert_eq!(cached_model(&store, &RenderContext::utc("")).unwrap(), None);
    }
}
