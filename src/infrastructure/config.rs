use crate::domain::chart::ChartLayout;
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub youtube: YouTubeSettings,
    pub chart: ChartLayout,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct YouTubeSettings {
    pub api_base: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub debug_shape_path: Option<String>,
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    let layout = ChartLayout::default();
    Ok(builder
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("youtube.api_base", DEFAULT_API_BASE)?
        .set_default("youtube.api_key", "")?
        .set_default("youtube.timeout_secs", 10)?
        .set_default("chart.width", layout.width)?
        .set_default("chart.height", layout.height)?
        .set_default("chart.padding", layout.padding)?)
}

/// `CHANNEL_METRICS__SECTION__FIELD` overrides, read from `vars` when given
/// instead of the process environment
fn environment(vars: Option<config::Map<String, String>>) -> config::Environment {
    config::Environment::with_prefix("CHANNEL_METRICS")
        .separator("__")
        .source(vars)
}

/// An empty configured API key is replaced by `fallback_key`
fn with_key_fallback(mut app_config: AppConfig, fallback_key: Option<String>) -> AppConfig {
    if app_config.youtube.api_key.is_empty() {
        if let Some(key) = fallback_key.filter(|k| !k.is_empty()) {
            app_config.youtube.api_key = key;
        }
    }
    app_config
}

/// Load `config/app.toml` (optional) and `CHANNEL_METRICS__*` overrides.
/// The API key also falls back to the plain `KEY` variable.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(environment(None))
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    Ok(with_key_fallback(app_config, std::env::var("KEY").ok()))
}

#[cfg(test)]
fn parse_app_config(
    toml: &str,
    vars: Option<config::Map<String, String>>,
) -> anyhow::Result<AppConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .add_source(environment(Some(vars.unwrap_or_default())))
        .build()?;

    Ok(settings.try_deserialize()?)
}
