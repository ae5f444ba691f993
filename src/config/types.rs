use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::store::StoreConfig;
use crate::verifiers::VerifierConfig;

/// Environment variable naming the YAML config file.
pub const CONFIG_PATH_ENV: &str = "POMODORO_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.yaml";
/// Prefix for per-key environment overrides, e.g. `POMODORO_BIND_ADDRESS`
/// or `POMODORO_STORE__URI`.
const ENV_PREFIX: &str = "POMODORO_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub verifier: VerifierConfig,
}

impl From<Config> for ConfigV1 {
    fn from(config: Config) -> Self {
        match config {
            Config::ConfigV1(c) => c,
        }
    }
}

/// Extracts a `ConfigV1` from an already assembled figment.
pub fn extract_config(figment: Figment) -> Result<ConfigV1, figment::Error> {
    figment.extract::<Config>().map(ConfigV1::from)
}

/// Load config from the YAML file named by `POMODORO_CONFIG` (default
/// `./config.yaml`), with `POMODORO_*` environment variables layered on top.
pub fn load_config() -> Result<ConfigV1, figment::Error> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let figment = Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["CONFIG"]).split("__"));
    extract_config(figment)
}

/// Render the JSON schema for the configuration.
pub fn config_schema() -> Result<String, serde_json::Error> {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema)
}
