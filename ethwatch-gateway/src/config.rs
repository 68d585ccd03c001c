use anyhow::{Context, Result};
use config::{ConfigError, Environment, Map, Source, Value};
use ethwatch_connector::config::ConnectorConfig;
use ethwatch_logger::LogConfig;
use serde::Deserialize;

/// The top-level configuration for the ethwatch gateway application.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct GatewayConfig {
    #[serde(default)]
    pub connector: ConnectorConfig,
    #[serde(default)]
    pub gateway: GatewaySpecificConfig,
}

/// Contains settings that are unique to the gateway binary.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct GatewaySpecificConfig {
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Environment variables prefixed with `ETHWATCH`, nested with `__`.
///
/// Variable names only carry underscores, so `_` in a collected key is read as the `-`
/// of the kebab-case config keys: `ETHWATCH__CONNECTOR__CHAIN__RPC_URL` sets
/// `connector.chain.rpc-url`.
#[derive(Debug, Clone)]
struct KebabEnvironment(Environment);

impl Source for KebabEnvironment {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        Ok(self
            .0
            .collect()?
            .into_iter()
            .map(|(key, value)| (key.replace('_', "-"), value))
            .collect())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("ETHWATCH")
        .separator("__")
        .try_parsing(true)
}

/// Loads the gateway configuration.
///
/// The optional TOML file is layered under environment variables prefixed with
/// `ETHWATCH`, e.g. `ETHWATCH__GATEWAY__HTTP__PORT=9000`. Missing keys keep their
/// defaults.
pub fn load_config(path: Option<&str>) -> Result<GatewayConfig> {
    build_config(path, environment())
}

fn build_config(path: Option<&str>, env: Environment) -> Result<GatewayConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path));
    }
    builder = builder.add_source(KebabEnvironment(env));

    let source = path.unwrap_or("environment");
    let settings: GatewayConfig = builder
        .build()
        .context(format!("Failed to build configuration from '{}'", source))?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    Ok(settings)
}
