use config::{Config, ConfigError, Environment, File};
use crate::types::ProtocolEntry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Decoder behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Apply the Bit.sv placeholder normalisation
    pub legacy_quirks: bool,
    /// Extra protocols, decoded with the default schema.
    ///
    /// An array of `{ name, prefix }` tables: map keys would be lowercased by
    /// the config loader, and the name becomes an output key.
    #[serde(default)]
    pub extra_protocols: Vec<ProtocolEntry>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            legacy_quirks: true,
            extra_protocols: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "error".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], reading `path` instead of `./config.toml` when given.
    /// An explicit path must exist.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("config").required(false),
        };

        let config = Config::builder()
            // Start with default values
            .set_default("decoder.legacy_quirks", defaults.decoder.legacy_quirks)?
            .set_default("output.pretty", defaults.output.pretty)?
            .set_default("logging.level", defaults.logging.level)?
            .add_source(file)
            // BMAP_DECODER__LEGACY_QUIRKS=false, BMAP_LOGGING__LEVEL=debug, ...
            .add_source(
                Environment::with_prefix("BMAP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
