//! Configuration management for the envelope codec
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (envelope.toml)
//! - Environment variables (ENVELOPE__*)
//!
//! ## Example config file (envelope.toml):
//! ```toml
//! [codec]
//! output_format = "compact"
//!
//! [registry]
//! known_types = ["ping", "pong", "order.created"]
//! suggestion_limit = 3
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::envelope::OutputFormat;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// Codec settings
    #[serde(default)]
    pub codec: CodecConfig,

    /// Registry settings for tooling
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Codec configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Output format for written envelopes (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Discriminators accepted as dynamic messages
    #[serde(default)]
    pub known_types: Vec<String>,

    /// How many "did you mean" suggestions to offer for unknown types
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

fn default_suggestion_limit() -> usize {
    3
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            known_types: Vec::new(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

impl EnvelopeConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["envelope.toml", ".envelope.toml", "config/envelope.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "envelope") {
            let xdg_config = config_dir.config_dir().join("envelope.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (ENVELOPE__*)
        builder = builder.add_source(
            Environment::with_prefix("ENVELOPE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Build a codec with every known type registered as a dynamic message
    pub fn build_codec(&self) -> Codec {
        let mut codec = Codec::from_config(&self.codec);
        for message_type in &self.registry.known_types {
            codec.register_dynamic(message_type.as_str());
        }
        codec
    }
}
