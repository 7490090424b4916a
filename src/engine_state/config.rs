//! # Streaming Configuration
//!
//! Tunables for the chunk streamer, loaded from JSON.
//!
//! ```json
//! { "render_distance": 4, "seed": 1234, "block_size": 0.5 }
//! ```
//!
//! Every field is optional. An absent `seed` is replaced by a random one when the
//! engine starts, so two unseeded runs produce different worlds.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StreamingError};

/// Environment variable naming a JSON configuration file.
pub const CONFIG_PATH_ENV: &str = "VOXEL_STREAMING_CONFIG";

/// Default render distance in chunks.
pub const DEFAULT_RENDER_DISTANCE: i32 = 6;

/// Default edge length of one block in world units.
pub const DEFAULT_BLOCK_SIZE: f32 = 1.0;

/// Chunk streaming settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamingConfig {
    /// Radius, in chunks, around the viewer that is generated and meshed.
    pub render_distance: i32,
    /// World seed; `None` picks a random one.
    pub seed: Option<u32>,
    /// Edge length of one block in world units.
    pub block_size: f32,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            render_distance: DEFAULT_RENDER_DISTANCE,
            seed: None,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl StreamingConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StreamingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref()).map_err(StreamingError::ConfigRead)?;
        Self::from_json(&json)
    }

    /// Loads the file named by [`CONFIG_PATH_ENV`], or the defaults when it is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => {
                log::info!("Loading streaming configuration from {:?}", path);
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.render_distance < 0 {
            return Err(StreamingError::InvalidConfig(format!(
                "render_distance must not be negative, got {}",
                self.render_distance
            )));
        }
        if !(self.block_size.is_finite() && self.block_size > 0.0) {
            return Err(StreamingError::InvalidConfig(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }
        Ok(())
    }

    /// The configured seed, or a freshly drawn random one.
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| fastrand::u32(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = StreamingConfig::from_json("{}").expect("valid");
        assert_eq!(config, StreamingConfig::default());
        assert_eq!(config.render_distance, 6);
        assert_eq!(config.block_size, 1.0);
        assert!(config.seed.is_none());
    }

    #[test]
    fn fields_are_read() {
        let config =
            StreamingConfig::from_json(r#"{ "render_distance": 2, "seed": 9, "block_size": 0.5 }"#)
                .expect("valid");
        assert_eq!(config.render_distance, 2);
        assert_eq!(config.resolve_seed(), 9);
        assert_eq!(config.block_size, 0.5);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            StreamingConfig::from_json(r#"{ "render_distance": -1 }"#),
            Err(StreamingError::InvalidConfig(_))
        ));
        assert!(matches!(
            StreamingConfig::from_json(r#"{ "block_size": 0.0 }"#),
            Err(StreamingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            StreamingConfig::from_json("{ render_distance: "),
            Err(StreamingError::ConfigParse(_))
        ));
        assert!(matches!(
            StreamingConfig::from_json(r#"{ "fog": true }"#),
            Err(StreamingError::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        assert!(matches!(
            StreamingConfig::from_file("/definitely/not/here.json"),
            Err(StreamingError::ConfigRead(_))
        ));
    }
}
