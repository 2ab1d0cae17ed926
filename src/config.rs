//! Index configuration.
//!
//! The precision stored here is used both when locations are loaded and when
//! query corners are encoded. An index loaded at one precision and queried at
//! another loses recall silently, so the value lives in one place.
use serde::de::Error;

/// Default number of geohash characters used for indexing
pub const DEFAULT_PRECISION: usize = 15;

/// Index configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Geohash length used for stored locations and query corners
    #[serde(default = "Config::default_precision")]
    pub precision: usize,
}

impl Config {
    const fn default_precision() -> usize {
        DEFAULT_PRECISION
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        assert!(precision > 0, "Geohash precision must be greater than zero");
        self.precision = precision;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.precision == 0 {
            return Err("Geohash precision must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: Self::default_precision(),
        }
    }
}
