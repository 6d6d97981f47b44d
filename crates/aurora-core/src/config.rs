use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Raise the default log level to debug
    #[serde(default)]
    pub debug: bool,

    /// Space-weather API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Periodic refresh settings
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Location and fallback coordinates
    #[serde(default)]
    pub location: LocationConfig,

    /// Screen geometry
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the auroras.live v1 API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client identifier sent as the `source` query parameter
    #[serde(default = "default_source")]
    pub source: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.auroras.live/v1/".to_string()
}

fn default_source() -> String {
    "pebble".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            source: default_source(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between timer-triggered refreshes
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// How long a location query may take before the fallback is used
    #[serde(default = "default_location_timeout_secs")]
    pub location_timeout_secs: u64,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_location_timeout_secs() -> u64 {
    30
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            location_timeout_secs: default_location_timeout_secs(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location_timeout_secs)
    }
}

pub const FALLBACK_LATITUDE: f64 = -37.8142678;
pub const FALLBACK_LONGITUDE: f64 = 144.9619953;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Fixed latitude reported by the configured geolocator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Fixed longitude reported by the configured geolocator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Used whenever the location query fails. Melbourne unless overridden;
    /// validation warns about an override.
    #[serde(default = "default_fallback_latitude")]
    pub fallback_latitude: f64,

    #[serde(default = "default_fallback_longitude")]
    pub fallback_longitude: f64,
}

fn default_fallback_latitude() -> f64 {
    FALLBACK_LATITUDE
}

fn default_fallback_longitude() -> f64 {
    FALLBACK_LONGITUDE
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            fallback_latitude: FALLBACK_LATITUDE,
            fallback_longitude: FALLBACK_LONGITUDE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 144,
            height: 168,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            api: ApiConfig::default(),
            refresh: RefreshConfig::default(),
            location: LocationConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, creating a default
    /// file if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, writing defaults there if
    /// the file is missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings; logging them is
    /// left to the caller, since this usually runs before logging is set up.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::validated(Self::load()?)
    }

    pub fn load_validated_from(config_path: &Path) -> Result<(Self, ValidationResult)> {
        Self::validated(Self::load_from(config_path)?)
    }

    fn validated(config: Self) -> Result<(Self, ValidationResult)> {
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.api.base_url, "api.base_url", &mut result);

        if self.api.source.trim().is_empty() {
            result.add_error("api.source", "Client source must not be empty");
        }

        if self.api.timeout_secs == 0 {
            result.add_error("api.timeout_secs", "Request timeout must be greater than 0");
        }

        if self.refresh.interval_secs == 0 {
            result.add_error(
                "refresh.interval_secs",
                "Refresh interval must be greater than 0",
            );
        } else if self.refresh.interval_secs < 30 {
            result.add_warning(
                "refresh.interval_secs",
                "Refreshing more often than every 30 seconds may be rate limited",
            );
        }

        if self.refresh.location_timeout_secs == 0 {
            result.add_error(
                "refresh.location_timeout_secs",
                "Location timeout must be greater than 0",
            );
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(long)) => {
                validate_coordinates(lat, long, "location", &mut result);
            }
            (Some(_), None) | (None, Some(_)) => {
                result.add_warning(
                    "location",
                    "Only one of latitude/longitude is set; the fallback will be used",
                );
            }
            (None, None) => {}
        }

        validate_coordinates(
            self.location.fallback_latitude,
            self.location.fallback_longitude,
            "location.fallback",
            &mut result,
        );

        if self.location.fallback_latitude != FALLBACK_LATITUDE
            || self.location.fallback_longitude != FALLBACK_LONGITUDE
        {
            result.add_warning(
                "location.fallback",
                format!(
                    "Fallback overridden to {}, {} (default is {}, {})",
                    self.location.fallback_latitude,
                    self.location.fallback_longitude,
                    FALLBACK_LATITUDE,
                    FALLBACK_LONGITUDE
                ),
            );
        }

        if self.display.width == 0 {
            result.add_error("display.width", "Display width must be greater than 0");
        }
        if self.display.height == 0 {
            result.add_error("display.height", "Display height must be greater than 0");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.query().is_some() {
                    result.add_warning(
                        field_name,
                        "Query string on the base URL is replaced on every request",
                    );
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Write the configuration as TOML, creating parent directories.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("aurora-watch");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_coordinates(lat: f64, long: f64, field: &str, result: &mut ValidationResult) {
    if !(-90.0..=90.0).contains(&lat) {
        result.add_error(
            format!("{}.latitude", field),
            format!("Latitude out of range: {}", lat),
        );
    }
    if !(-180.0..=180.0).contains(&long) {
        result.add_error(
            format!("{}.longitude", field),
            format!("Longitude out of range: {}", long),
        );
    }
}
