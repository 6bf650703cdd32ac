// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use crate::models::GeoPoint;
use dotenv::dotenv;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8003)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Gemini API key (search is unavailable without it)
    pub gemini_api_key: String,

    /// Model used for generateContent calls
    pub gemini_model: String,

    /// Base URL of the Generative Language API
    pub gemini_api_base: String,

    /// Sampling temperature sent with every search prompt
    pub gemini_temperature: f32,

    /// Directory holding the favorites and reviews blobs
    pub data_dir: String,

    /// Process-wide user latitude, if the host knows where it is
    pub user_latitude: Option<f64>,

    /// Process-wide user longitude
    pub user_longitude: Option<f64>,

    /// TTL for cached model replies in seconds (0 disables the cache)
    pub search_cache_ttl_seconds: u64,

    /// Searches allowed per minute across the process (0 disables limiting)
    pub search_rate_limit_per_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_address: "127.0.0.1".to_string(),
            server_port: 8003,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            gemini_api_key: String::new(),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_temperature: 0.2,
            data_dir: "./data".to_string(),
            user_latitude: None,
            user_longitude: None,
            search_cache_ttl_seconds: 0,
            search_rate_limit_per_minute: 0,
        }
    }
}

/// Parse an env var, falling back to `default` when unset or unparsable
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// Parse an optional env var; an unparsable value is logged and treated as unset
fn parse_optional<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();

        let defaults = Config::default();

        Config {
            server_address: env::var("SERVER_ADDRESS").unwrap_or(defaults.server_address),

            server_port: parse_or("SERVER_PORT", defaults.server_port),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),

            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            gemini_api_key: env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("API_KEY"))
                .unwrap_or_default(),

            gemini_model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),

            gemini_api_base: env::var("GEMINI_API_BASE").unwrap_or(defaults.gemini_api_base),

            gemini_temperature: parse_or("GEMINI_TEMPERATURE", defaults.gemini_temperature),

            data_dir: env::var("DATA_DIR").unwrap_or(defaults.data_dir),

            user_latitude: parse_optional("USER_LATITUDE"),

            user_longitude: parse_optional("USER_LONGITUDE"),

            search_cache_ttl_seconds: parse_or(
                "SEARCH_CACHE_TTL_SECONDS",
                defaults.search_cache_ttl_seconds,
            ),

            search_rate_limit_per_minute: parse_or(
                "SEARCH_RATE_LIMIT_PER_MINUTE",
                defaults.search_rate_limit_per_minute,
            ),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.trim().is_empty() {
            return Err("DATA_DIR is required".to_string());
        }

        if !(0.0..=2.0).contains(&self.gemini_temperature) {
            return Err(format!(
                "GEMINI_TEMPERATURE must be within 0.0..=2.0, got {}",
                self.gemini_temperature
            ));
        }

        if self.gemini_api_key.is_empty() {
            log::warn!("GEMINI_API_KEY not configured - search will not work");
        }

        if self.user_latitude.is_some() != self.user_longitude.is_some() {
            log::warn!("Only one of USER_LATITUDE/USER_LONGITUDE is set - ignoring location");
        }

        Ok(())
    }

    /// Resolve the process-wide user location
    /// DOCUMENTATION: Acquired once at startup; None when unavailable
    pub fn user_location(&self) -> Option<GeoPoint> {
        match (self.user_latitude, self.user_longitude) {
            (Some(latitude), Some(longitude)) => {
                let point = GeoPoint::new(latitude, longitude);
                if point.is_none() {
                    log::warn!(
                        "Configured user location ({}, {}) is out of range",
                        latitude,
                        longitude
                    );
                }
                point
            }
            _ => None,
        }
    }
}
