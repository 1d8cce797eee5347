//! Configuration management for Campus Portal
//!
//! Handles environment variables and application settings.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Database URL
    pub database_url: String,

    /// Secret used to sign access tokens
    pub jwt_secret: String,

    /// Access token lifetime in hours
    pub jwt_expiry_hours: i64,

    /// Environment (development, production)
    pub environment: String,

    /// Log level
    pub log_level: String,

    /// Frontend build directory served at `/`
    pub frontend_dir: PathBuf,

    /// CORS origins (empty means allow all)
    pub cors_origins: Vec<String>,

    /// IANA time zone used for calendar day and week boundaries
    pub timezone: String,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Enable request logging
    pub enable_request_logging: bool,

    /// Seed demonstration data into an empty database at start-up
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            database_url: "sqlite:campus-portal.db".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expiry_hours: 24 * 7,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            frontend_dir: PathBuf::from("../frontend/build"),
            cors_origins: vec![],
            timezone: "UTC".to_string(),
            request_timeout: 30,
            enable_request_logging: true,
            seed_demo_data: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server configuration
        if let Ok(host) = env::var("CAMPUS_PORTAL_HOST") {
            config.host = host;
        }

        if let Ok(port) = env::var("CAMPUS_PORTAL_PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }

        // Database configuration
        if let Ok(database_url) = env::var("CAMPUS_PORTAL_DATABASE_URL") {
            config.database_url = database_url;
        }

        // Authentication
        if let Ok(jwt_secret) = env::var("CAMPUS_PORTAL_JWT_SECRET") {
            config.jwt_secret = jwt_secret;
        }

        if let Ok(expiry) = env::var("CAMPUS_PORTAL_JWT_EXPIRY_HOURS") {
            config.jwt_expiry_hours = expiry
                .parse()
                .map_err(|_| ConfigError::InvalidTokenExpiry(expiry))?;
        }

        // Environment
        if let Ok(environment) = env::var("CAMPUS_PORTAL_ENVIRONMENT") {
            config.environment = environment;
        }

        // Logging
        if let Ok(log_level) = env::var("CAMPUS_PORTAL_LOG_LEVEL") {
            config.log_level = log_level;
        }

        // Frontend directory
        if let Ok(frontend_dir) = env::var("CAMPUS_PORTAL_FRONTEND_DIR") {
            config.frontend_dir = PathBuf::from(frontend_dir);
        }

        // CORS origins
        if let Ok(cors_origins) = env::var("CAMPUS_PORTAL_CORS_ORIGINS") {
            config.cors_origins = cors_origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(timezone) = env::var("CAMPUS_PORTAL_TIMEZONE") {
            config.timezone = timezone;
        }

        // Request timeout
        if let Ok(timeout) = env::var("CAMPUS_PORTAL_REQUEST_TIMEOUT") {
            config.request_timeout = timeout
                .parse()
                .map_err(|_| ConfigError::InvalidRequestTimeout(timeout))?;
        }

        // Feature flags
        if let Ok(enable_logging) = env::var("CAMPUS_PORTAL_ENABLE_REQUEST_LOGGING") {
            config.enable_request_logging = enable_logging
                .parse()
                .map_err(|_| ConfigError::InvalidBool(enable_logging))?;
        }

        if let Ok(seed) = env::var("CAMPUS_PORTAL_SEED_DEMO_DATA") {
            config.seed_demo_data = seed.parse().map_err(|_| ConfigError::InvalidBool(seed))?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret == DEFAULT_JWT_SECRET && self.is_production() {
            return Err(ConfigError::InsecureProductionSecret);
        }

        if self.jwt_secret.len() < 16 {
            return Err(ConfigError::JwtSecretTooShort);
        }

        if self.jwt_expiry_hours <= 0 {
            return Err(ConfigError::InvalidTokenExpiry(self.jwt_expiry_hours.to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port.to_string()));
        }

        if self.database_url.is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }

        if self.timezone.parse::<Tz>().is_err() {
            return Err(ConfigError::InvalidTimezone(self.timezone.clone()));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidRequestTimeout(self.request_timeout.to_string()));
        }

        Ok(())
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Time zone for calendar computations. Falls back to UTC when the
    /// configured name does not parse, which `validate` already rejects.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }

    /// Log configuration (excluding sensitive data)
    pub fn log_config(&self) {
        info!("Configuration loaded:");
        info!("  Environment: {}", self.environment);
        info!("  Bind address: {}", self.bind_address());
        info!("  Database URL: {}", self.mask_database_url());
        info!("  Frontend directory: {:?}", self.frontend_dir);
        info!("  Log level: {}", self.log_level);
        info!("  CORS origins: {:?}", self.cors_origins);
        info!("  Time zone: {}", self.timezone);
        info!("  Token lifetime: {}h", self.jwt_expiry_hours);
        info!("  Request timeout: {}s", self.request_timeout);
        info!("  Request logging: {}", self.enable_request_logging);
        info!("  Seed demo data: {}", self.seed_demo_data);

        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("Using default JWT secret - CHANGE IN PRODUCTION!");
        }
    }

    /// Mask database URL for logging
    fn mask_database_url(&self) -> String {
        if self.database_url.starts_with("sqlite:") {
            self.database_url.clone()
        } else if let Some((scheme, _)) = self.database_url.split_once("://") {
            format!("{}://***", scheme)
        } else {
            "***".to_string()
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Invalid token expiry (hours): {0}")]
    InvalidTokenExpiry(String),

    #[error("Invalid request timeout: {0}")]
    InvalidRequestTimeout(String),

    #[error("Invalid boolean value: {0}")]
    InvalidBool(String),

    #[error("Invalid time zone: {0}")]
    InvalidTimezone(String),

    #[error("Insecure JWT secret for production environment")]
    InsecureProductionSecret,

    #[error("JWT secret too short (minimum 16 characters)")]
    JwtSecretTooShort,

    #[error("Empty database URL")]
    EmptyDatabaseUrl,
}
