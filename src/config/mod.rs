use crate::core::{AppError, Result};
use std::env;
use std::str::FromStr;

pub mod database;
pub mod seed;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub invoicing: InvoicingConfig,
    pub inventory: InventoryConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

/// Invoice numbering and rounding
#[derive(Debug, Clone)]
pub struct InvoicingConfig {
    pub prefix: String,
    pub sequence_width: usize,
    /// Round the payable amount to a whole rupee and record the difference
    pub round_off: bool,
}

impl Default for InvoicingConfig {
    fn default() -> Self {
        Self {
            prefix: "GD".to_string(),
            sequence_width: 3,
            round_off: false,
        }
    }
}

/// Dashboard thresholds
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    pub low_stock_threshold: i32,
    pub expiry_warning_days: i64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 50,
            expiry_warning_days: 90,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

/// Read `name`, falling back to `default` when unset
pub(crate) fn env_or<T: FromStr>(name: &str, default: &str) -> Result<T> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", name)))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env_or("LOG_FORMAT", "pretty")?,
                seed_demo_data: env_or("SEED_DEMO_DATA", "true")?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            invoicing: InvoicingConfig {
                prefix: env::var("INVOICE_PREFIX").unwrap_or_else(|_| "GD".to_string()),
                sequence_width: env_or("INVOICE_SEQUENCE_WIDTH", "3")?,
                round_off: env_or("INVOICE_ROUND_OFF", "false")?,
            },
            inventory: InventoryConfig {
                low_stock_threshold: env_or("LOW_STOCK_THRESHOLD", "50")?,
                expiry_warning_days: env_or("EXPIRY_WARNING_DAYS", "90")?,
            },
            cors: CorsConfig {
                allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                    .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let prefix = self.invoicing.prefix.trim();
        if prefix.is_empty() || prefix.contains('/') {
            return Err(AppError::Configuration(
                "Invoice prefix must be non-empty and cannot contain '/'".to_string(),
            ));
        }

        if !(1..=9).contains(&self.invoicing.sequence_width) {
            return Err(AppError::Configuration(
                "Invoice sequence width must be between 1 and 9".to_string(),
            ));
        }

        if self.inventory.low_stock_threshold < 0 || self.inventory.expiry_warning_days < 0 {
            return Err(AppError::Configuration(
                "Inventory thresholds cannot be negative".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(AppError::Configuration(
                "Database pool needs at least one connection".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "Server needs at least one worker".to_string(),
            ));
        }

        Ok(())
    }
}
