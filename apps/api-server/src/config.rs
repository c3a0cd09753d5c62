//! Application configuration loaded from environment variables.

use std::env;

use inkwell_core::domain::LevelFilter;
use inkwell_infra::JwtConfig;
use inkwell_infra::database::DatabaseConfig;

/// Where audit records go and which ones are kept.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Path of the audit log file; also stored on every record as its `log_file`.
    pub file: String,
    pub level: LevelFilter,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub audit: AuditConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 10),
            min_connections: parse_var("DB_MIN_CONNECTIONS", 1),
        });

        let audit = AuditConfig {
            file: env::var("AUDIT_LOG_FILE").unwrap_or_else(|_| "logging/inkwell.log".to_string()),
            level: env::var("AUDIT_LOG_LEVEL")
                .map(|v| LevelFilter::parse(&v))
                .unwrap_or(LevelFilter::Info),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            database,
            jwt: JwtConfig::from_env(),
            audit,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
