use crate::workflows::reorder::{Budget, ConfigurationError};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub reporting: ReportingConfig,
    pub default_budget: Option<Budget>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let snapshot_path = env::var("STOCKFLOW_SNAPSHOT_PATH")
            .unwrap_or_else(|_| "datasets/psoe_data_cleaned.csv".to_string());
        let audit_log_path = env::var("STOCKFLOW_AUDIT_LOG_PATH")
            .unwrap_or_else(|_| "datasets/psoe_audit_log.csv".to_string());
        let report_path =
            env::var("STOCKFLOW_REPORT_PATH").unwrap_or_else(|_| "psoe_report.md".to_string());
        let currency = env::var("STOCKFLOW_CURRENCY").unwrap_or_else(|_| "Rs".to_string());

        let default_budget = match env::var("STOCKFLOW_DEFAULT_BUDGET") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_budget(&raw)?),
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig {
                snapshot_path: PathBuf::from(snapshot_path),
                audit_log_path: PathBuf::from(audit_log_path),
            },
            reporting: ReportingConfig {
                report_path: PathBuf::from(report_path),
                currency,
            },
            default_budget,
        })
    }
}

fn parse_budget(raw: &str) -> Result<Budget, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidDefaultBudget {
            value: raw.to_string(),
            source: None,
        })?;

    Budget::new(value).map_err(|source| ConfigError::InvalidDefaultBudget {
        value: raw.to_string(),
        source: Some(source),
    })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Locations of the candidate snapshot and the append-only decision trail.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub snapshot_path: PathBuf,
    pub audit_log_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ReportingConfig {
    pub report_path: PathBuf,
    pub currency: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidDefaultBudget {
        value: String,
        source: Option<ConfigurationError>,
    },
    MissingBudget,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDefaultBudget { value, .. } => write!(
                f,
                "STOCKFLOW_DEFAULT_BUDGET must be a non-negative number (got '{}')",
                value
            ),
            ConfigError::MissingBudget => write!(
                f,
                "no reorder budget given: pass --budget or set STOCKFLOW_DEFAULT_BUDGET"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::MissingBudget => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidDefaultBudget { source, .. } => source
                .as_ref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
        }
    }
}
