use std::env;
use std::fmt;
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

/// Top-level configuration for the pricing tools.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub data: DataConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            data: DataConfig {
                vehicles_csv: path_var("AUTOFIX_VEHICLES_CSV")?,
                repairs_csv: path_var("AUTOFIX_REPAIRS_CSV")?,
                rules_path: path_var("AUTOFIX_RULES_PATH")?,
            },
            telemetry: TelemetryConfig {
                log_level,
                verbose: environment == AppEnvironment::Development,
            },
        })
    }
}

fn path_var(name: &'static str) -> Result<Option<PathBuf>, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyPath { name }),
        Ok(value) => Ok(Some(PathBuf::from(value.trim()))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { name }),
    }
}

/// Locations of the vehicle and repair exports plus an optional rule book override.
#[derive(Debug, Clone, Default)]
pub struct DataConfig {
    pub vehicles_csv: Option<PathBuf>,
    pub repairs_csv: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Colored output with event targets; only enabled in development.
    pub verbose: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyPath { name: &'static str },
    NotUnicode { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPath { name } => write!(f, "{name} is set but empty"),
            ConfigError::NotUnicode { name } => write!(f, "{name} must be valid unicode"),
        }
    }
}

impl std::error::Error for ConfigError {}
